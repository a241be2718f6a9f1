//! An asynchronous client for embedding uploaded images in Omnigage email templates.
//!
//! The crate covers one workflow of the Omnigage API:
//! local images are uploaded through presigned storage forms, an email template
//! is created that references the uploads, the public URL of every converted
//! file is fetched, and the template body is updated with an `<img>` tag per file.
//!
//! ## Features
//! - Basic authentication from an API token key and secret.
//! - Presigned multipart uploads for PNG and JPEG files.
//! - Typed JSON:API payloads for uploads, email templates and files.
//! - Status checks on every request, with typed errors.
//! - Optional proxy support.
//!
//! ```no_run
//! # use omnigage::{Config, EmailTemplateJob, OmnigageClient};
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let client = OmnigageClient::new(&config)?;
//!
//! let job = EmailTemplateJob {
//!     file_paths: vec!["/Users/Shared/sample.png".into()],
//!     ..Default::default()
//! };
//! let report = omnigage::workflow::run(&client, &job).await?;
//! println!("Email Template ID: {}", report.template_id);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod template;
pub mod types;
pub mod upload;
pub mod workflow;

pub use client::OmnigageClient;
pub use config::{Config, ProxyConfig};
pub use error::{OmnigageError, Result};
pub use types::{EmailTemplate, FileResource, Upload};
pub use upload::LocalFile;
pub use workflow::{EmailTemplateJob, WorkflowReport};
