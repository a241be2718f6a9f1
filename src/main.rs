//! Uploads the images given as arguments and embeds them in a new email template.
//!
//! Credentials come from the environment (or a `.env` file):
//! `OMNIGAGE_TOKEN_KEY`, `OMNIGAGE_TOKEN_SECRET`, `OMNIGAGE_ACCOUNT_KEY`, and
//! optionally `OMNIGAGE_HOST`, `OMNIGAGE_PROXY_HOST`, `OMNIGAGE_PROXY_USER`,
//! `OMNIGAGE_PROXY_PASS`, `OMNIGAGE_SUBJECT`, `OMNIGAGE_BODY`.
//!
//! Usage:
//! `cargo run -- /Users/Shared/sample.png other.jpg`

use omnigage::workflow::{self, EmailTemplateJob, WorkflowReport};
use omnigage::{Config, OmnigageClient};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Failures are reported, not turned into an exit code.
    if let Err(e) = run().await {
        println!("{}", e);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let client = OmnigageClient::new(&config)?;

    let defaults = EmailTemplateJob::default();
    let job = EmailTemplateJob {
        subject: env::var("OMNIGAGE_SUBJECT").unwrap_or(defaults.subject),
        body: env::var("OMNIGAGE_BODY").unwrap_or(defaults.body),
        file_paths: env::args_os().skip(1).map(Into::into).collect(),
    };

    let report = workflow::run(&client, &job).await?;
    print_report(&report);

    Ok(())
}

fn print_report(report: &WorkflowReport) {
    for upload_id in &report.upload_ids {
        println!("Upload ID: {}", upload_id);
    }
    println!("Email Template ID: {}", report.template_id);
    println!("Email Template Body: {}", report.body);
    match report.updated_at {
        Some(updated_at) => println!("Email Template Updated: {}", updated_at.to_rfc3339()),
        None => println!("Email Template Updated: unknown"),
    }
}
