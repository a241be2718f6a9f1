//! The upload-then-link flow: upload assets, create the template, resolve file
//! URLs, then update the template body with inline images.

use crate::client::OmnigageClient;
use crate::error::{OmnigageError, Result};
use crate::template::html_img;
use crate::upload::LocalFile;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::info;

pub const DEFAULT_SUBJECT: &str = "Example with Images";
pub const DEFAULT_BODY: &str = "Hello {{first-name}},<br /><br /><strong>Supports HTML</strong>{{unsubscribe-link}}<br /><br /><br />";

/// Input of one run.
#[derive(Debug, Clone)]
pub struct EmailTemplateJob {
    pub subject: String,
    /// Initial HTML body. Image tags are appended after it.
    pub body: String,
    /// Local PNG/JPEG files, in the order their images should appear.
    pub file_paths: Vec<PathBuf>,
}

impl Default for EmailTemplateJob {
    fn default() -> Self {
        Self {
            subject: DEFAULT_SUBJECT.to_string(),
            body: DEFAULT_BODY.to_string(),
            file_paths: Vec::new(),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct WorkflowReport {
    pub upload_ids: Vec<String>,
    pub template_id: String,
    /// The enriched body as sent in the update.
    pub body: String,
    /// `None` when the update response carried no timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Runs the whole flow against the API.
///
/// All files are inspected before the first request, so a bad path fails the
/// run without uploading anything. Uploads happen one at a time in
/// `file_paths` order. The template is written twice: once on creation with
/// the initial body and once with the image tags appended.
///
/// # Errors
///
/// Stops at the first error. Uploads and a template that already exist on the
/// server are left in place.
pub async fn run(client: &OmnigageClient, job: &EmailTemplateJob) -> Result<WorkflowReport> {
    let mut files = Vec::with_capacity(job.file_paths.len());
    for path in &job.file_paths {
        files.push(LocalFile::inspect(path).await?);
    }

    let mut upload_ids = Vec::with_capacity(files.len());
    for file in &files {
        upload_ids.push(client.upload_file(file).await?);
    }

    let template = client
        .create_email_template(&job.subject, &job.body, &upload_ids)
        .await?;
    info!(template_id = %template.id, "created email template");

    let file_ids = template.file_ids();
    if file_ids.len() != upload_ids.len() {
        return Err(OmnigageError::FileCountMismatch {
            uploads: upload_ids.len(),
            files: file_ids.len(),
        });
    }

    let mut body = job.body.clone();
    for file_id in file_ids {
        let file = client.get_file(file_id).await?;
        body.push_str(&html_img(&file.attributes.url));
    }

    let updated = client
        .update_email_template(&template.id, &job.subject, &body)
        .await?;
    info!(template_id = %template.id, "updated email template body");

    Ok(WorkflowReport {
        upload_ids,
        template_id: template.id,
        body,
        updated_at: updated.and_then(|updated| updated.attributes.updated_at),
    })
}
