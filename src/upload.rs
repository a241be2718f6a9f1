use crate::client::OmnigageClient;
use crate::error::{OmnigageError, Result};
use crate::types::{ApiResponse, Upload, UploadRequest};
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{multipart, StatusCode};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Maps a file extension to one of the two accepted image MIME types.
///
/// Matching is case-sensitive: `photo.PNG` is not accepted.
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("png") => Some("image/png"),
        Some("jpg") | Some("jpeg") => Some("image/jpeg"),
        _ => None,
    }
}

/// A local image that passed the pre-upload checks.
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub path: PathBuf,
    pub file_name: String,
    pub mime_type: &'static str,
    pub size: u64,
}

impl LocalFile {
    /// Checks that `path` is an existing PNG or JPEG file and collects its metadata.
    ///
    /// Touches only the local filesystem.
    ///
    /// # Errors
    ///
    /// - `OmnigageError::FileNotFound` if nothing (or a directory) is at `path`.
    /// - `OmnigageError::UnsupportedFileType` if the extension is not `png`, `jpg` or `jpeg`.
    pub async fn inspect<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let metadata = match fs::metadata(path).await {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Err(file_not_found(path)),
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(file_not_found(path)),
            Err(e) => return Err(e.into()),
        };

        let mime_type = mime_type_for(path).ok_or_else(|| OmnigageError::UnsupportedFileType {
            path: path.to_path_buf(),
        })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| file_not_found(path))?;

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            mime_type,
            size: metadata.len(),
        })
    }
}

fn file_not_found(path: &Path) -> OmnigageError {
    OmnigageError::FileNotFound {
        path: path.to_path_buf(),
    }
}

impl OmnigageClient {
    /// Uploads a local image and returns its upload ID.
    ///
    /// The file is checked first, then registered with `POST uploads`, then its
    /// bytes are posted to the presigned storage endpoint the API hands back.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to a local `.png`, `.jpg` or `.jpeg` file.
    ///
    /// # Errors
    ///
    /// `FileNotFound` and `UnsupportedFileType` are returned before any request
    /// is made. A storage rejection is `StorageUploadFailed`.
    pub async fn upload<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let file = LocalFile::inspect(path).await?;
        self.upload_file(&file).await
    }

    /// Uploads an already inspected file. See [`OmnigageClient::upload`].
    pub async fn upload_file(&self, file: &LocalFile) -> Result<String> {
        let upload = self.create_upload(file).await?;
        info!(upload_id = %upload.id, file = %file.file_name, "registered upload");

        self.upload_to_storage(&upload, file).await?;
        Ok(upload.id)
    }

    /// Registers an `upload` resource for `file` and returns the presigned target.
    pub async fn create_upload(&self, file: &LocalFile) -> Result<Upload> {
        let request_body = UploadRequest {
            name: &file.file_name,
            type_: file.mime_type,
            size: file.size,
        };

        let api_response: ApiResponse<Upload> = self.post("uploads", &request_body).await?;
        Ok(api_response.data)
    }

    /// Posts the bytes of `file` to the storage endpoint described by `upload`.
    ///
    /// The multipart form holds every server-provided field unmodified and in
    /// order, then `Content-Type`, then the file itself as `file`. Every
    /// server-provided header is set on the request. Only `204 No Content`
    /// counts as success.
    pub async fn upload_to_storage(&self, upload: &Upload, file: &LocalFile) -> Result<()> {
        let attributes = &upload.attributes;
        let content = fs::read(&file.path).await?;

        let mut form = multipart::Form::new();
        for (name, value) in attributes.form_fields() {
            form = form.text(name, value);
        }
        form = form.text("Content-Type", file.mime_type);

        let file_part = multipart::Part::bytes(content)
            .file_name(file.file_name.clone())
            .mime_str(file.mime_type)?;
        form = form.part("file", file_part);

        let mut request = self.storage.post(attributes.request_url.as_str());
        for (name, value) in attributes.headers() {
            request = request.header(
                HeaderName::from_bytes(name.as_bytes())?,
                HeaderValue::from_str(&value)?,
            );
        }

        debug!(url = %attributes.request_url, "posting file to storage");
        let response = request.multipart(form).send().await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            info!(upload_id = %upload.id, "successfully uploaded file");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(OmnigageError::StorageUploadFailed {
                status: status.as_u16(),
                body,
            })
        }
    }
}
