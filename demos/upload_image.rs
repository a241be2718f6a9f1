//! Walks through the presigned upload one step at a time.
//!
//! The file is inspected locally, registered with `POST /uploads`, and then
//! posted to the storage URL the API hands back. The printed upload ID is what
//! an email template lists under `upload-files`.
//!
//! Needs `OMNIGAGE_TOKEN_KEY`, `OMNIGAGE_TOKEN_SECRET` and `OMNIGAGE_ACCOUNT_KEY`.
//!
//! Usage:
//! `cargo run --example upload_image -- path/to/image.png`

use omnigage::{Config, LocalFile, OmnigageClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let image_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "assets/image.png".to_string());

    // Rejects missing files and anything that is not PNG or JPEG before any request.
    let file = LocalFile::inspect(&image_path).await?;
    println!(
        "Inspected '{}': {} ({} bytes)",
        file.file_name, file.mime_type, file.size
    );

    let client = OmnigageClient::new(&Config::from_env()?)?;

    let upload = client.create_upload(&file).await?;
    println!("\nRegistered upload {}", upload.id);
    println!("-> Storage URL: {}", upload.attributes.request_url);
    for (name, _) in upload.attributes.form_fields() {
        println!("-> Form field: {}", name);
    }

    client.upload_to_storage(&upload, &file).await?;
    println!("\nStored '{}' as upload {}", file.file_name, upload.id);

    Ok(())
}
