use crate::client::OmnigageClient;
use crate::error::Result;
use crate::types::{
    ApiResponse, EmailTemplate, EmailTemplateContent, EmailTemplateData, EmailTemplatePayload,
    FileResource, Relationship, ResourceIdentifier, UploadFilesRelationship,
    EMAIL_TEMPLATES_TYPE, UPLOADS_TYPE,
};

/// Builds the `email-templates` document referencing `upload_ids`.
///
/// Subject and body go through serde, so quotes, backslashes and control
/// characters are escaped.
pub fn email_template_payload<'a>(
    subject: &'a str,
    body: &'a str,
    upload_ids: &[String],
) -> EmailTemplatePayload<'a> {
    let upload_files = upload_ids
        .iter()
        .map(|id| ResourceIdentifier {
            type_: UPLOADS_TYPE.to_string(),
            id: id.clone(),
        })
        .collect();

    EmailTemplatePayload {
        data: EmailTemplateData {
            id: None,
            attributes: EmailTemplateContent { subject, body },
            relationships: UploadFilesRelationship {
                upload_files: Relationship { data: upload_files },
            },
            type_: EMAIL_TEMPLATES_TYPE,
        },
    }
}

/// An inline image tag for `url`.
pub fn html_img(url: &str) -> String {
    format!(r#"<img src="{}" />"#, url)
}

impl OmnigageClient {
    /// Creates an email template linked to previously uploaded files.
    ///
    /// # Returns
    ///
    /// The created [`EmailTemplate`]. Its `files` relationship lists the
    /// converted file resources, one per upload and in the same order.
    pub async fn create_email_template(
        &self,
        subject: &str,
        body: &str,
        upload_ids: &[String],
    ) -> Result<EmailTemplate> {
        let payload = email_template_payload(subject, body, upload_ids);
        let api_response: ApiResponse<EmailTemplate> =
            self.post(EMAIL_TEMPLATES_TYPE, &payload).await?;
        Ok(api_response.data)
    }

    /// Retrieves a file resource, which carries the file's public URL.
    pub async fn get_file(&self, file_id: &str) -> Result<FileResource> {
        let api_response: ApiResponse<FileResource> =
            self.get(&format!("files/{}", file_id)).await?;
        Ok(api_response.data)
    }

    /// Replaces the subject and body of an existing email template.
    ///
    /// The `upload-files` relationship is sent empty; files linked at
    /// creation stay linked.
    ///
    /// # Returns
    ///
    /// The stored template, or `None` if the server accepted the update
    /// without returning it (`204 No Content`).
    pub async fn update_email_template(
        &self,
        template_id: &str,
        subject: &str,
        body: &str,
    ) -> Result<Option<EmailTemplate>> {
        let mut payload = email_template_payload(subject, body, &[]);
        payload.data.id = Some(template_id);

        let api_response: Option<ApiResponse<EmailTemplate>> = self
            .patch(&format!("{}/{}", EMAIL_TEMPLATES_TYPE, template_id), &payload)
            .await?;
        Ok(api_response.map(|response| response.data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn payload_matches_json_api_shape() {
        let ids = vec!["U1".to_string(), "U2".to_string()];
        let payload = serde_json::to_value(email_template_payload("S", "B", &ids)).unwrap();

        assert_eq!(
            payload,
            json!({
                "data": {
                    "attributes": { "subject": "S", "body": "B" },
                    "relationships": {
                        "upload-files": {
                            "data": [
                                { "type": "uploads", "id": "U1" },
                                { "type": "uploads", "id": "U2" }
                            ]
                        }
                    },
                    "type": "email-templates"
                }
            })
        );
    }

    #[test]
    fn quotes_in_body_round_trip() {
        let body = r#"He said "hi""#;
        let text = serde_json::to_string(&email_template_payload("S", body, &[])).unwrap();

        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["data"]["attributes"]["body"], body);
        assert_eq!(parsed["data"]["attributes"]["subject"], "S");
    }

    #[test]
    fn backslashes_and_control_characters_round_trip() {
        let subject = "Line \"one\"\\two";
        let body = "a\\b\n\t<br />\u{1}";
        let text = serde_json::to_string(&email_template_payload(subject, body, &[])).unwrap();

        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["data"]["attributes"]["subject"], subject);
        assert_eq!(parsed["data"]["attributes"]["body"], body);
    }

    #[test]
    fn builds_img_tag() {
        assert_eq!(html_img("http://x/1.png"), r#"<img src="http://x/1.png" />"#);
    }
}
