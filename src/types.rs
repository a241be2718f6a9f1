use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub(crate) const EMAIL_TEMPLATES_TYPE: &str = "email-templates";
pub(crate) const UPLOADS_TYPE: &str = "uploads";

/// (Internal) A generic wrapper for JSON:API documents where the resource is nested under a "data" field.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub(crate) data: T,
}

/// (Internal) Body of `POST uploads`.
#[derive(Serialize, Debug)]
pub(crate) struct UploadRequest<'a> {
    pub(crate) name: &'a str,
    #[serde(rename = "type")]
    pub(crate) type_: &'a str,
    pub(crate) size: u64,
}

/// A pending upload registered with the API.
///
/// Describes where and how the raw bytes must be sent to the storage backend.
#[derive(Deserialize, Debug, Clone)]
pub struct Upload {
    /// The upload ID, later referenced from an email template.
    pub id: String,
    pub attributes: UploadAttributes,
}

/// The presigned target for an [`Upload`].
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct UploadAttributes {
    /// The storage endpoint the multipart form is posted to.
    pub request_url: String,
    /// Headers demanded by the storage backend, as a list of objects.
    #[serde(default)]
    pub request_headers: Vec<Map<String, Value>>,
    /// Signed form fields, as a list of objects. Must be sent verbatim.
    #[serde(default)]
    pub request_form_data: Vec<Map<String, Value>>,
}

impl UploadAttributes {
    /// Flattens `request-headers` into name/value pairs, keeping server order.
    pub fn headers(&self) -> Vec<(String, String)> {
        flatten_pairs(&self.request_headers)
    }

    /// Flattens `request-form-data` into name/value pairs, keeping server order.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        flatten_pairs(&self.request_form_data)
    }
}

fn flatten_pairs(objects: &[Map<String, Value>]) -> Vec<(String, String)> {
    objects
        .iter()
        .flat_map(|object| object.iter())
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.clone(), value)
        })
        .collect()
}

/// A JSON:API resource identifier, `{ "type": ..., "id": ... }`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResourceIdentifier {
    #[serde(rename = "type", default)]
    pub type_: String,
    pub id: String,
}

/// A to-many relationship.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationship {
    #[serde(default)]
    pub data: Vec<ResourceIdentifier>,
}

/// An email template as returned by the API.
#[derive(Deserialize, Debug, Clone)]
pub struct EmailTemplate {
    pub id: String,
    #[serde(default)]
    pub attributes: EmailTemplateAttributes,
    #[serde(default)]
    pub relationships: EmailTemplateRelationships,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct EmailTemplateAttributes {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    /// Last modification time. Offset-less timestamps are read as UTC;
    /// anything unparseable is `None`.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::String(text)) = value else {
        return Ok(None);
    };

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(&text) {
        return Ok(Some(timestamp.with_timezone(&Utc)));
    }
    Ok(NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc()))
}

/// Relationships read back from a template.
///
/// The server converts each referenced upload into a `files` resource, so the
/// key read here differs from the `upload-files` key written on creation.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct EmailTemplateRelationships {
    #[serde(default)]
    pub files: Relationship,
}

impl EmailTemplate {
    /// IDs of the converted files, in the order the server lists them.
    pub fn file_ids(&self) -> Vec<&str> {
        self.relationships
            .files
            .data
            .iter()
            .map(|file| file.id.as_str())
            .collect()
    }
}

/// A processed asset hosted by the platform.
#[derive(Deserialize, Debug, Clone)]
pub struct FileResource {
    #[serde(default)]
    pub id: String,
    pub attributes: FileAttributes,
}

#[derive(Deserialize, Debug, Clone)]
pub struct FileAttributes {
    /// Public URL of the file.
    pub url: String,
}

/// Body of `POST email-templates` and `PATCH email-templates/{id}`.
#[derive(Serialize, Debug)]
pub struct EmailTemplatePayload<'a> {
    pub data: EmailTemplateData<'a>,
}

#[derive(Serialize, Debug)]
pub struct EmailTemplateData<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    pub attributes: EmailTemplateContent<'a>,
    pub relationships: UploadFilesRelationship,
    #[serde(rename = "type")]
    pub type_: &'static str,
}

#[derive(Serialize, Debug)]
pub struct EmailTemplateContent<'a> {
    pub subject: &'a str,
    pub body: &'a str,
}

#[derive(Serialize, Debug)]
pub struct UploadFilesRelationship {
    #[serde(rename = "upload-files")]
    pub upload_files: Relationship,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn attributes(updated_at: Value) -> EmailTemplateAttributes {
        serde_json::from_value(json!({ "subject": "S", "body": "B", "updated-at": updated_at }))
            .unwrap()
    }

    #[test]
    fn updated_at_accepts_rfc3339() {
        assert_eq!(
            attributes(json!("2019-03-01T14:30:00+02:00")).updated_at,
            Some(Utc.with_ymd_and_hms(2019, 3, 1, 12, 30, 0).unwrap())
        );
    }

    #[test]
    fn updated_at_without_offset_is_utc() {
        let updated_at = attributes(json!("2019-03-01T12:30:00.123456")).updated_at.unwrap();
        assert_eq!(
            updated_at.timestamp(),
            Utc.with_ymd_and_hms(2019, 3, 1, 12, 30, 0).unwrap().timestamp()
        );
        assert_eq!(updated_at.timestamp_subsec_micros(), 123456);
    }

    #[test]
    fn unreadable_updated_at_is_none() {
        assert!(attributes(json!("last tuesday")).updated_at.is_none());
        assert!(attributes(json!(1551443400)).updated_at.is_none());
        assert!(attributes(Value::Null).updated_at.is_none());
    }
}
