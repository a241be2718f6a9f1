#![allow(dead_code)]

use omnigage::OmnigageClient;
use serde_json::json;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const STORAGE_PATH: &str = "/storage";

pub fn client_for(server: &MockServer) -> OmnigageClient {
    OmnigageClient::new_with_url("test_key", "test_secret", "test_account", &server.uri()).unwrap()
}

pub fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let file_path = dir.join(name);
    File::create(&file_path).unwrap().write_all(contents).unwrap();
    file_path
}

/// Mounts `POST /uploads` for `file_name`, answering with `upload_id` and a
/// presigned target on the same mock server.
pub async fn mount_upload(server: &MockServer, file_name: &str, upload_id: &str) {
    Mock::given(method("POST"))
        .and(path("/uploads"))
        .and(body_partial_json(json!({ "name": file_name })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {
                "type": "uploads",
                "id": upload_id,
                "attributes": {
                    "request-url": format!("{}{}", server.uri(), STORAGE_PATH),
                    "request-headers": [
                        { "x-amz-acl": "public-read" }
                    ],
                    "request-form-data": [
                        { "key": format!("uploads/{}/{}", upload_id, file_name) },
                        { "policy": "eyJleHBpcmF0aW9uIjoiMjAxOS0wMS0wMVQwMDowMDowMFoifQ==" },
                        { "x-amz-signature": "abc123" }
                    ]
                }
            }
        })))
        .mount(server)
        .await;
}

pub async fn mount_storage(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path(STORAGE_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

pub async fn requests_to(server: &MockServer, verb: &str, request_path: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|request| request.method.as_str() == verb && request.url.path() == request_path)
        .collect()
}

/// Asserts that a storage POST carries exactly the presigned fields from
/// [`mount_upload`], then `Content-Type`, then `file`, in that order.
pub fn assert_storage_form(request: &Request, upload_id: &str, file_name: &str, mime_type: &str) {
    let body = String::from_utf8_lossy(&request.body);
    assert_eq!(body.matches("Content-Disposition: form-data;").count(), 5);

    let expected_in_order = [
        format!("name=\"key\"\r\n\r\nuploads/{}/{}", upload_id, file_name),
        "name=\"policy\"\r\n\r\neyJleHBpcmF0aW9uIjoiMjAxOS0wMS0wMVQwMDowMDowMFoifQ==".to_string(),
        "name=\"x-amz-signature\"\r\n\r\nabc123".to_string(),
        format!("name=\"Content-Type\"\r\n\r\n{}", mime_type),
        format!("name=\"file\"; filename=\"{}\"", file_name),
    ];
    let positions: Vec<usize> = expected_in_order
        .iter()
        .map(|needle| body.find(needle.as_str()).unwrap_or_else(|| panic!("missing {needle}")))
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}
