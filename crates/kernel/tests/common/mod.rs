#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Every [`TestApp`] runs the REAL kernel router and state against its own
//! temporary data and uploads directories, so tests never share blog state.

#![allow(dead_code)]

use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use wx_kernel::{AppState, Config};

const BOUNDARY: &str = "wx-test-boundary";

/// A response with its body read to a string.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

/// Test application wrapper using the REAL kernel routes and state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub config: Config,
    root: PathBuf,
}

impl TestApp {
    /// Fresh install: the store is empty, so the blog seeds its defaults.
    pub async fn new() -> Self {
        Self::build(None, false).await
    }

    /// Start from a stored blog namespace.
    pub async fn with_blog_state(state: Value) -> Self {
        Self::build(Some(state), false).await
    }

    /// Fresh install with the inline editor switched on.
    pub async fn with_editor() -> Self {
        Self::build(None, true).await
    }

    async fn build(seed: Option<Value>, editor_enabled: bool) -> Self {
        let root = std::env::temp_dir().join(format!(
            "wx_kernel_test_{}",
            uuid::Uuid::now_v7().simple()
        ));
        let config = Config {
            port: 0,
            data_dir: root.join("data"),
            uploads_dir: root.join("uploads"),
            files_url: "/files".to_string(),
            templates_dir: Config::default_templates_dir(),
            site_url: "http://site.test".to_string(),
            editor_enabled,
            user_email: Some("ada@example.com".to_string()),
            user_first_name: Some("Ada".to_string()),
            user_last_name: Some("Lovelace".to_string()),
            cors_allowed_origins: vec!["*".to_string()],
        };

        if let Some(seed) = seed {
            std::fs::create_dir_all(&config.data_dir).unwrap();
            std::fs::write(
                config.data_dir.join("Blog.json"),
                serde_json::to_vec_pretty(&seed).unwrap(),
            )
            .unwrap();
        }

        let state = AppState::new(&config)
            .await
            .expect("Failed to initialize AppState");
        let router = wx_kernel::app(state.clone());

        Self {
            router,
            state,
            config,
            root,
        }
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            location,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.send(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_bytes(&self, path: &str) -> (StatusCode, Option<String>, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, bytes.to_vec())
    }

    /// POST an urlencoded form.
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// POST a multipart form with an optional `(field, file name, mime, bytes)` file.
    pub async fn post_multipart(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        file: Option<(&str, &str, &str, &[u8])>,
    ) -> TestResponse {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((name, file_name, mime, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {mime}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::post(path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// The blog namespace as written to disk.
    pub fn stored_blog(&self) -> Option<Value> {
        let bytes = std::fs::read(self.config.data_dir.join("Blog.json")).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.root).ok();
    }
}

/// Percent-encode a form value.
fn encode(value: &str) -> String {
    let mut out = String::new();
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Bytes of the smallest valid PNG.
pub fn png_bytes() -> Vec<u8> {
    use base64::Engine;
    let payload = wx_test_utils::PNG_DATA_URL
        .split_once(',')
        .map(|(_, data)| data)
        .unwrap();
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .unwrap()
}
