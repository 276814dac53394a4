//! Typed request client.
//!
//! # Design
//! `ApiClient` holds an immutable `base_url` and a transport, nothing else.
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a shared `parse` that consumes an `HttpResponse`; the
//! `get`/`post`/`put`/`delete` methods run build, transport and parse in
//! one call.
//!
//! Result types are trusted: a successful body is decoded into whatever `T`
//! the caller asks for and nothing else is checked. Use `get_with` or
//! `parse_with` to plug in a validating decoder.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{ApiError, ClientError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};

const JSON_CONTENT_TYPE: (&str, &str) = ("content-type", "application/json");

/// JSON API client bound to one base URL.
#[derive(Debug, Clone)]
pub struct ApiClient<T = UreqTransport> {
    base_url: String,
    transport: T,
}

impl ApiClient<UreqTransport> {
    /// Client over the default ureq transport.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config, UreqTransport::new())
    }
}

impl<T> ApiClient<T> {
    pub fn new(config: &ClientConfig, transport: T) -> Self {
        Self {
            base_url: config.normalized_base_url(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub fn build_get(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.url(path),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_post<D: Serialize + ?Sized>(
        &self,
        path: &str,
        data: &D,
    ) -> Result<HttpRequest, ApiError> {
        self.build_with_body(HttpMethod::Post, path, data)
    }

    pub fn build_put<D: Serialize + ?Sized>(
        &self,
        path: &str,
        data: &D,
    ) -> Result<HttpRequest, ApiError> {
        self.build_with_body(HttpMethod::Put, path, data)
    }

    pub fn build_delete(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.url(path),
            headers: Vec::new(),
            body: None,
        }
    }

    fn build_with_body<D: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        data: &D,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(data).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: self.url(path),
            headers: vec![(
                JSON_CONTENT_TYPE.0.to_string(),
                JSON_CONTENT_TYPE.1.to_string(),
            )],
            body: Some(body),
        })
    }

    /// Check the status and decode the body into `R`.
    ///
    /// An empty body decodes as JSON `null`, so `()` and `Option<_>` accept
    /// a 204.
    pub fn parse<R: DeserializeOwned>(&self, response: HttpResponse) -> Result<R, ApiError> {
        let body = check_status(response)?;
        decode_body(&body, |raw| serde_json::from_slice(raw))
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Like `parse`, but hands the JSON value to `decode` instead of serde.
    pub fn parse_with<R, F>(&self, response: HttpResponse, decode: F) -> Result<R, ApiError>
    where
        F: FnOnce(serde_json::Value) -> Result<R, String>,
    {
        let body = check_status(response)?;
        let value: serde_json::Value = decode_body(&body, |raw| serde_json::from_slice(raw))
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;
        decode(value).map_err(ApiError::Validation)
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let request = self.build_get(path);
        self.parse(self.send(&request)?)
    }

    pub fn get_with<R, F>(&self, path: &str, decode: F) -> Result<R, ApiError>
    where
        F: FnOnce(serde_json::Value) -> Result<R, String>,
    {
        let request = self.build_get(path);
        self.parse_with(self.send(&request)?, decode)
    }

    pub fn post<R, D>(&self, path: &str, data: &D) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        D: Serialize + ?Sized,
    {
        let request = self.build_post(path, data)?;
        self.parse(self.send(&request)?)
    }

    pub fn put<R, D>(&self, path: &str, data: &D) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        D: Serialize + ?Sized,
    {
        let request = self.build_put(path, data)?;
        self.parse(self.send(&request)?)
    }

    pub fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let request = self.build_delete(path);
        self.parse(self.send(&request)?)
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = %request.method, path = %request.path, "sending request");
        let response = self.transport.execute(request).map_err(|e| {
            tracing::warn!(method = %request.method, path = %request.path, error = %e, "request failed");
            e
        })?;
        if response.is_success() {
            tracing::debug!(
                status = response.status,
                content_type = response.header("content-type").unwrap_or_default(),
                bytes = response.body.len(),
                "received response"
            );
        } else {
            tracing::warn!(
                method = %request.method,
                path = %request.path,
                status = response.status,
                "non-success response"
            );
        }
        Ok(response)
    }
}

/// Turn a non-2xx response into `ClientError`, otherwise yield the body.
///
/// The error keeps the body even when it is not UTF-8; invalid sequences
/// are replaced.
fn check_status(response: HttpResponse) -> Result<Vec<u8>, ApiError> {
    if response.is_success() {
        return Ok(response.body);
    }
    let body = String::from_utf8_lossy(&response.body).into_owned();
    Err(ClientError::new(response.status, &response.status_text, body).into())
}

fn decode_body<V, E>(body: &[u8], decode: impl FnOnce(&[u8]) -> Result<V, E>) -> Result<V, E> {
    if body.iter().all(u8::is_ascii_whitespace) {
        decode(&b"null"[..])
    } else {
        decode(body)
    }
}
