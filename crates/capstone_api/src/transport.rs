//! Transport seam between service wrappers and the network.

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use capstone_domain::Upload;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// Multipart form: text fields plus named files.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultipartForm {
    pub fields: Vec<(String, String)>,
    pub files: Vec<(String, Upload)>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn file(mut self, name: impl Into<String>, upload: Upload) -> Self {
        self.files.push((name.into(), upload));
        self
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(MultipartForm),
}

/// A request relative to the backend base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> ApiResult<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            RequestBody::Json(v) => Some(v),
            _ => None,
        }
    }
}

/// Raw backend response. Non-JSON bodies are kept as a string value.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Error text the backend put in the body, if any.
    ///
    /// Looks at `message`, then `detail`, then `title`.
    pub fn error_message(&self) -> Option<String> {
        match &self.body {
            Value::Object(map) => ["message", "detail", "title"]
                .iter()
                .filter_map(|key| map.get(*key).and_then(Value::as_str))
                .find(|s| !s.trim().is_empty())
                .map(str::to_string),
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    /// Turn non-2xx responses into errors.
    pub fn into_result(self) -> ApiResult<Value> {
        if self.is_success() {
            return Ok(self.body);
        }
        let message = self.error_message().unwrap_or_default();
        Err(match self.status {
            401 => ApiError::Unauthorized(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            status => ApiError::Http { status, message },
        })
    }

    /// Decode a successful body. A `{ "data": ... }` envelope is unwrapped
    /// when the body itself does not match.
    pub fn decode<T: DeserializeOwned>(self) -> ApiResult<T> {
        let body = self.into_result()?;
        match serde_json::from_value::<T>(body.clone()) {
            Ok(value) => Ok(value),
            Err(direct) => match body.get("data") {
                Some(data) => serde_json::from_value(data.clone())
                    .map_err(|e| ApiError::Decode(e.to_string())),
                None => Err(ApiError::Decode(direct.to_string())),
            },
        }
    }
}

/// Something that can execute backend requests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> ApiResult<ApiResponse>;

    /// Bearer token attached to subsequent requests.
    fn set_token(&self, token: Option<String>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_message_precedence() {
        let resp = ApiResponse::new(400, json!({"title": "Bad Request", "detail": "Code taken"}));
        assert_eq!(resp.error_message().as_deref(), Some("Code taken"));

        let resp = ApiResponse::new(400, json!({"message": "Dates overlap", "detail": "x"}));
        assert_eq!(resp.error_message().as_deref(), Some("Dates overlap"));

        let resp = ApiResponse::new(500, Value::Null);
        assert_eq!(resp.error_message(), None);
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ApiResponse::new(404, json!({"message": "No team"})).into_result(),
            Err(ApiError::NotFound(m)) if m == "No team"
        ));
        assert!(matches!(
            ApiResponse::new(401, Value::Null).into_result(),
            Err(ApiError::Unauthorized(_))
        ));
        assert!(matches!(
            ApiResponse::new(409, Value::Null).into_result(),
            Err(ApiError::Http { status: 409, .. })
        ));
    }

    #[test]
    fn test_decode_envelope() {
        let resp = ApiResponse::ok(json!({"data": [1, 2, 3], "message": "ok"}));
        let values: Vec<u32> = resp.decode().unwrap();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_query_builder() {
        let req = ApiRequest::get("/users/search").query("keyword", "nguyen");
        assert_eq!(req.query, vec![("keyword".to_string(), "nguyen".to_string())]);
        assert_eq!(req.body, RequestBody::Empty);
    }
}
