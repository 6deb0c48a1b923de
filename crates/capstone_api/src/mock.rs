//! Mock transport for testing.
//!
//! Provides a scripted implementation of the [`Transport`] trait so services
//! and workflows can be exercised without a running backend.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};

/// Captured call information for verification.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedCall {
    pub request: ApiRequest,
    pub token: Option<String>,
}

impl CapturedCall {
    pub fn method(&self) -> Method {
        self.request.method
    }

    pub fn path(&self) -> &str {
        &self.request.path
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.request
            .query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
struct MockRoute {
    method: Method,
    path: String,
    responses: VecDeque<ApiResponse>,
}

/// Mock transport.
///
/// Responses are queued per `(method, path)`. The last queued response for a
/// route keeps being returned once the earlier ones are used up. Unknown
/// routes answer 404.
#[derive(Clone, Default)]
pub struct MockTransport {
    routes: Arc<RwLock<Vec<MockRoute>>>,
    captured_calls: Arc<RwLock<Vec<CapturedCall>>>,
    token: Arc<RwLock<Option<String>>>,
    simulate_failure: Arc<RwLock<Option<String>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for a route.
    pub fn on(self, method: Method, path: impl Into<String>, response: ApiResponse) -> Self {
        let path = path.into();
        {
            let mut routes = self.routes.write();
            match routes.iter_mut().find(|r| r.method == method && r.path == path) {
                Some(route) => route.responses.push_back(response),
                None => routes.push(MockRoute {
                    method,
                    path,
                    responses: VecDeque::from([response]),
                }),
            }
        }
        self
    }

    /// Queue a 200 response with a JSON body.
    pub fn on_json(self, method: Method, path: impl Into<String>, body: Value) -> Self {
        self.on(method, path, ApiResponse::ok(body))
    }

    /// Queue an error response carrying a backend message.
    pub fn on_error(
        self,
        method: Method,
        path: impl Into<String>,
        status: u16,
        message: impl Into<String>,
    ) -> Self {
        let body = json!({ "message": message.into() });
        self.on(method, path, ApiResponse::new(status, body))
    }

    /// Fail every call with a network error.
    pub fn simulate_failure(self, message: impl Into<String>) -> Self {
        *self.simulate_failure.write() = Some(message.into());
        self
    }

    pub fn clear_failure(&self) {
        *self.simulate_failure.write() = None;
    }

    pub fn clear_calls(&self) {
        self.captured_calls.write().clear();
    }

    pub fn get_calls(&self) -> Vec<CapturedCall> {
        self.captured_calls.read().clone()
    }

    pub fn call_count(&self) -> usize {
        self.captured_calls.read().len()
    }

    pub fn was_called(&self, method: Method, path: &str) -> bool {
        self.captured_calls
            .read()
            .iter()
            .any(|c| c.method() == method && c.path() == path)
    }

    pub fn calls_to(&self, method: Method, path: &str) -> Vec<CapturedCall> {
        self.captured_calls
            .read()
            .iter()
            .filter(|c| c.method() == method && c.path() == path)
            .cloned()
            .collect()
    }

    pub fn current_token(&self) -> Option<String> {
        self.token.read().clone()
    }

    fn next_response(&self, method: Method, path: &str) -> ApiResponse {
        let mut routes = self.routes.write();
        let Some(route) = routes
            .iter_mut()
            .find(|r| r.method == method && r.path == path)
        else {
            return ApiResponse::new(
                404,
                json!({ "message": format!("No mock route for {} {}", method, path) }),
            );
        };

        if route.responses.len() > 1 {
            route.responses.pop_front().unwrap_or_else(|| ApiResponse::ok(Value::Null))
        } else {
            route
                .responses
                .front()
                .cloned()
                .unwrap_or_else(|| ApiResponse::ok(Value::Null))
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let call = CapturedCall {
            request: request.clone(),
            token: self.current_token(),
        };
        self.captured_calls.write().push(call);

        let failure = self.simulate_failure.read().clone();
        if let Some(msg) = failure {
            return Err(ApiError::Network(msg));
        }

        Ok(self.next_response(request.method, &request.path))
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queued_then_sticky() {
        let mock = MockTransport::new()
            .on_json(Method::Get, "/semester", json!([1]))
            .on_json(Method::Get, "/semester", json!([2]));

        let first = mock.execute(ApiRequest::get("/semester")).await.unwrap();
        let second = mock.execute(ApiRequest::get("/semester")).await.unwrap();
        let third = mock.execute(ApiRequest::get("/semester")).await.unwrap();

        assert_eq!(first.body, json!([1]));
        assert_eq!(second.body, json!([2]));
        assert_eq!(third.body, json!([2]));
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let mock = MockTransport::new();
        let resp = mock.execute(ApiRequest::delete("/team/1")).await.unwrap();
        assert_eq!(resp.status, 404);
        assert!(mock.was_called(Method::Delete, "/team/1"));
    }

    #[tokio::test]
    async fn test_token_captured() {
        let mock = MockTransport::new();
        mock.set_token(Some("abc".into()));
        mock.execute(ApiRequest::get("/thesis/my")).await.unwrap();
        assert_eq!(mock.get_calls()[0].token.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_simulated_failure() {
        let mock = MockTransport::new().simulate_failure("connection reset");
        let result = mock.execute(ApiRequest::get("/semester")).await;
        assert!(matches!(result, Err(ApiError::Network(_))));

        mock.clear_failure();
        let resp = mock.execute(ApiRequest::get("/semester")).await.unwrap();
        assert_eq!(resp.status, 404);
    }
}
