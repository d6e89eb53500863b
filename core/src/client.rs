//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and an optional `Origin` value. Each
//! route is split into a `build_*` method that produces an `HttpRequest` and
//! a `parse_*` method that consumes an `HttpResponse`. The caller executes
//! the actual HTTP round-trip, keeping the client deterministic.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{InsertedBody, MessageBody, Todo, TodoInput};

#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
    origin: Option<String>,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            origin: None,
        }
    }

    /// Send `Origin: <origin>` with every request, as a browser would.
    pub fn with_origin(mut self, origin: &str) -> Self {
        self.origin = Some(origin.to_string());
        self
    }

    pub fn build_list(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/todo".to_string(), None)
    }

    pub fn build_create(&self, input: &TodoInput) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.request(HttpMethod::Post, "/todo".to_string(), Some(body)))
    }

    pub fn build_update(&self, id: u64, input: &TodoInput) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.request(HttpMethod::Put, format!("/todo/{id}"), Some(body)))
    }

    pub fn build_delete(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("/todo/{id}"), None)
    }

    /// An empty table comes back as `ApiError::NotFound`, never as `Ok(vec![])`.
    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<InsertedBody, ApiError> {
        check_status(&response, 201)?;
        decode(&response.body)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<MessageBody, ApiError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<MessageBody, ApiError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    fn request(&self, method: HttpMethod, route: String, body: Option<String>) -> HttpRequest {
        let mut headers = Vec::new();
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        if let Some(origin) = &self.origin {
            headers.push(("origin".to_string(), origin.clone()));
        }
        HttpRequest {
            method,
            path: format!("{}{route}", self.base_url),
            headers,
            body,
        }
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
///
/// The service puts its error text in a `{"message": ...}` body; anything
/// else is passed on as the raw body.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    let message = serde_json::from_str::<MessageBody>(&response.body)
        .map(|b| b.message)
        .unwrap_or_else(|_| response.body.clone());
    if response.status == 404 {
        return Err(ApiError::NotFound { message });
    }
    Err(ApiError::Http {
        status: response.status,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:3000")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_list_has_no_body_or_headers() {
        let req = client().build_list();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/todo");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_create_sends_json() {
        let input = TodoInput {
            category: Some("errand".to_string()),
            ..TodoInput::new("Buy milk")
        };
        let req = client().build_create(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/todo");
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["task"], "Buy milk");
        assert_eq!(body["category"], "errand");
        assert!(body["date"].is_null());
    }

    #[test]
    fn build_update_targets_id() {
        let req = client().build_update(12, &TodoInput::new("x")).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/todo/12");
    }

    #[test]
    fn build_delete_targets_id() {
        let req = client().build_delete(3);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:3000/todo/3");
        assert!(req.body.is_none());
    }

    #[test]
    fn origin_is_attached_to_every_request() {
        let c = client().with_origin("http://localhost:3001");
        assert_eq!(c.build_list().header("origin"), Some("http://localhost:3001"));
        assert_eq!(c.build_delete(1).header("Origin"), Some("http://localhost:3001"));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let req = TodoClient::new("http://localhost:3000/").build_list();
        assert_eq!(req.path, "http://localhost:3000/todo");
    }

    #[test]
    fn parse_list_success() {
        let todos = client()
            .parse_list(response(
                200,
                r#"[{"id":1,"task":"Test","description":null,"category":null,"date":"2024-01-01"}]"#,
            ))
            .unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].task, "Test");
    }

    #[test]
    fn parse_list_empty_table_is_not_found() {
        let err = client()
            .parse_list(response(404, r#"{"message":"No records found in database"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound { message } if message == "No records found in database"));
    }

    #[test]
    fn parse_create_returns_insert_id() {
        let body = client()
            .parse_create(response(201, r#"{"message":"Inserted successfully","insertId":5}"#))
            .unwrap();
        assert_eq!(body.insert_id, 5);
    }

    #[test]
    fn parse_create_server_error_keeps_message() {
        let err = client()
            .parse_create(response(500, r#"{"message":"Column 'task' cannot be null"}"#))
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Http { status: 500, message } if message == "Column 'task' cannot be null"
        ));
    }

    #[test]
    fn parse_error_with_non_json_body_keeps_raw_text() {
        let err = client().parse_update(response(502, "bad gateway")).unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 502, message } if message == "bad gateway"));
    }

    #[test]
    fn parse_delete_not_found() {
        let err = client()
            .parse_delete(response(404, r#"{"message":"Todo not found"}"#))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
    }

    #[test]
    fn parse_list_bad_json() {
        let err = client().parse_list(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
