//! Stateless request builder and response parser for the todo service.
//!
//! # Design
//! `TodoClient` holds only a `base_url`. Each endpoint is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes the `HttpResponse`. The caller performs the round-trip in
//! between.
//!
//! Successful writes answer with a plain-text confirmation, which the
//! matching `parse_*` returns as-is.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{DueDate, Todo, TodoFilter, TodoPatch};

#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_list_todos(&self, filter: &TodoFilter) -> HttpRequest {
        let mut pairs: Vec<(&str, &str)> = Vec::new();
        if let Some(search_q) = filter.search_q.as_deref() {
            pairs.push(("search_q", search_q));
        }
        if let Some(status) = filter.status {
            pairs.push(("status", status.as_str()));
        }
        if let Some(priority) = filter.priority {
            pairs.push(("priority", priority.as_str()));
        }
        if let Some(category) = filter.category {
            pairs.push(("category", category.as_str()));
        }
        let path = format!("{}/todos/{}", self.base_url, query_string(&pairs));
        HttpRequest::new(HttpMethod::Get, path)
    }

    pub fn build_get_todo(&self, id: i64) -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, format!("{}/todos/{id}/", self.base_url))
    }

    pub fn build_agenda(&self, date: DueDate) -> HttpRequest {
        let date = date.to_string();
        let path = format!("{}/agenda/{}", self.base_url, query_string(&[("date", date.as_str())]));
        HttpRequest::new(HttpMethod::Get, path)
    }

    pub fn build_create_todo(&self, todo: &Todo) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(todo).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest::new(HttpMethod::Post, format!("{}/todos/", self.base_url)).with_json(body))
    }

    pub fn build_update_todo(&self, id: i64, patch: &TodoPatch) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(patch).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(
            HttpRequest::new(HttpMethod::Put, format!("{}/todos/{id}/", self.base_url))
                .with_json(body),
        )
    }

    pub fn build_delete_todo(&self, id: i64) -> HttpRequest {
        HttpRequest::new(HttpMethod::Delete, format!("{}/todos/{id}/", self.base_url))
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response)?;
        parse_json(&response)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response)?;
        parse_json(&response)
    }

    pub fn parse_agenda(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response)?;
        parse_json(&response)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(&response)?;
        Ok(response.body)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(&response)?;
        Ok(response.body)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(&response)?;
        Ok(response.body)
    }
}

/// `?k=v&...` with percent-encoded values, or empty when there are no pairs.
fn query_string(pairs: &[(&str, &str)]) -> String {
    if pairs.is_empty() {
        return String::new();
    }
    let joined = pairs
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("?{joined}")
}

/// Map every non-200 status to the matching `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    match response.status {
        200 => Ok(()),
        400 => Err(ApiError::Rejected(response.body.clone())),
        404 => Err(ApiError::NotFound),
        409 => Err(ApiError::Conflict(response.body.clone())),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Priority, Status};

    fn client() -> TodoClient {
        TodoClient::new("http://localhost:8000")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn sample() -> Todo {
        Todo {
            id: 1,
            todo: "Buy milk".to_string(),
            priority: Priority::High,
            status: Status::ToDo,
            category: Category::Home,
            due_date: DueDate::from_ymd(2024, 5, 1).unwrap(),
        }
    }

    #[test]
    fn build_list_todos_without_filter() {
        let req = client().build_list_todos(&TodoFilter::default());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8000/todos/");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_list_todos_encodes_values() {
        let filter = TodoFilter {
            search_q: Some("buy milk".to_string()),
            status: Some(Status::ToDo),
            category: Some(Category::Home),
            ..TodoFilter::default()
        };
        let req = client().build_list_todos(&filter);
        assert_eq!(
            req.path,
            "http://localhost:8000/todos/?search_q=buy%20milk&status=TO%20DO&category=HOME"
        );
    }

    #[test]
    fn build_get_and_delete_use_trailing_slash() {
        assert_eq!(client().build_get_todo(7).path, "http://localhost:8000/todos/7/");
        let req = client().build_delete_todo(7);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:8000/todos/7/");
    }

    #[test]
    fn build_agenda_uses_normalized_date() {
        let req = client().build_agenda(DueDate::from_ymd(2024, 5, 1).unwrap());
        assert_eq!(req.path, "http://localhost:8000/agenda/?date=2024-05-01");
    }

    #[test]
    fn build_create_todo_sends_wire_json() {
        let req = client().build_create_todo(&sample()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8000/todos/");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["status"], "TO DO");
        assert_eq!(body["dueDate"], "2024-05-01");
    }

    #[test]
    fn build_update_todo_sends_only_present_fields() {
        let patch = TodoPatch {
            priority: Some(Priority::Low),
            ..TodoPatch::default()
        };
        let req = client().build_update_todo(3, &patch).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:8000/todos/3/");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({ "priority": "LOW" }));
    }

    #[test]
    fn parse_list_todos_success() {
        let body = r#"[{"id":1,"todo":"Buy milk","priority":"HIGH","status":"TO DO","category":"HOME","dueDate":"2024-05-01"}]"#;
        let todos = client().parse_list_todos(response(200, body)).unwrap();
        assert_eq!(todos, vec![sample()]);
    }

    #[test]
    fn parse_get_todo_not_found() {
        let err = client().parse_get_todo(response(404, "Todo Not Found")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_rejection_keeps_message() {
        let err = client()
            .parse_create_todo(response(400, "Invalid Todo Priority"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected(ref m) if m == "Invalid Todo Priority"));
    }

    #[test]
    fn parse_create_todo_conflict() {
        let err = client()
            .parse_create_todo(response(409, "Todo Already Exists"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn parse_update_returns_confirmation() {
        let msg = client().parse_update_todo(response(200, "Status Updated")).unwrap();
        assert_eq!(msg, "Status Updated");
    }

    #[test]
    fn parse_unexpected_status() {
        let err = client()
            .parse_delete_todo(response(500, "Internal Server Error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_agenda_bad_json() {
        let err = client().parse_agenda(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = TodoClient::new("http://localhost:8000/");
        assert_eq!(client.build_get_todo(1).path, "http://localhost:8000/todos/1/");
    }
}
