//! Stateless HTTP request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{NewTodo, Todo, TodoPatch};

/// Synchronous, stateless client for the todo API.
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

    fn collection_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    fn item_url(&self, id: u64) -> String {
        format!("{}/todos/{id}", self.base_url)
    }

    pub fn build_list_todos(&self) -> HttpRequest {
        bodiless(HttpMethod::Get, self.collection_url())
    }

    pub fn build_get_todo(&self, id: u64) -> HttpRequest {
        bodiless(HttpMethod::Get, self.item_url(id))
    }

    pub fn build_create_todo(&self, input: &NewTodo) -> Result<HttpRequest, ApiError> {
        with_json(HttpMethod::Post, self.collection_url(), input)
    }

    pub fn build_update_todo(&self, id: u64, patch: &TodoPatch) -> Result<HttpRequest, ApiError> {
        with_json(HttpMethod::Patch, self.item_url(id), patch)
    }

    pub fn build_delete_todo(&self, id: u64) -> HttpRequest {
        bodiless(HttpMethod::Delete, self.item_url(id))
    }

    pub fn build_delete_all_todos(&self) -> HttpRequest {
        bodiless(HttpMethod::Delete, self.collection_url())
    }

    /// A browser-style CORS preflight against the collection.
    pub fn build_preflight(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Options,
            path: self.collection_url(),
            headers: vec![
                ("access-control-request-method".to_string(), "POST".to_string()),
                ("access-control-request-headers".to_string(), "content-type".to_string()),
            ],
            body: None,
        }
    }

    pub fn parse_list_todos(&self, response: HttpResponse) -> Result<Vec<Todo>, ApiError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    pub fn parse_get_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    pub fn parse_create_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 201)?;
        decode(&response.body)
    }

    pub fn parse_update_todo(&self, response: HttpResponse) -> Result<Todo, ApiError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    pub fn parse_delete_all_todos(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    /// Succeeds when the preflight was answered with every CORS header the
    /// todo API promises.
    pub fn parse_preflight(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)?;
        let allowed = response.header("access-control-allow-origin") == Some("*")
            && response.header("access-control-allow-methods").is_some()
            && response.header("access-control-allow-headers").is_some();
        if allowed {
            Ok(())
        } else {
            Err(ApiError::HttpError {
                status: response.status,
                body: "missing CORS headers".to_string(),
            })
        }
    }
}

fn bodiless(method: HttpMethod, path: String) -> HttpRequest {
    HttpRequest {
        method,
        path,
        headers: Vec::new(),
        body: None,
    }
}

fn with_json<T: Serialize>(method: HttpMethod, path: String, input: &T) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
    Ok(HttpRequest {
        method,
        path,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
