//! Resource handlers for `/todos` and `/todos/{id}`.
//!
//! # Design
//! Routing by verb and path is left to axum; this module holds the
//! extractors and handlers behind those routes. Extractors that reject do so
//! with [`ApiError`], so a bad id segment (400) is reported before the body
//! is decoded (422).

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request, State},
    http::{header, request::Parts, StatusCode},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::model::{NewTodo, Todo, TodoId, TodoPatch, TodoRepresentation};
use crate::store::TodoRepository;

/// Store handle shared by every handler.
pub type SharedStore = Arc<dyn TodoRepository>;

/// Request extension marking a connection whose TLS was terminated by this
/// process. A TLS acceptor in front of the router inserts it; item urls then
/// use the `https` scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct TlsConnection;

/// Scheme and host an item url is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceBase {
    scheme: &'static str,
    host: String,
}

impl ResourceBase {
    pub fn new(scheme: &'static str, host: impl Into<String>) -> Self {
        Self {
            scheme,
            host: host.into(),
        }
    }

    pub fn todo_url(&self, id: TodoId) -> String {
        format!("{}://{}/todos/{id}", self.scheme, self.host)
    }
}

impl<S> FromRequestParts<S> for ResourceBase
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let scheme = if parts.extensions.get::<TlsConnection>().is_some() {
            "https"
        } else {
            "http"
        };
        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_default();

        Ok(Self::new(scheme, host))
    }
}

/// Identity taken from the trailing path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemId(pub TodoId);

impl<S> FromRequestParts<S> for ItemId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(key) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::InvalidId)?;
        parse_id(&key).map(ItemId)
    }
}

/// Parse an identity segment. Only positive integers name an item.
pub fn parse_id(key: &str) -> Result<TodoId, ApiError> {
    match key.parse::<TodoId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::InvalidId),
    }
}

/// JSON request body decoded regardless of the request's content type.
/// Any read or decode failure is a 422.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))?;
        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| ApiError::MalformedBody(e.to_string()))
    }
}

pub async fn list_todos(
    State(store): State<SharedStore>,
    base: ResourceBase,
) -> Result<Json<Vec<TodoRepresentation>>, ApiError> {
    let todos = store.list()?;
    Ok(Json(todos.iter().map(|t| t.represent(&base)).collect()))
}

pub async fn create_todo(
    State(store): State<SharedStore>,
    base: ResourceBase,
    JsonBody(input): JsonBody<Option<NewTodo>>,
) -> Result<(StatusCode, Json<TodoRepresentation>), ApiError> {
    // A `null` body creates an item with every field at its default.
    let created = store.save(Todo::from(input.unwrap_or_default()))?;
    Ok((StatusCode::CREATED, Json(created.represent(&base))))
}

pub async fn delete_all_todos(State(store): State<SharedStore>) -> Result<StatusCode, ApiError> {
    store.delete_all()?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_todo(
    State(store): State<SharedStore>,
    base: ResourceBase,
    ItemId(id): ItemId,
) -> Result<Json<TodoRepresentation>, ApiError> {
    let todo = store.get(id)?.ok_or(ApiError::NotFound)?;
    Ok(Json(todo.represent(&base)))
}

pub async fn update_todo(
    State(store): State<SharedStore>,
    base: ResourceBase,
    ItemId(id): ItemId,
    JsonBody(patch): JsonBody<Option<TodoPatch>>,
) -> Result<Json<TodoRepresentation>, ApiError> {
    let updated = store.update(id, patch.unwrap_or_default())?;
    Ok(Json(updated.represent(&base)))
}

pub async fn delete_todo(
    State(store): State<SharedStore>,
    ItemId(id): ItemId,
) -> Result<StatusCode, ApiError> {
    store.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
