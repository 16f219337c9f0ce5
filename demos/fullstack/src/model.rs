//! Data types shared by the server and the client.

use serde::{Deserialize, Serialize};
use typed_rpc::Binding;

// ============================================================================
// Entities
// ============================================================================

/// A registered user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Seconds since the Unix epoch.
    pub created_at: u64,
}

/// An article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
}

// ============================================================================
// Requests
// ============================================================================

/// `POST /users`: the whole struct is the JSON body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Binding)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

/// `GET /users/{id}`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Binding)]
pub struct GetUserRequest {
    #[rpc(path)]
    pub id: i64,
}

/// `GET /users?page=..&page_size=..`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Binding)]
pub struct ListUsersRequest {
    #[rpc(query)]
    pub page: u32,
    #[rpc(query)]
    pub page_size: u32,
}

/// `PUT /articles/{id}` with the path, an optional header and body members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Binding)]
pub struct UpdateArticleRequest {
    #[rpc(path)]
    pub id: i64,
    #[rpc(header = "Authorization")]
    pub token: Option<String>,
    #[rpc(body)]
    pub title: String,
    #[rpc(body)]
    pub content: String,
}

/// `DELETE /users/{id}`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Binding)]
pub struct DeleteUserRequest {
    #[rpc(path)]
    pub id: i64,
}

// ============================================================================
// Responses
// ============================================================================

/// A page of users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub total: usize,
    pub users: Vec<User>,
}

/// Liveness of the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Seconds since the Unix epoch.
    pub timestamp: u64,
}

/// Body of the error responses written by the demo router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}
