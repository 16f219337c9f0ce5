//! The business contract, implemented locally and remotely.

use std::future::Future;

use typed_rpc::Result;

use crate::model::{
    Article, CreateUserRequest, DeleteUserRequest, GetUserRequest, HealthResponse,
    ListUsersRequest, ListUsersResponse, UpdateArticleRequest, User,
};

/// Failures of the business layer.
///
/// They travel inside [`typed_rpc::Error::Service`]; the router maps them to
/// status codes.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ServiceError {
    #[display("user {_0} not found")]
    UserNotFound(#[error(not(source))] i64),
    #[display("invalid input: {_0}")]
    InvalidInput(#[error(not(source))] String),
}

/// Users, articles, health and background tasks.
///
/// Implemented by [`ServiceImpl`](crate::ServiceImpl) in process and by
/// [`ServiceClient`](crate::ServiceClient) over HTTP.
pub trait Service: Send + Sync {
    fn create_user(&self, req: CreateUserRequest) -> impl Future<Output = Result<User>> + Send;

    fn get_user(&self, req: GetUserRequest) -> impl Future<Output = Result<User>> + Send;

    fn list_users(
        &self,
        req: ListUsersRequest,
    ) -> impl Future<Output = Result<ListUsersResponse>> + Send;

    fn delete_user(&self, req: DeleteUserRequest) -> impl Future<Output = Result<()>> + Send;

    fn update_article(
        &self,
        req: UpdateArticleRequest,
    ) -> impl Future<Output = Result<Article>> + Send;

    fn health(&self) -> impl Future<Output = Result<HealthResponse>> + Send;

    fn trigger_task(&self) -> impl Future<Output = Result<()>> + Send;
}
