//! Remote implementation of [`Service`].

use typed_rpc::{Action, ApiClient, Consumer, Endpoint, Getter, HyperClient, Method, Result};

use crate::model::{
    Article, CreateUserRequest, DeleteUserRequest, GetUserRequest, HealthResponse,
    ListUsersRequest, ListUsersResponse, UpdateArticleRequest, User,
};
use crate::service::Service;

type Remote = ApiClient<HyperClient>;

/// Calls the routes of [`router`](crate::router) over HTTP.
///
/// HTTP failures come back as [`typed_rpc::Error::Http`]; the body is the
/// router's [`ErrorResponse`](crate::model::ErrorResponse).
#[derive(Debug, Clone)]
pub struct ServiceClient {
    create_user: Endpoint<Remote, CreateUserRequest, User>,
    get_user: Endpoint<Remote, GetUserRequest, User>,
    list_users: Endpoint<Remote, ListUsersRequest, ListUsersResponse>,
    delete_user: Consumer<Remote, DeleteUserRequest>,
    update_article: Endpoint<Remote, UpdateArticleRequest, Article>,
    health: Getter<Remote, HealthResponse>,
    trigger_task: Action<Remote>,
}

impl ServiceClient {
    /// A client of the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`typed_rpc::Error::InvalidUrl`] when `base_url` is not a URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = ApiClient::new(HyperClient::builder().with_logging().build(), base_url)?;
        Ok(Self::with_client(client))
    }

    /// A client of the service reached through `client`.
    #[must_use]
    pub fn with_client(client: Remote) -> Self {
        Self {
            create_user: Endpoint::new(client.clone(), Method::POST, "/users"),
            get_user: Endpoint::new(client.clone(), Method::GET, "/users/{id}"),
            list_users: Endpoint::new(client.clone(), Method::GET, "/users"),
            delete_user: Endpoint::consumer(client.clone(), Method::DELETE, "/users/{id}"),
            update_article: Endpoint::new(client.clone(), Method::PUT, "/articles/{id}"),
            health: Endpoint::getter(client.clone(), Method::GET, "/health"),
            trigger_task: Endpoint::action(client, Method::POST, "/tasks"),
        }
    }
}

impl Service for ServiceClient {
    async fn create_user(&self, req: CreateUserRequest) -> Result<User> {
        self.create_user.call(req).await
    }

    async fn get_user(&self, req: GetUserRequest) -> Result<User> {
        self.get_user.call(req).await
    }

    async fn list_users(&self, req: ListUsersRequest) -> Result<ListUsersResponse> {
        self.list_users.call(req).await
    }

    async fn delete_user(&self, req: DeleteUserRequest) -> Result<()> {
        self.delete_user.call(req).await
    }

    async fn update_article(&self, req: UpdateArticleRequest) -> Result<Article> {
        self.update_article.call(req).await
    }

    async fn health(&self) -> Result<HealthResponse> {
        self.health.call().await
    }

    async fn trigger_task(&self) -> Result<()> {
        self.trigger_task.call().await
    }
}
