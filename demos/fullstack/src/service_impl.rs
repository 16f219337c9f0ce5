//! In-process implementation of [`Service`].

use std::sync::Arc;

use tracing::info;
use typed_rpc::{Error, Result};

use crate::model::{
    Article, CreateUserRequest, DeleteUserRequest, GetUserRequest, HealthResponse,
    ListUsersRequest, ListUsersResponse, UpdateArticleRequest, User,
};
use crate::service::{Service, ServiceError};
use crate::store::{self, MemoryStore};

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

/// Business logic over a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct ServiceImpl {
    store: Arc<MemoryStore>,
}

impl ServiceImpl {
    #[must_use]
    pub const fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

fn invalid(message: &str) -> Error {
    Error::service(ServiceError::InvalidInput(message.to_string()))
}

impl Service for ServiceImpl {
    async fn create_user(&self, req: CreateUserRequest) -> Result<User> {
        if req.name.trim().is_empty() {
            return Err(invalid("name is required"));
        }
        if !req.email.contains('@') {
            return Err(invalid("email must contain '@'"));
        }
        Ok(self.store.create_user(&req.name, &req.email))
    }

    async fn get_user(&self, req: GetUserRequest) -> Result<User> {
        self.store
            .get_user(req.id)
            .ok_or_else(|| Error::service(ServiceError::UserNotFound(req.id)))
    }

    async fn list_users(&self, req: ListUsersRequest) -> Result<ListUsersResponse> {
        let page = req.page.max(1);
        let page_size = match req.page_size {
            0 => DEFAULT_PAGE_SIZE,
            size => size.min(MAX_PAGE_SIZE),
        };

        let all = self.store.list_users();
        let skip = usize::try_from((page - 1).saturating_mul(page_size)).unwrap_or(usize::MAX);
        let take = usize::try_from(page_size).unwrap_or(usize::MAX);

        Ok(ListUsersResponse {
            total: all.len(),
            users: all.into_iter().skip(skip).take(take).collect(),
        })
    }

    async fn delete_user(&self, req: DeleteUserRequest) -> Result<()> {
        self.store
            .delete_user(req.id)
            .map(|_| ())
            .ok_or_else(|| Error::service(ServiceError::UserNotFound(req.id)))
    }

    async fn update_article(&self, req: UpdateArticleRequest) -> Result<Article> {
        Ok(self.store.update_article(req.id, &req.title, &req.content))
    }

    async fn health(&self) -> Result<HealthResponse> {
        Ok(HealthResponse {
            status: "ok".to_string(),
            timestamp: store::now(),
        })
    }

    async fn trigger_task(&self) -> Result<()> {
        info!("task triggered");
        Ok(())
    }
}
