//! Serves the demo service and calls it through [`ServiceClient`].

use std::sync::Arc;

use fullstack::model::{
    CreateUserRequest, DeleteUserRequest, GetUserRequest, ListUsersRequest, UpdateArticleRequest,
};
use fullstack::{MemoryStore, Service, ServiceClient, ServiceImpl, router};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const ADDRESS: &str = "127.0.0.1:8080";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let service = ServiceImpl::new(Arc::new(MemoryStore::with_sample_data()));
    let listener = TcpListener::bind(ADDRESS).await?;
    let address = listener.local_addr()?;
    info!(%address, "serving");

    let app = router(Arc::new(service));
    let server = tokio::spawn(async move { axum::serve(listener, app).await });

    run_client(&ServiceClient::new(&format!("http://{address}"))?).await?;

    server.abort();
    Ok(())
}

async fn run_client(client: &impl Service) -> typed_rpc::Result<()> {
    let health = client.health().await?;
    info!(status = %health.status, "health");

    let user = client
        .create_user(CreateUserRequest {
            name: "Charlie".to_string(),
            email: "charlie@example.com".to_string(),
        })
        .await?;
    info!(?user, "created user");

    let user = client.get_user(GetUserRequest { id: 1 }).await?;
    info!(?user, "got user");

    let page = client
        .list_users(ListUsersRequest {
            page: 1,
            page_size: 10,
        })
        .await?;
    info!(total = page.total, "listed users");

    let article = client
        .update_article(UpdateArticleRequest {
            id: 1,
            token: Some("Bearer my-token".to_string()),
            title: "New Article".to_string(),
            content: "This is the content".to_string(),
        })
        .await?;
    info!(?article, "updated article");

    client.delete_user(DeleteUserRequest { id: 2 }).await?;
    info!(id = 2, "deleted user");

    if let Err(error) = client.delete_user(DeleteUserRequest { id: 2 }).await {
        warn!(%error, status = ?error.status(), "second delete rejected");
    }

    client.trigger_task().await?;
    info!("task triggered");

    Ok(())
}
