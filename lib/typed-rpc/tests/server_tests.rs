//! Wrapped handlers routed through axum, exercised with `oneshot`.

use std::sync::{Arc, Mutex};

use assert2::check;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::MethodFilter;
use http_body_util::BodyExt;
use serde::{Deserialize, Serialize};
use tower::ServiceExt;
use typed_rpc::server::{
    ErrorBody, RouterExt, wrap_action, wrap_consumer, wrap_getter, wrap_handler,
};
use typed_rpc::{Binding, Error, InboundRequest, Result};

#[derive(Debug, Default, Clone, PartialEq, Binding)]
struct UpdateItem {
    #[rpc(path)]
    id: u64,
    #[rpc(header = "Authorization")]
    token: String,
    #[rpc(body)]
    title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Item {
    id: u64,
    title: String,
}

#[derive(Debug, Default, Clone, PartialEq, Binding, Serialize, Deserialize)]
struct NewUser {
    name: String,
    email: String,
}

#[derive(Debug, Default, Clone, PartialEq, Binding, Serialize)]
struct Search {
    #[rpc(query = "q")]
    text: String,
    #[rpc(query)]
    page: Option<u32>,
    #[rpc(header = "X-Trace")]
    trace: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Binding, Serialize)]
struct GetItem {
    #[rpc(path)]
    id: u64,
    #[rpc(query)]
    verbose: bool,
    #[rpc(body)]
    note: String,
    #[rpc(header = "X-Tenant")]
    tenant: Option<String>,
}

#[derive(Debug, Default, Binding)]
struct DeleteUser {
    #[rpc(path)]
    id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Health {
    status: String,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("item {_0} not found")]
struct NotFound(#[error(not(source))] u64);

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.expect("infallible");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("readable body")
        .to_bytes()
        .to_vec();
    (status, body)
}

fn json<T: for<'de> Deserialize<'de>>(body: &[u8]) -> T {
    serde_json::from_slice(body).expect("json body")
}

async fn update_item(input: UpdateItem) -> Result<Item> {
    Ok(Item {
        id: input.id,
        title: format!("{} ({})", input.title, input.token),
    })
}

#[tokio::test]
async fn update_item_scenario() {
    let app = Router::new().rpc(MethodFilter::PUT, "/items/{id}", wrap_handler(update_item));

    let request = Request::builder()
        .method("PUT")
        .uri("/items/7")
        .header("authorization", "Bearer secret")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"title":"hello"}"#))
        .expect("valid request");

    let (status, body) = send(app, request).await;
    check!(status == StatusCode::OK);
    check!(json::<Item>(&body) == Item { id: 7, title: "hello (Bearer secret)".to_string() });
}

#[tokio::test]
async fn colon_placeholders_are_translated() {
    let app = Router::new().rpc(MethodFilter::PUT, "/items/:id", wrap_handler(update_item));

    let request = Request::builder()
        .method("PUT")
        .uri("/items/9")
        .body(Body::empty())
        .expect("valid request");

    let (status, body) = send(app, request).await;
    check!(status == StatusCode::OK);
    check!(json::<Item>(&body).id == 9);
}

#[tokio::test]
async fn path_only_request_leaves_other_fields_default() {
    let app = Router::new().rpc(
        MethodFilter::GET,
        "/items/{id}",
        wrap_handler(|input: GetItem| async move { Ok::<_, Error>(input) }),
    );

    let request = Request::builder()
        .uri("/items/5")
        .body(Body::empty())
        .expect("valid request");

    let (status, body) = send(app, request).await;
    check!(status == StatusCode::OK);
    check!(
        json::<serde_json::Value>(&body)
            == serde_json::json!({ "id": 5, "verbose": false, "note": "", "tenant": null })
    );
}

#[tokio::test]
async fn every_location_is_bound() {
    let app = Router::new().rpc(
        MethodFilter::POST,
        "/items/{id}",
        wrap_handler(|input: GetItem| async move { Ok::<_, Error>(input) }),
    );

    let request = Request::builder()
        .method("POST")
        .uri("/items/5?verbose=true")
        .header("x-tenant", "acme")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"note":"hi","ignored":1}"#))
        .expect("valid request");

    let (status, body) = send(app, request).await;
    check!(status == StatusCode::OK);
    check!(
        json::<serde_json::Value>(&body)
            == serde_json::json!({ "id": 5, "verbose": true, "note": "hi", "tenant": "acme" })
    );
}

#[tokio::test]
async fn query_and_headers() {
    let app = Router::new().rpc(
        MethodFilter::GET,
        "/search",
        wrap_handler(|input: Search| async move { Ok::<_, Error>(input) }),
    );

    let request = Request::builder()
        .uri("/search?q=rust+lang&page=2")
        .header("X-Trace", "abc")
        .body(Body::empty())
        .expect("valid request");

    let (status, body) = send(app, request).await;
    check!(status == StatusCode::OK);
    check!(
        json::<serde_json::Value>(&body)
            == serde_json::json!({ "text": "rust lang", "page": 2, "trace": "abc" })
    );
}

#[tokio::test]
async fn whole_body_from_json_and_form() {
    let app = Router::new().rpc(
        MethodFilter::POST,
        "/users",
        wrap_handler(|user: NewUser| async move { Ok::<_, Error>(user) }),
    );
    let expected = NewUser {
        name: "Ann".to_string(),
        email: "ann@example.com".to_string(),
    };

    let request = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"name":"Ann","email":"ann@example.com"}"#))
        .expect("valid request");
    let (status, body) = send(app.clone(), request).await;
    check!(status == StatusCode::OK);
    check!(json::<NewUser>(&body) == expected);

    let request = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("name=Ann&email=ann%40example.com"))
        .expect("valid request");
    let (status, body) = send(app, request).await;
    check!(status == StatusCode::OK);
    check!(json::<NewUser>(&body) == expected);
}

#[tokio::test]
async fn empty_body_is_not_an_error() {
    let app = Router::new().rpc(
        MethodFilter::POST,
        "/users",
        wrap_handler(|user: NewUser| async move { Ok::<_, Error>(user) }),
    );

    let request = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json")
        .body(Body::empty())
        .expect("valid request");

    let (status, body) = send(app, request).await;
    check!(status == StatusCode::OK);
    check!(json::<NewUser>(&body) == NewUser::default());
}

#[tokio::test]
async fn decode_errors_become_500() {
    let app = Router::new().rpc(MethodFilter::PUT, "/items/{id}", wrap_handler(update_item));

    let request = Request::builder()
        .method("PUT")
        .uri("/items/seven")
        .body(Body::empty())
        .expect("valid request");
    let (status, body) = send(app.clone(), request).await;
    check!(status == StatusCode::INTERNAL_SERVER_ERROR);
    check!(json::<ErrorBody>(&body).error.contains("path parameter 'id'"));

    let request = Request::builder()
        .method("PUT")
        .uri("/items/7")
        .header("content-type", "text/plain")
        .body(Body::from("hello"))
        .expect("valid request");
    let (status, body) = send(app.clone(), request).await;
    check!(status == StatusCode::INTERNAL_SERVER_ERROR);
    check!(json::<ErrorBody>(&body).error.contains("unsupported media type"));

    let request = Request::builder()
        .method("PUT")
        .uri("/items/7")
        .body(Body::from(r#"{"title": 12}"#))
        .expect("valid request");
    let (status, body) = send(app, request).await;
    check!(status == StatusCode::INTERNAL_SERVER_ERROR);
    check!(json::<ErrorBody>(&body).error.contains("title"));
}

#[tokio::test]
async fn handler_errors_go_through_the_error_handler() {
    let find = wrap_handler(|input: DeleteUser| async move {
        Err::<Item, _>(Error::service(NotFound(input.id)))
    });

    let default_app = Router::new().rpc(MethodFilter::GET, "/items/{id}", find.clone());
    let request = Request::builder()
        .uri("/items/3")
        .body(Body::empty())
        .expect("valid request");
    let (status, body) = send(default_app, request).await;
    check!(status == StatusCode::INTERNAL_SERVER_ERROR);
    check!(json::<ErrorBody>(&body).error == "item 3 not found");

    let mapped = find.with_error_handler(|err: Error| {
        let status = if err.downcast_service_ref::<NotFound>().is_some() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::BAD_REQUEST
        };
        (status, err.to_string()).into_response()
    });
    let app = Router::new().rpc(MethodFilter::GET, "/items/{id}", mapped);

    let request = Request::builder()
        .uri("/items/3")
        .body(Body::empty())
        .expect("valid request");
    let (status, body) = send(app.clone(), request).await;
    check!(status == StatusCode::NOT_FOUND);
    check!(body == b"item 3 not found");

    let request = Request::builder()
        .uri("/items/x")
        .body(Body::empty())
        .expect("valid request");
    let (status, _) = send(app, request).await;
    check!(status == StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn custom_decoder_and_encoder() {
    let wrapped = wrap_handler(|id: DeleteUser| async move { Ok::<_, Error>(id.id * 2) })
        .with_decoder(|request: &InboundRequest| {
            let raw = request.header("x-id").unwrap_or("0");
            let id = raw.parse().map_err(|e| Error::invalid_request(format!("{e}")))?;
            Ok(DeleteUser { id })
        })
        .with_encoder(|output: u64| -> Result<Response> {
            Ok((StatusCode::CREATED, output.to_string()).into_response())
        });
    let app = Router::new().rpc(MethodFilter::POST, "/double", wrapped);

    let request = Request::builder()
        .method("POST")
        .uri("/double")
        .header("x-id", "21")
        .body(Body::empty())
        .expect("valid request");
    let (status, body) = send(app, request).await;
    check!(status == StatusCode::CREATED);
    check!(body == b"42");
}

#[tokio::test]
async fn value_decoder_checks_the_shape() {
    let wrapped = wrap_handler(|user: NewUser| async move { Ok::<_, Error>(user.name) })
        .with_value_decoder(|request: &InboundRequest| {
            Ok(serde_json::json!({
                "name": request.query_param("name").unwrap_or_default(),
                "email": request.query_param("email").map(str::len),
            }))
        });
    let app = Router::new().rpc(MethodFilter::GET, "/users", wrapped);

    let request = Request::builder()
        .uri("/users?name=Ann&email=a")
        .body(Body::empty())
        .expect("valid request");
    let (status, body) = send(app, request).await;
    check!(status == StatusCode::INTERNAL_SERVER_ERROR);
    check!(json::<ErrorBody>(&body).error.contains("mismatching value"));
}

#[tokio::test]
async fn getter_consumer_and_action() {
    let deleted = Arc::new(Mutex::new(Vec::new()));
    let triggered = Arc::new(Mutex::new(0_u32));

    let app = Router::new()
        .rpc(
            MethodFilter::GET,
            "/health",
            wrap_getter(|| async { Ok::<_, Error>(Health { status: "ok".to_string() }) }),
        )
        .rpc(
            MethodFilter::DELETE,
            "/users/{id}",
            wrap_consumer({
                let deleted = Arc::clone(&deleted);
                move |input: DeleteUser| {
                    deleted.lock().expect("lock").push(input.id);
                    async { Ok::<_, Error>(()) }
                }
            }),
        )
        .rpc(
            MethodFilter::POST,
            "/tasks",
            wrap_action({
                let triggered = Arc::clone(&triggered);
                move || {
                    *triggered.lock().expect("lock") += 1;
                    async { Ok::<_, Error>(()) }
                }
            }),
        );

    let request = Request::builder()
        .uri("/health")
        .body(Body::from("ignored"))
        .expect("valid request");
    let (status, body) = send(app.clone(), request).await;
    check!(status == StatusCode::OK);
    check!(json::<Health>(&body).status == "ok");

    let request = Request::builder()
        .method("DELETE")
        .uri("/users/12")
        .body(Body::empty())
        .expect("valid request");
    let (status, body) = send(app.clone(), request).await;
    check!(status == StatusCode::OK);
    check!(body == b"{}");
    check!(*deleted.lock().expect("lock") == vec![12]);

    let request = Request::builder()
        .method("POST")
        .uri("/tasks")
        .body(Body::empty())
        .expect("valid request");
    let (status, body) = send(app, request).await;
    check!(status == StatusCode::OK);
    check!(body == b"{}");
    check!(*triggered.lock().expect("lock") == 1);
}

#[tokio::test]
async fn unrouted_method_is_rejected_by_the_router() {
    let app = Router::new().rpc(MethodFilter::PUT, "/items/{id}", wrap_handler(update_item));

    let request = Request::builder()
        .method("GET")
        .uri("/items/7")
        .body(Body::empty())
        .expect("valid request");
    let (status, _) = send(app, request).await;
    check!(status == StatusCode::METHOD_NOT_ALLOWED);
}
