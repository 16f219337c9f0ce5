//! `#[derive(Binding)]` end to end: field tables, encoding and decoding.

use assert2::{check, let_assert};
use serde::{Deserialize, Serialize};
use typed_rpc::{
    Binding, Body, BodyMode, DecodeRequest, EncodeRequest, Error, FieldDescriptor, InboundRequest,
    Method, ParamLocation, PathTemplate, RequestEnvelope, Tagged,
};

#[derive(Debug, Default, Clone, PartialEq, Binding)]
struct UpdateItem {
    #[rpc(path)]
    id: u64,
    #[rpc(header = "Authorization")]
    token: String,
    #[rpc(body)]
    title: String,
    #[rpc(query = "notify")]
    notify: Option<bool>,
    #[rpc(skip)]
    cached: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Binding, Serialize, Deserialize)]
struct NewUser {
    name: String,
    age: Option<u8>,
}

#[derive(Debug, Default, Clone, PartialEq, Binding)]
struct Profile {
    name: String,
    #[rpc(skip)]
    secret: String,
}

#[derive(Debug, Default, Clone, PartialEq, Binding)]
struct Precedence {
    #[rpc(body = "b", header = "h", query = "q")]
    value: String,
    #[rpc(form = "page_size")]
    limit: u32,
    #[rpc(path = "type")]
    r#type: String,
}

#[derive(Debug, Default, Binding)]
#[rpc(encode_only)]
struct ClientOnly {
    #[rpc(path)]
    id: u64,
}

#[derive(Debug, Default, PartialEq, Binding)]
#[rpc(decode_only)]
struct ServerOnly {
    #[rpc(query)]
    page: u32,
}

fn encode(input: &impl EncodeRequest) -> RequestEnvelope {
    let mut envelope = RequestEnvelope::new();
    input.encode(&mut envelope).expect("encodable");
    envelope
}

/// Render `input` against `template` and read it back the way the server glue does.
fn over_the_wire(input: &impl EncodeRequest, template: &str) -> InboundRequest {
    let envelope = encode(input);
    let path_params: Vec<_> = envelope
        .path_params()
        .iter()
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    let base = url::Url::parse("http://localhost").expect("valid url");
    let request = envelope
        .into_request(Method::POST, &base, &PathTemplate::new(template))
        .expect("renderable request");

    InboundRequest::new(request.method().clone())
        .with_path_params(path_params)
        .with_query(request.url().query())
        .with_headers(request.headers().clone())
        .with_body(request.body().cloned().unwrap_or_default())
}

#[test]
fn field_table() {
    check!(
        UpdateItem::FIELDS
            == [
                FieldDescriptor::new("id", Some(typed_rpc::Binding::Path("id")), false),
                FieldDescriptor::new(
                    "token",
                    Some(typed_rpc::Binding::Header("Authorization")),
                    false
                ),
                FieldDescriptor::new("title", Some(typed_rpc::Binding::Body("title")), false),
                FieldDescriptor::new("notify", Some(typed_rpc::Binding::Query("notify")), true),
            ]
    );
    check!(UpdateItem::body_mode() == BodyMode::Fields);
    check!(UpdateItem::declares(ParamLocation::Header));

    check!(NewUser::FIELDS.iter().all(|field| field.binding.is_none()));
    check!(NewUser::body_mode() == BodyMode::Whole);
    check!(!NewUser::declares(ParamLocation::Header));

    check!(ServerOnly::body_mode() == BodyMode::None);
}

#[test]
fn first_tag_wins() {
    check!(
        Precedence::FIELDS
            == [
                FieldDescriptor::new("value", Some(typed_rpc::Binding::Query("q")), false),
                FieldDescriptor::new("limit", Some(typed_rpc::Binding::Query("page_size")), false),
                FieldDescriptor::new("type", Some(typed_rpc::Binding::Path("type")), false),
            ]
    );
}

#[test]
fn encodes_each_destination() {
    let envelope = encode(&UpdateItem {
        id: 7,
        token: "Bearer t".to_string(),
        title: "hello".to_string(),
        notify: None,
        cached: true,
    });

    check!(envelope.path_params().get("id").map(String::as_str) == Some("7"));
    check!(envelope.headers() == [("Authorization".to_string(), "Bearer t".to_string())]);
    check!(envelope.query_pairs().is_empty());
    let_assert!(Some(Body::Fields(fields)) = envelope.body());
    check!(serde_json::Value::Object(fields.clone()) == serde_json::json!({ "title": "hello" }));
}

#[test]
fn untagged_struct_encodes_whole() {
    let envelope = encode(&NewUser {
        name: "Ann".to_string(),
        age: None,
    });

    check!(envelope.path_params().is_empty());
    let_assert!(Some(Body::Fields(fields)) = envelope.body());
    check!(serde_json::Value::Object(fields.clone()) == serde_json::json!({ "name": "Ann" }));

    let envelope = encode(&NewUser {
        name: "Ann".to_string(),
        age: Some(31),
    });
    let_assert!(Some(Body::Fields(fields)) = envelope.body());
    let expected = serde_json::json!({ "name": "Ann", "age": 31 });
    check!(serde_json::Value::Object(fields.clone()) == expected);
}

#[test]
fn skipped_field_is_neither_sent_nor_read() {
    let envelope = encode(&Profile {
        name: "Ann".to_string(),
        secret: "s3cr3t".to_string(),
    });
    let_assert!(Some(Body::Fields(fields)) = envelope.body());
    check!(serde_json::Value::Object(fields.clone()) == serde_json::json!({ "name": "Ann" }));

    let inbound = InboundRequest::new(Method::POST)
        .with_body(r#"{"name":"Bob","secret":"leaked"}"#.as_bytes().to_vec());
    let_assert!(Ok(decoded) = Profile::decode(&inbound));
    check!(decoded == Profile { name: "Bob".to_string(), secret: String::new() });
}

#[test]
fn round_trip_reproduces_tagged_fields() {
    let input = UpdateItem {
        id: 42,
        token: "Bearer t".to_string(),
        title: "a title".to_string(),
        notify: Some(true),
        cached: true,
    };

    let inbound = over_the_wire(&input, "/items/{id}");
    let_assert!(Ok(decoded) = UpdateItem::decode(&inbound));

    check!(decoded == UpdateItem { cached: false, ..input });
}

#[test]
fn round_trip_of_whole_body() {
    let input = NewUser {
        name: "Ann".to_string(),
        age: Some(31),
    };

    let inbound = over_the_wire(&input, "/users");
    let_assert!(Ok(decoded) = NewUser::decode(&inbound));
    check!(decoded == input);
}

#[test]
fn round_trip_with_raw_identifier_and_form_alias() {
    let input = Precedence {
        value: "v".to_string(),
        limit: 25,
        r#type: "a b".to_string(),
    };

    let inbound = over_the_wire(&input, "/kinds/{type}");
    check!(inbound.query_param("page_size") == Some("25"));
    check!(inbound.query_param("q") == Some("v"));
    check!(inbound.body().is_empty());
}

#[test]
fn encode_only_and_decode_only() {
    let envelope = encode(&ClientOnly { id: 1 });
    check!(envelope.path_params().get("id").map(String::as_str) == Some("1"));

    let inbound = InboundRequest::new(Method::GET).with_query(Some("page=3"));
    let_assert!(Ok(decoded) = ServerOnly::decode(&inbound));
    check!(decoded == ServerOnly { page: 3 });
}

#[test]
fn scalar_parse_failure_names_the_field() {
    let inbound = InboundRequest::new(Method::GET).with_query(Some("notify=maybe"));
    let_assert!(Err(Error::Bind { location, name, .. }) = UpdateItem::decode(&inbound));
    check!(location == ParamLocation::Query);
    check!(name == "notify");
}

#[test]
fn missing_values_keep_defaults() {
    let inbound = InboundRequest::new(Method::GET).with_query(Some("unrelated=1"));
    let_assert!(Ok(decoded) = UpdateItem::decode(&inbound));
    check!(decoded == UpdateItem::default());
}
