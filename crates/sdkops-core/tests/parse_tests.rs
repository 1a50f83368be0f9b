use sdkops_core::error::ParseError;
use sdkops_core::parse::{self, document::Document};
use sdkops_core::parse::operation::HttpMethod;
use sdkops_core::parse::parameter::ParameterLocation;
use serde_json::json;

const SHOP: &str = include_str!("fixtures/shop.yaml");
const ITEMS: &str = include_str!("fixtures/items.json");
const INVALID_STATUS: &str = include_str!("fixtures/invalid-status.yaml");

fn shop() -> Document {
    parse::from_yaml(SHOP).expect("should parse shop.yaml")
}

#[test]
fn parse_shop_yaml() {
    let doc = shop();
    assert_eq!(doc.openapi_version, "3.1.0");
    assert_eq!(doc.info.title, "Shop API");
    assert_eq!(doc.info.version, "2.1.0");
    assert_eq!(
        doc.paths.iter().map(|p| p.pattern.as_str()).collect::<Vec<_>>(),
        vec!["/orders", "/orders/{orderId}", "/orders/{orderId}/receipt", "/legacy"]
    );
}

#[test]
fn parse_items_json() {
    let doc = parse::from_json(ITEMS).expect("should parse items.json");
    assert_eq!(doc.info.title, "Items");
    assert_eq!(doc.servers.len(), 1);
    assert_eq!(doc.servers[0].url, "https://items.example.com");
    assert_eq!(doc.servers[0].description, "production");
}

#[test]
fn server_variables_are_expanded() {
    let doc = shop();
    assert_eq!(doc.servers[0].url, "https://eu.shop.example.com");
    assert_eq!(doc.servers[1].url, "http://localhost:8000");
}

#[test]
fn operations_keep_declared_order_and_skip_unknown_keys() {
    let doc = shop();
    let orders = &doc.paths[0];
    let methods: Vec<HttpMethod> = orders.operations.iter().map(|o| o.method).collect();
    assert_eq!(methods, vec![HttpMethod::Get, HttpMethod::Post]);
}

#[test]
fn operation_id_defaults_from_route() {
    let doc = shop();
    let order = &doc.paths[1];
    assert_eq!(order.operations[0].operation_id, "orders_order_id_get");
    assert_eq!(order.operations[1].operation_id, "delete_order");
}

#[test]
fn path_parameters_are_required_and_inherited() {
    let doc = shop();
    for op in &doc.paths[1].operations {
        assert_eq!(op.parameters.len(), 1);
        let param = &op.parameters[0];
        assert_eq!(param.name, "orderId");
        assert_eq!(param.location, ParameterLocation::Path);
        assert!(param.required, "path parameters are always required");
    }
}

#[test]
fn referenced_parameter_is_resolved() {
    let doc = shop();
    let list = &doc.paths[0].operations[0];
    let limit = &list.parameters[0];
    assert_eq!(limit.name, "limit");
    assert_eq!(limit.location, ParameterLocation::Query);
    assert!(!limit.required);
    assert_eq!(limit.schema, Some(json!({"type": "integer", "default": 20})));
}

#[test]
fn request_body_contents_get_ids() {
    let doc = shop();
    let create = &doc.paths[0].operations[1];
    let body = create.request_body.as_ref().expect("should have a body");
    assert!(body.required);
    assert_eq!(body.description, "the order to place");
    assert_eq!(body.contents.len(), 1);
    assert_eq!(body.contents[0].media_type, "application/json");
    assert_eq!(body.contents[0].id, "create_order_request_body");
}

#[test]
fn referenced_response_is_resolved() {
    let doc = shop();
    let create = &doc.paths[0].operations[1];
    let codes: Vec<&str> = create.responses.iter().map(|r| r.status_code.as_str()).collect();
    assert_eq!(codes, vec!["201", "default"]);

    let created = &create.responses[0];
    assert_eq!(created.description, "created");
    assert_eq!(created.status(), Some(201));
    assert_eq!(created.contents[0].id, "create_order_response_201");
    assert_eq!(
        created.contents[0].schema,
        Some(json!({"$ref": "#/components/schemas/Order"}))
    );
    assert_eq!(create.responses[1].status(), None);
    assert_eq!(create.responses[1].contents[0].id, "create_order_response_default");
}

#[test]
fn redirect_without_content_becomes_plain_text() {
    let doc = shop();
    let legacy = &doc.paths[3].operations[0];
    let moved = &legacy.responses[0];
    assert_eq!(moved.contents.len(), 1);
    let content = &moved.contents[0];
    assert!(content.is_plain_text());
    assert_eq!(content.schema, Some(json!({"type": "string"})));
    assert_eq!(content.id, "legacy_response_301");
}

#[test]
fn response_without_content_stays_empty() {
    let doc = shop();
    let delete = &doc.paths[1].operations[1];
    assert!(delete.responses[0].contents.is_empty());
}

#[test]
fn components_are_reachable_from_the_document() {
    let doc = shop();
    assert!(doc.components()["schemas"]["Order"].is_object());
    assert_eq!(doc.raw()["openapi"], "3.1.0");
}

#[test]
fn rejects_swagger_2() {
    let err = parse::from_json(r#"{"openapi": "2.0", "info": {"title": "x", "version": "1"}}"#)
        .unwrap_err();
    assert!(matches!(err, ParseError::UnsupportedVersion(v) if v == "2.0"));
}

#[test]
fn rejects_missing_openapi_field() {
    let err = parse::from_json(r#"{"swagger": "2.0"}"#).unwrap_err();
    assert!(matches!(err, ParseError::MissingField(f) if f == "openapi"));
}

#[test]
fn rejects_invalid_status_code() {
    let err = parse::from_yaml(INVALID_STATUS).unwrap_err();
    assert!(matches!(err, ParseError::InvalidStatusCode(code) if code == "2XX"));
}

#[test]
fn dangling_parameter_ref_fails() {
    let input = json!({
        "openapi": "3.0.0",
        "info": {"title": "x", "version": "1"},
        "paths": {"/a": {"get": {
            "parameters": [{"$ref": "#/components/parameters/Missing"}],
            "responses": {}
        }}}
    });
    let err = parse::from_value(input).unwrap_err();
    assert!(matches!(err, ParseError::Resolve(_)));
}
