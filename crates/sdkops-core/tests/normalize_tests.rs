use sdkops_core::parse::ref_resolve::RefResolver;
use sdkops_core::transform::method_synth::content_type_name;
use sdkops_core::transform::name_normalizer::{operation_id_from_route, to_pascal};
use sdkops_core::transform::{CompileOptions, compile};
use sdkops_core::parse;
use serde_json::json;

#[test]
fn pointer_names_for_nested_properties() {
    let root = json!({
        "type": "object",
        "properties": {
            "customer": {
                "type": "object",
                "properties": {
                    "billing_address": {
                        "type": "object",
                        "properties": {"city": {"type": "string"}}
                    },
                    "tier": {"type": "string"}
                }
            }
        }
    });
    let mut resolver = RefResolver::new(&root);
    assert_eq!(
        resolver
            .name_from_pointer("#/properties/customer/properties/billing_address")
            .unwrap(),
        "customer_billing_address"
    );
    // a scalar target keeps the chain collected before it
    assert_eq!(
        resolver
            .name_from_pointer("#/properties/customer/properties/tier")
            .unwrap(),
        "customer_tier"
    );
}

#[test]
fn pointer_names_for_shared_sections() {
    let root = json!({
        "definitions": {
            "address": {"type": "object", "properties": {"city": {"type": "string"}}}
        },
        "components": {
            "schemas": {
                "OrderInfo": {"type": "object", "properties": {}},
                "Tags": {"type": "array", "items": {"type": "string"}}
            }
        }
    });
    let mut resolver = RefResolver::new(&root);
    assert_eq!(
        resolver.name_from_pointer("#/definitions/address").unwrap(),
        "address"
    );
    assert_eq!(
        resolver
            .name_from_pointer("#/components/schemas/OrderInfo")
            .unwrap(),
        "OrderInfo"
    );
    assert_eq!(
        resolver.name_from_pointer("#/components/schemas/Tags").unwrap(),
        ""
    );
    assert_eq!(resolver.name_from_pointer("#/").unwrap(), "");
}

#[test]
fn combined_names_are_pascal_cased() {
    assert_eq!(
        to_pascal("item_with_ref_customer_billing_address"),
        "ItemWithRefCustomerBillingAddress"
    );
    assert_eq!(to_pascal("ref_CustomerInfo"), "RefCustomerInfo");
    assert_eq!(to_pascal("getUserByID"), "GetUserByID");
    assert_eq!(to_pascal("shop_create_order_response_default"), "ShopCreateOrderResponseDefault");
}

#[test]
fn operation_ids_from_routes() {
    assert_eq!(operation_id_from_route("/", "get"), "home_get");
    assert_eq!(operation_id_from_route("/orders", "post"), "orders_post");
    assert_eq!(
        operation_id_from_route("/orders/{orderId}/lineItems", "get"),
        "orders_order_id_line_items_get"
    );
    assert_eq!(
        operation_id_from_route("/users/:userId", "delete"),
        "users_user_id_delete"
    );
}

#[test]
fn content_type_names_match_compiled_declarations() {
    let doc = parse::from_json(
        &json!({
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1"},
            "paths": {"/pets": {"post": {
                "requestBody": {"content": {"application/json": {"schema": {"type": "string"}}}},
                "responses": {}
            }}}
        })
        .to_string(),
    )
    .unwrap();
    let body = doc.paths[0].operations[0].request_body.as_ref().unwrap();
    assert_eq!(body.contents[0].id, "pets_post_request_body");
    assert_eq!(
        content_type_name("zoo", &body.contents[0], &doc).unwrap().as_deref(),
        Some("zoo_pets_post_request_body")
    );

    let ir = compile(&doc, &CompileOptions::new("zoo")).unwrap();
    assert_eq!(ir.declarations[0].name(), "zoo_pets_post_request_body");
}

#[test]
fn content_type_names_follow_refs_to_records() {
    let doc = parse::from_json(
        &json!({
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1"},
            "paths": {"/pets/{petID}": {"get": {
                "operationId": "getPetByID",
                "responses": {"200": {
                    "description": "ok",
                    "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}
                }}
            }}},
            "components": {"schemas": {"Pet": {"type": "object", "properties": {}}}}
        })
        .to_string(),
    )
    .unwrap();
    let content = &doc.paths[0].operations[0].responses[0].contents[0];
    assert_eq!(
        content_type_name("zoo", content, &doc).unwrap().as_deref(),
        Some("ZooGetPetByIDResponse200")
    );
}
