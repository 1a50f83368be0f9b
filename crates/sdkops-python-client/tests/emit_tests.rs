use sdkops_core::Emitter;
use sdkops_core::ir::{MethodDeclaration, SdkIr};
use sdkops_core::parse;
use sdkops_core::transform::{CompileOptions, compile};
use sdkops_python_client::PythonClientEmitter;
use sdkops_python_client::emitters::client::method_signature;

const SHOP: &str = include_str!("../../sdkops-core/tests/fixtures/shop.yaml");

fn compile_shop() -> SdkIr {
    let doc = parse::from_yaml(SHOP).expect("should parse");
    let mut options = CompileOptions::new("shop");
    options.base_url = Some("http://localhost:8000".to_string());
    compile(&doc, &options).expect("should compile")
}

fn render_shop() -> String {
    let files = PythonClientEmitter.emit(&compile_shop()).expect("should emit");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "shop.py");
    files[0].content.clone()
}

fn method<'a>(ir: &'a SdkIr, name: &str) -> &'a MethodDeclaration {
    ir.methods.iter().find(|m| m.name == name).unwrap()
}

#[test]
fn emitter_id() {
    assert_eq!(PythonClientEmitter.id(), "python-client");
}

#[test]
fn optional_query_parameter_after_default() {
    let ir = compile_shop();
    insta::assert_snapshot!(
        method_signature(method(&ir, "list_orders")),
        @"def list_orders(self, limit: int = 20, status: str | None = None, headers: dict[str, str] | None = None) -> shop_list_orders_response_200:"
    );
}

#[test]
fn json_body_signature() {
    let ir = compile_shop();
    insta::assert_snapshot!(
        method_signature(method(&ir, "create_order")),
        @"def create_order(self, json: ShopCreateOrderRequestBody, headers: dict[str, str] | None = None) -> ShopCreateOrderResponse201 | ShopCreateOrderResponseDefault:"
    );
}

#[test]
fn path_parameter_signature() {
    let ir = compile_shop();
    insta::assert_snapshot!(
        method_signature(method(&ir, "get_receipt")),
        @r#"def get_receipt(self, orderId: str = "", headers: dict[str, str] | None = None) -> str:"#
    );
}

#[test]
fn module_header_and_instance() {
    let module = render_shop();
    assert!(module.starts_with("\"\"\"Shop API 2.1.0 client."));
    assert!(module.contains("from __future__ import annotations"));
    // delete_order returns Any
    assert!(module.contains("from typing import Any"));
    assert!(module.contains("import httpx"));
    assert!(module.contains("class Shop:"));
    assert!(module.contains("base_url=\"http://localhost:8000\","));
    assert!(module.contains(
        "self.headers: dict[str, str] = {\"user-agent\": \"shop\", \"accept\": \"application/json\"}"
    ));
    assert!(module.trim_end().ends_with("shop = Shop()"));
}

#[test]
fn records_and_aliases() {
    let module = render_shop();
    assert!(module.contains("class ShopCreateOrderResponse201(dict):"));
    assert!(module.contains(
        "    def __init__(self, total: float, id: str, customer: ShopCreateOrderResponse201Customer | None = None, notes: str | None = None) -> None:"
    ));
    assert!(module.contains("        super().__init__(id=id, total=total, customer=customer, notes=notes)"));
    assert!(module.contains("        self.total: float = total"));
    assert!(module.contains("shop_list_orders_response_200 = list[ShopListOrdersResponse200]"));
    assert!(module.contains("shop_get_receipt_response_200 = str"));

    // nested records come before the records that use them
    let customer = module.find("class ShopCreateOrderResponse201Customer(dict):").unwrap();
    let order = module.find("class ShopCreateOrderResponse201(dict):").unwrap();
    assert!(customer < order);
}

#[test]
fn auth_setters() {
    let module = render_shop();
    assert!(module.contains("    def auth(self, scheme: str, value: str) -> None:"));
    assert!(module.contains("        self.headers[\"authorization\"] = f\"{scheme} {value}\""));
    assert!(module.contains("    def deauth(self) -> None:"));
}

#[test]
fn transport_errors_become_synthetic_500() {
    let module = render_shop();
    assert!(module.contains("        except httpx.HTTPError as error:"));
    assert!(module.contains(
        "            message = f\"An unexpected error occurred while handling request to {request.url}. {error}\""
    ));
    assert!(module.contains(
        "                json={\"error\": {\"code\": \"unexpected\", \"message\": message}},"
    ));
}

#[test]
fn request_building() {
    let module = render_shop();
    assert!(module.contains("            f\"/orders/{orderId}/receipt\","));
    assert!(module.contains("        headers_combined[\"accept\"] = \"text/plain\""));
    assert!(module.contains("for key, value in { \"limit\": limit, \"status\": status }.items()"));
    assert!(module.contains("            json=json,"));
    assert!(module.contains("        return response.text"));
    assert!(module.contains("        return response.json()"));
    assert!(module.contains("            \"DELETE\","));
}

#[test]
fn docstrings_are_escaped() {
    let mut ir = compile_shop();
    ir.methods[0].summary = Some("say \"\"\"hi\"\"\"".to_string());
    let files = PythonClientEmitter.emit(&ir).unwrap();
    assert!(files[0].content.contains(r#"say \"\"\"hi\"\"\""#));
}

#[test]
fn empty_sdk_name_is_rejected() {
    let doc = parse::from_yaml(SHOP).unwrap();
    let ir = compile(&doc, &CompileOptions::default()).unwrap();
    assert!(PythonClientEmitter.emit(&ir).is_err());
}
