use minijinja::context;
use sdkops_core::ir::{
    MethodDeclaration, MethodParameter, ParameterSource, ResponseKind, SdkIr, UrlTemplate,
};

use crate::type_mapper::{optional_type_to_python, python_literal, quote, type_ref_to_python};

pub fn client_context(ir: &SdkIr) -> minijinja::Value {
    let client = &ir.client;
    let headers: Vec<String> = client
        .headers
        .iter()
        .map(|(name, value)| format!("{}: {}", quote(name), quote(value)))
        .collect();

    context! {
        name => client.name.clone(),
        instance_name => client.instance_name.clone(),
        base_url => quote(client.base_url.as_deref().unwrap_or_default()),
        headers => format!("{{{}}}", headers.join(", ")),
        timeout => client.timeout_secs,
        auth_header => quote(&client.auth.header),
        set_method => client.auth.set_method.clone(),
        clear_method => client.auth.clear_method.clone(),
    }
}

pub fn method_contexts(ir: &SdkIr) -> Vec<minijinja::Value> {
    ir.methods.iter().map(method_to_ctx).collect()
}

fn method_to_ctx(method: &MethodDeclaration) -> minijinja::Value {
    let request = &method.request;

    let url = match &request.url {
        UrlTemplate::Literal { path } => quote(path),
        UrlTemplate::Interpolated { pattern, .. } => format!("f{}", quote(pattern)),
    };

    let query: Vec<String> = request
        .query_param_names
        .iter()
        .map(|name| format!("{}: {name}", quote(name)))
        .collect();

    let headers_param = method
        .parameters
        .iter()
        .find(|p| p.source == ParameterSource::Headers)
        .map_or("None", |p| p.name.as_str());

    context! {
        signature => method_signature(method),
        summary => method.summary.clone(),
        http_method => quote(request.method.as_str()),
        url => url,
        query => query,
        json => request.json_body_param.clone(),
        accept => request.accept_override.as_deref().map(quote),
        headers_param => headers_param,
        text => method.response_kind == ResponseKind::Text,
    }
}

/// The `def` line of a client method.
pub fn method_signature(method: &MethodDeclaration) -> String {
    let mut params = vec!["self".to_string()];
    let mut after_default = false;
    for param in &method.parameters {
        params.push(parameter_signature(param, after_default));
        after_default |= param.has_default;
    }
    format!(
        "def {}({}) -> {}:",
        method.name,
        params.join(", "),
        type_ref_to_python(&method.return_type)
    )
}

/// A parameter without a default that follows a defaulted one falls back to
/// `None`, since Python forbids the reverse order.
fn parameter_signature(param: &MethodParameter, after_default: bool) -> String {
    if !param.has_default {
        if after_default {
            return format!("{}: {} = None", param.name, optional_type_to_python(&param.param_type));
        }
        return format!("{}: {}", param.name, type_ref_to_python(&param.param_type));
    }
    let annotation = if param.default_value.is_null() {
        optional_type_to_python(&param.param_type)
    } else {
        type_ref_to_python(&param.param_type)
    };
    format!(
        "{}: {annotation} = {}",
        param.name,
        python_literal(&param.default_value)
    )
}
