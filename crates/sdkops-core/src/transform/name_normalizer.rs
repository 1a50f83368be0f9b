use heck::ToSnakeCase;

/// PascalCase a snake_case name: `get_item_response_200` → `GetItemResponse200`.
///
/// Only the first letter of each `_`-separated part changes, so acronyms and
/// camelCase inside a part survive (`getUserByID_200` → `GetUserByID200`).
pub fn to_pascal(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect()
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Derive a snake_case operation id from a route and method.
///
/// Examples:
/// - `GET /` → `home_get`
/// - `GET /items/{itemId}` → `items_item_id_get`
/// - `POST /users/:userId/posts` → `users_user_id_posts_post`
pub fn operation_id_from_route(path: &str, method: &str) -> String {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    if trimmed.is_empty() {
        return format!("home_{method}");
    }

    let joined = trimmed
        .split('/')
        .map(strip_placeholder)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    let snake = joined.to_snake_case();
    let base = snake.trim_end_matches('_');
    if base.is_empty() {
        return format!("home_{method}");
    }
    format!("{base}_{method}")
}

/// `{itemId}` → `itemId`, `:itemId` → `itemId`, anything else unchanged.
fn strip_placeholder(segment: &str) -> &str {
    if let Some(inner) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        return inner;
    }
    segment.strip_prefix(':').unwrap_or(segment)
}

/// True for names made only of `a-z`, `0-9` and `_`, the form SDK names must take.
pub fn is_snake_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pascal() {
        assert_eq!(to_pascal("get_item_response_200"), "GetItemResponse200");
        assert_eq!(to_pascal("me_point"), "MePoint");
        assert_eq!(to_pascal("getItem_response_200"), "GetItemResponse200");
    }

    #[test]
    fn test_to_pascal_keeps_acronyms() {
        assert_eq!(to_pascal("getUserByID"), "GetUserByID");
        assert_eq!(to_pascal("api_getHTTPStatus_response_200"), "ApiGetHTTPStatusResponse200");
        assert_eq!(to_pascal("__shop__v2_"), "ShopV2");
    }

    #[test]
    fn test_route_root() {
        assert_eq!(operation_id_from_route("/", "get"), "home_get");
    }

    #[test]
    fn test_route_with_brace_placeholder() {
        assert_eq!(
            operation_id_from_route("/items/{itemId}", "get"),
            "items_item_id_get"
        );
    }

    #[test]
    fn test_route_with_colon_placeholder() {
        assert_eq!(
            operation_id_from_route("/users/:userId/posts", "post"),
            "users_user_id_posts_post"
        );
    }

    #[test]
    fn test_route_trailing_slash() {
        assert_eq!(operation_id_from_route("/health/", "head"), "health_head");
    }

    #[test]
    fn test_snake_identifier() {
        assert!(is_snake_identifier("my_sdk_2"));
        assert!(!is_snake_identifier("MySdk"));
        assert!(!is_snake_identifier("my-sdk"));
        assert!(!is_snake_identifier(""));
    }
}
