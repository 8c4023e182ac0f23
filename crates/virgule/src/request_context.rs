// File: src/request_context.rs
// Purpose: Request context passed to route handlers

use axum::http::{HeaderMap, Method};
use std::collections::HashMap;
use virgule_router::{ParamValue, Params};

/// Query parameters from the URL (?key=value)
pub type QueryParams = HashMap<String, String>;

/// Everything a route handler gets to see about the request it serves.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// HTTP method (GET, POST, PUT, DELETE, etc.)
    pub method: Method,

    /// Request path
    pub path: String,

    /// Query parameters from the URL
    pub query: QueryParams,

    /// Request headers
    pub headers: HeaderMap,

    /// Path parameters bound by the route tree
    pub params: Params,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(
        method: Method,
        path: String,
        query: QueryParams,
        headers: HeaderMap,
        params: Params,
    ) -> Self {
        Self {
            method,
            path,
            query,
            headers,
            params,
        }
    }

    /// Get a path parameter by name
    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Get a dynamic-segment parameter as a string
    pub fn param_str(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(ParamValue::as_str)
    }

    /// Get a catch-all parameter as a segment sequence
    pub fn param_segments(&self, name: &str) -> Option<&[String]> {
        self.params.get(name).and_then(ParamValue::as_segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_accessors() {
        let mut params = Params::new();
        params.insert("id".to_string(), ParamValue::Single("42".to_string()));
        params.insert(
            "rest".to_string(),
            ParamValue::Many(vec!["a".to_string(), "b".to_string()]),
        );

        let ctx = RequestContext::new(
            Method::GET,
            "/users/42".to_string(),
            QueryParams::new(),
            HeaderMap::new(),
            params,
        );

        assert_eq!(ctx.param_str("id"), Some("42"));
        assert_eq!(ctx.param_str("rest"), None);
        assert_eq!(
            ctx.param_segments("rest"),
            Some(&["a".to_string(), "b".to_string()][..])
        );
        assert!(ctx.param("missing").is_none());
    }
}
