// File: src/handler.rs
// Purpose: Handler modules keyed by route file, with method-derived export names

use axum::http::Method;
use axum::response::Response;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request_context::RequestContext;

/// An async request handler: the compiled counterpart of one exported
/// function in a route file.
pub type HandlerFn =
    Arc<dyn Fn(RequestContext) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync>;

/// Methods probed by [`HandlerModule::available_methods`]: the common verbs
/// plus the WebDAV set whose export names are irregular.
const PROBED_METHODS: &[&str] = &[
    "GET",
    "HEAD",
    "POST",
    "PUT",
    "DELETE",
    "CONNECT",
    "OPTIONS",
    "TRACE",
    "PATCH",
    "M-SEARCH",
    "MK-ACTIVITY",
    "MK-CALENDAR",
    "MK-COL",
    "PROPFIND",
    "PROPPATCH",
];

/// The export name a route file uses for a given HTTP method.
///
/// `DELETE` maps to `del` to stay a legal function name, and the dashed
/// WebDAV methods are snake-cased; everything else is just lowercased.
pub fn handler_name(method: &Method) -> String {
    match method.as_str() {
        "DELETE" => "del".to_string(),
        "M-SEARCH" => "m_search".to_string(),
        "MK-ACTIVITY" => "mk_activity".to_string(),
        "MK-CALENDAR" => "mk_calendar".to_string(),
        "MK-COL" => "mk_col".to_string(),
        "PROPFIND" => "prop_find".to_string(),
        "PROPPATCH" => "prop_patch".to_string(),
        other => other.to_ascii_lowercase(),
    }
}

/// The named handler functions one route file exports.
#[derive(Clone, Default)]
pub struct HandlerModule {
    exports: HashMap<String, HandlerFn>,
}

impl HandlerModule {
    /// Create an empty module
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under an export name (builder style)
    pub fn export(mut self, name: impl Into<String>, handler: HandlerFn) -> Self {
        self.exports.insert(name.into(), handler);
        self
    }

    /// Look up a handler by export name
    pub fn get(&self, name: &str) -> Option<&HandlerFn> {
        self.exports.get(name)
    }

    /// Look up the handler serving an HTTP method
    pub fn handler_for(&self, method: &Method) -> Option<&HandlerFn> {
        self.get(&handler_name(method))
    }

    /// The HTTP methods this module can serve, derived from its exports
    pub fn available_methods(&self) -> Vec<Method> {
        PROBED_METHODS
            .iter()
            .filter_map(|name| Method::from_bytes(name.as_bytes()).ok())
            .filter(|method| self.exports.contains_key(&handler_name(method)))
            .collect()
    }
}

impl std::fmt::Debug for HandlerModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut exports: Vec<&String> = self.exports.keys().collect();
        exports.sort();
        f.debug_struct("HandlerModule")
            .field("exports", &exports)
            .finish()
    }
}

/// Handler modules keyed by the route file they serve, populated at
/// startup and read-only afterwards.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    modules: HashMap<String, HandlerModule>,
}

impl HandlerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a module to a route file path
    pub fn register(&mut self, file_path: impl Into<String>, module: HandlerModule) {
        self.modules.insert(file_path.into(), module);
    }

    /// The module registered for a route file, if any
    pub fn module(&self, file_path: &str) -> Option<&HandlerModule> {
        self.modules.get(file_path)
    }

    /// Number of registered modules
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether no modules are registered
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    fn noop() -> HandlerFn {
        Arc::new(|_ctx| Box::pin(async { StatusCode::NO_CONTENT.into_response() }))
    }

    #[test]
    fn test_handler_name_mapping() {
        assert_eq!(handler_name(&Method::GET), "get");
        assert_eq!(handler_name(&Method::PATCH), "patch");
        assert_eq!(handler_name(&Method::DELETE), "del");
        assert_eq!(
            handler_name(&Method::from_bytes(b"M-SEARCH").unwrap()),
            "m_search"
        );
        assert_eq!(
            handler_name(&Method::from_bytes(b"PROPFIND").unwrap()),
            "prop_find"
        );
    }

    #[test]
    fn test_available_methods_reflect_exports() {
        let module = HandlerModule::new()
            .export("get", noop())
            .export("del", noop());

        let methods = module.available_methods();
        assert!(methods.contains(&Method::GET));
        assert!(methods.contains(&Method::DELETE));
        assert!(!methods.contains(&Method::POST));
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = HandlerRegistry::new();
        registry.register("users/[id].rs", HandlerModule::new().export("get", noop()));

        let module = registry.module("users/[id].rs").unwrap();
        assert!(module.handler_for(&Method::GET).is_some());
        assert!(module.handler_for(&Method::POST).is_none());
        assert!(registry.module("missing.rs").is_none());
    }
}
