// Virgule - file-system routing for Rust web services
// Maps a pages/ directory onto HTTP routes and dispatches to registered handlers

pub mod config;
pub mod handler;
pub mod page_loader;
pub mod request_context;

// Re-export framework types
pub use config::Config;
pub use handler::{handler_name, HandlerFn, HandlerModule, HandlerRegistry};
pub use page_loader::PageLoader;
pub use request_context::{QueryParams, RequestContext};

// Re-export the route tree core
pub use virgule_router::{ParamValue, Params, RouteConflict, RouteMatch, RouteTree};

// Re-export commonly used types from dependencies
pub use axum;
pub use axum::http::StatusCode;
