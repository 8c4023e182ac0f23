use axum::{
    extract::{Query as AxumQuery, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use virgule::{
    Config, HandlerFn, HandlerModule, HandlerRegistry, PageLoader, QueryParams, RequestContext,
    RouteTree,
};

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    tree: Arc<RouteTree>,
    registry: Arc<HandlerRegistry>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    println!("virgule starting...");

    let config = Config::load_default().unwrap_or_else(|e| {
        eprintln!("Failed to load config: {}, using defaults", e);
        Config::default()
    });

    println!(
        "Port: {}, Pages: {}",
        config.server.port, config.routing.pages_dir
    );

    // Discover routes from files in the pages directory
    let mut loader = PageLoader::with_config(&config.routing);
    match loader.discover_routes() {
        Ok(count) => {
            println!("Discovered {} routes", count);
            for route in loader.list_routes() {
                println!("  {} -> page", route);
            }
        }
        Err(e) => {
            // A conflicting route set cannot be served; fix pages/ and restart
            eprintln!("Failed to discover routes: {:#}", e);
            std::process::exit(1);
        }
    }

    // Register compiled handlers for the discovered routes
    let mut registry = HandlerRegistry::new();
    register_default_handlers(&mut registry);

    let state = AppState {
        tree: Arc::new(loader.into_tree()),
        registry: Arc::new(registry),
    };

    let app = Router::new()
        .route("/", any(index_handler))
        .route("/*path", any(page_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    println!("Server running at http://{}", addr);
    axum::serve(listener, app).await.unwrap();
}

/// Register compiled Maud handlers for the routes shipped under pages/
fn register_default_handlers(registry: &mut HandlerRegistry) {
    let index: HandlerFn = Arc::new(|_ctx| {
        Box::pin(async {
            let markup = maud::html! {
                (maud::DOCTYPE)
                html lang="en" {
                    head {
                        meta charset="UTF-8";
                        title { "Virgule" }
                    }
                    body {
                        h1 { "Welcome to Virgule" }
                        p { "Routes come from the pages/ directory; handlers are compiled in." }
                    }
                }
            };
            Html(markup.into_string()).into_response()
        })
    });
    registry.register("index.rs", HandlerModule::new().export("get", index));

    let about: HandlerFn = Arc::new(|_ctx| {
        Box::pin(async {
            let markup = maud::html! {
                h1 { "About" }
                p { "A file-system router: the pages/ layout is the route table." }
            };
            Html(markup.into_string()).into_response()
        })
    });
    registry.register("about.rs", HandlerModule::new().export("get", about));

    let show_user: HandlerFn = Arc::new(|ctx| {
        Box::pin(async move {
            let id = ctx.param_str("id").unwrap_or("unknown");
            let markup = maud::html! {
                h1 { "User " (id) }
                p { "Profile for user " (id) "." }
            };
            Html(markup.into_string()).into_response()
        })
    });
    let delete_user: HandlerFn = Arc::new(|ctx| {
        Box::pin(async move {
            let id = ctx.param_str("id").unwrap_or("unknown");
            info!("Deleting user {}", id);
            StatusCode::NO_CONTENT.into_response()
        })
    });
    registry.register(
        "users/[id].rs",
        HandlerModule::new()
            .export("get", show_user)
            .export("del", delete_user),
    );

    let docs: HandlerFn = Arc::new(|ctx| {
        Box::pin(async move {
            let segments = ctx.param_segments("slug").unwrap_or(&[]);
            let title = if segments.is_empty() {
                "Documentation".to_string()
            } else {
                segments.join(" / ")
            };
            let markup = maud::html! {
                h1 { (title) }
                p { "Serving " (segments.len()) " nested section(s)." }
            };
            Html(markup.into_string()).into_response()
        })
    });
    registry.register("docs/[[...slug]].rs", HandlerModule::new().export("get", docs));
}

async fn index_handler(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    query: AxumQuery<QueryParams>,
) -> Response {
    dispatch_route(&state, "/", method, headers, query.0).await
}

async fn page_handler(
    State(state): State<AppState>,
    axum::extract::Path(path): axum::extract::Path<String>,
    method: Method,
    headers: HeaderMap,
    query: AxumQuery<QueryParams>,
) -> Response {
    let route = format!("/{}", path);
    dispatch_route(&state, &route, method, headers, query.0).await
}

/// Resolve a request path through the route tree and invoke the matching
/// handler export
async fn dispatch_route(
    state: &AppState,
    route: &str,
    method: Method,
    headers: HeaderMap,
    query: QueryParams,
) -> Response {
    // A miss is the ordinary outcome for most request paths
    let Some(hit) = state.tree.match_route(route) else {
        return error_response(404, "Page Not Found", &format!("Route '{}' not found", route));
    };

    let Some(module) = state.registry.module(hit.file_path) else {
        warn!("No handler module registered for {}", hit.file_path);
        return error_response(404, "Page Not Found", &format!("Route '{}' not found", route));
    };

    let Some(handler) = module.handler_for(&method) else {
        let allow = module
            .available_methods()
            .iter()
            .map(|m| m.as_str().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let mut response = error_response(
            405,
            "Method Not Allowed",
            &format!("Route '{}' does not accept {}", route, method),
        );
        if let Ok(value) = HeaderValue::from_str(&allow) {
            response.headers_mut().insert(header::ALLOW, value);
        }
        return response;
    };
    let handler = handler.clone();

    let ctx = RequestContext::new(method, route.to_string(), query, headers, hit.params);
    handler(ctx).await
}

fn error_response(status: u16, title: &str, message: &str) -> Response {
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head><title>{title}</title></head>
<body>
  <h1>{status} {title}</h1>
  <p>{message}</p>
  <a href="/">Go Home</a>
</body>
</html>"#,
        status = status,
        title = title,
        message = message
    );
    (
        axum::http::StatusCode::from_u16(status).unwrap(),
        Html(html),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_state() -> AppState {
        let mut tree = RouteTree::new();
        tree.insert("index.rs").unwrap();
        tree.insert("users/[id].rs").unwrap();

        let mut registry = HandlerRegistry::new();
        register_default_handlers(&mut registry);

        AppState {
            tree: Arc::new(tree),
            registry: Arc::new(registry),
        }
    }

    async fn dispatch(state: &AppState, method: Method, route: &str) -> Response {
        dispatch_route(
            state,
            route,
            method,
            HeaderMap::new(),
            QueryParams::new(),
        )
        .await
    }

    #[tokio::test]
    async fn test_unrouted_path_is_404() {
        let state = demo_state();
        let response = dispatch(&state, Method::GET, "/missing").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unsupported_method_is_405_with_allow() {
        let state = demo_state();
        let response = dispatch(&state, Method::POST, "/users/1").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let allow = response.headers().get(header::ALLOW).unwrap();
        let allow = allow.to_str().unwrap();
        assert!(allow.contains("GET"));
        assert!(allow.contains("DELETE"));
    }

    #[tokio::test]
    async fn test_matched_route_invokes_handler() {
        let state = demo_state();
        let response = dispatch(&state, Method::GET, "/users/1").await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = dispatch(&state, Method::DELETE, "/users/1").await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
