// GET /
//
// The file's location defines the route; virgule-server registers the
// compiled handler for "index.rs" under the same export names.

use virgule::axum::response::{Html, IntoResponse, Response};
use virgule::RequestContext;

pub async fn get(_ctx: RequestContext) -> Response {
    Html("<h1>Welcome to Virgule</h1>").into_response()
}
