// GET /about

use virgule::axum::response::{Html, IntoResponse, Response};
use virgule::RequestContext;

pub async fn get(_ctx: RequestContext) -> Response {
    Html("<h1>About</h1>").into_response()
}
