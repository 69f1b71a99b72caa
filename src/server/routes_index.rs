//! Index retrieval route.
//!
//! Devices poll `GET /smil-index`; the dispatcher decides what to answer and
//! opens the file that is streamed back.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::server::AppContext;

pub fn index_routes() -> Router<AppContext> {
    Router::new().route("/smil-index", get(get_index))
}

async fn get_index(State(ctx): State<AppContext>, headers: HeaderMap) -> Response {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();
    let if_modified_since = headers
        .get(header::IF_MODIFIED_SINCE)
        .and_then(|h| h.to_str().ok());

    ctx.dispatcher
        .dispatch(user_agent, if_modified_since)
        .await
        .into_response()
}
