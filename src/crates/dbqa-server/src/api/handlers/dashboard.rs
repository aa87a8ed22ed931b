//! Embedded dashboard handler.

use axum::response::Html;

/// Handler for `GET /`: the chat dashboard, compiled into the binary.
pub async fn dashboard() -> Html<&'static str> {
    Html(include_str!("../../../assets/dashboard.html"))
}
