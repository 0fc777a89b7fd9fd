use axum::response::Html;

/// Serves the embedded signup page for `/` and for any unmatched path.
pub async fn landing_page() -> Html<&'static str> {
    Html(include_str!("../../assets/signup.html"))
}
