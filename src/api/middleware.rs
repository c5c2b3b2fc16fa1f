use axum::{
    body::Body,
    http::{Request, Uri},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::Span;

/// Record request routing fields on the current span so repository and
/// import logs correlate with the request that triggered them.
pub async fn enrich_current_span_middleware(req: Request<Body>, next: Next) -> Response {
    let uri: &Uri = req.uri();
    let current_span = Span::current();

    current_span.record("http.uri", uri.path());
    if let Some(query) = uri.query() {
        current_span.record("http.query", query);
    }

    next.run(req).await
}

/// Redirect `/api/prompts/` style paths to their canonical no-slash
/// form instead of 404ing them.
pub async fn strip_trailing_slash(req: Request<Body>, next: Next) -> Response {
    let redirect = {
        let uri = req.uri();
        match uri.path().strip_suffix('/') {
            Some(path) if !path.is_empty() => Some(match uri.query() {
                Some(query) => format!("{path}?{query}"),
                None => path.to_string(),
            }),
            _ => None,
        }
    };

    match redirect {
        Some(target) => Redirect::permanent(&target).into_response(),
        None => next.run(req).await,
    }
}
