use std::convert::Infallible;

use axum::{
    extract::{Request, State, WebSocketUpgrade},
    response::{IntoResponse, Response},
    Router,
};
use tower::ServiceExt;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use umami_shared::routes;
use url::Url;

pub mod config;
pub mod error;
pub mod proxy;

use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub upstream: Url,
    bundle: ServeDir<ServeFile>,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        // Redirects belong to the browser, not the proxy.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        let bundle = ServeDir::new(&config.dist_dir)
            .fallback(ServeFile::new(config.dist_dir.join("index.html")));
        Ok(Self {
            client,
            upstream: config.upstream.clone(),
            bundle,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .fallback(dispatch)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Control plane paths go upstream, everything else is the static bundle.
async fn dispatch(
    State(state): State<AppState>,
    ws: Option<WebSocketUpgrade>,
    req: Request,
) -> Response {
    if routes::is_upstream_path(req.uri().path()) {
        return proxy::forward(&state, ws, req).await.into_response();
    }
    let served: Result<_, Infallible> = state.bundle.clone().oneshot(req).await;
    match served {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}
