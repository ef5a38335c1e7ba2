use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("invalid upstream target: {0}")]
    InvalidTarget(#[from] url::ParseError),
    #[error("cannot tunnel websocket over {0}")]
    UnsupportedScheme(String),
    #[error("unsupported method {0}")]
    Method(String),
    #[error("failed to read request body: {0}")]
    Body(#[source] axum::Error),
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Method(_) | ProxyError::Body(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "proxy error");
        (self.status(), self.to_string()).into_response()
    }
}
