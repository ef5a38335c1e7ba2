//! Forwarding of control plane requests, including log socket upgrades.

use axum::{
    body::{to_bytes, Body},
    extract::{
        ws::{Message, WebSocket},
        Request, WebSocketUpgrade,
    },
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message as UpstreamMessage;
use url::Url;

use crate::{error::ProxyError, AppState};

const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Headers that describe a single connection and must not be forwarded.
const HOP_BY_HOP: [&str; 9] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
];

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.iter().any(|h| name.eq_ignore_ascii_case(h))
}

pub async fn forward(
    state: &AppState,
    ws: Option<WebSocketUpgrade>,
    req: Request,
) -> Result<Response, ProxyError> {
    let target = upstream_url(&state.upstream, req.uri())?;
    if let Some(ws) = ws {
        let target = socket_url(&target)?;
        tracing::info!(%target, "tunnelling websocket");
        return Ok(ws.on_upgrade(move |socket| relay_socket(socket, target)));
    }
    forward_http(&state.client, target, req).await
}

/// Resolve the incoming path and query against the upstream base.
pub fn upstream_url(base: &Url, uri: &Uri) -> Result<Url, ProxyError> {
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    Ok(base.join(path_and_query)?)
}

/// Same target reached over the websocket scheme matching its transport.
pub fn socket_url(target: &Url) -> Result<Url, ProxyError> {
    let scheme = match target.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(ProxyError::UnsupportedScheme(other.to_string())),
    };
    let mut socket = target.clone();
    socket
        .set_scheme(scheme)
        .map_err(|()| ProxyError::UnsupportedScheme(target.scheme().to_string()))?;
    Ok(socket)
}

async fn forward_http(
    client: &reqwest::Client,
    target: Url,
    req: Request,
) -> Result<Response, ProxyError> {
    let (parts, body) = req.into_parts();
    let method = reqwest::Method::from_bytes(parts.method.as_str().as_bytes())
        .map_err(|_| ProxyError::Method(parts.method.to_string()))?;
    let body = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(ProxyError::Body)?;

    tracing::debug!(%method, %target, "forwarding request");
    let mut upstream = client.request(method, target);
    for (name, value) in parts.headers.iter() {
        if !is_hop_by_hop(name.as_str()) {
            upstream = upstream.header(name.as_str(), value.as_bytes());
        }
    }
    let reply = upstream.body(body).send().await?;

    let status = StatusCode::from_u16(reply.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut headers = HeaderMap::new();
    for (name, value) in reply.headers() {
        if is_hop_by_hop(name.as_str()) {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_str().as_bytes()),
            HeaderValue::from_bytes(value.as_bytes()),
        ) {
            headers.append(name, value);
        }
    }
    let bytes = reply.bytes().await?;

    Ok((status, headers, Body::from(bytes)).into_response())
}

async fn relay_socket(client: WebSocket, target: Url) {
    let upstream = match tokio_tungstenite::connect_async(target.as_str()).await {
        Ok((stream, _)) => stream,
        Err(err) => {
            tracing::error!(%target, error = %err, "upstream websocket connect failed");
            return;
        }
    };

    let (mut client_tx, mut client_rx) = client.split();
    let (mut upstream_tx, mut upstream_rx) = upstream.split();

    let to_upstream = async {
        while let Some(Ok(msg)) = client_rx.next().await {
            let msg = match msg {
                Message::Text(text) => UpstreamMessage::Text(text),
                Message::Binary(data) => UpstreamMessage::Binary(data),
                Message::Close(_) => break,
                Message::Ping(_) | Message::Pong(_) => continue,
            };
            if upstream_tx.send(msg).await.is_err() {
                break;
            }
        }
        let _ = upstream_tx.close().await;
    };

    let to_client = async {
        while let Some(Ok(msg)) = upstream_rx.next().await {
            let msg = match msg {
                UpstreamMessage::Text(text) => Message::Text(text),
                UpstreamMessage::Binary(data) => Message::Binary(data),
                UpstreamMessage::Close(_) => break,
                UpstreamMessage::Ping(_) | UpstreamMessage::Pong(_) | UpstreamMessage::Frame(_) => {
                    continue
                }
            };
            if client_tx.send(msg).await.is_err() {
                break;
            }
        }
        let _ = client_tx.close().await;
    };

    tokio::select! {
        _ = to_upstream => {}
        _ = to_client => {}
    }
    tracing::info!(%target, "websocket tunnel closed");
}
