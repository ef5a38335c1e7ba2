//! Live execution log feed for the task shown in the log dialog.

use std::rc::Rc;

use futures::{channel::mpsc, lock::Mutex, StreamExt};
use umami_shared::{routes, Log, RecordId};
use wasm_bindgen::{prelude::*, JsCast};
use web_sys::{window, CloseEvent, Event, MessageEvent, WebSocket};

use crate::api::ApiError;

type Handler<E> = Closure<dyn FnMut(E)>;

/// An open log socket. Dropping it detaches the handlers and closes the
/// connection, so the owner's lifetime bounds the connection's.
pub struct LogStream {
    socket: WebSocket,
    snapshots: Rc<Mutex<mpsc::UnboundedReceiver<Log>>>,
    _on_open: Handler<Event>,
    _on_message: Handler<MessageEvent>,
    _on_error: Handler<Event>,
    _on_close: Handler<CloseEvent>,
}

impl std::fmt::Debug for LogStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogStream")
            .field("url", &self.socket.url())
            .finish()
    }
}

impl LogStream {
    pub fn open(app_id: &RecordId, task_id: &RecordId) -> Result<Self, ApiError> {
        let location = window()
            .ok_or_else(|| ApiError::Browser("no window".to_string()))?
            .location();
        let protocol = location.protocol().unwrap_or_default();
        let host = location
            .host()
            .map_err(|err| ApiError::Browser(format!("read host: {err:?}")))?;
        let url = socket_url(&protocol, &host, &routes::task_log_socket(app_id, task_id));

        let socket = WebSocket::new(&url)
            .map_err(|err| ApiError::Network(format!("open {url}: {err:?}")))?;
        let (sender, receiver) = mpsc::unbounded::<Log>();

        let on_open: Handler<Event> = {
            let url = url.clone();
            Closure::new(move |_: Event| {
                tracing::info!(%url, "log socket opened");
            })
        };
        let on_message: Handler<MessageEvent> = {
            let sender = sender.clone();
            Closure::new(move |event: MessageEvent| {
                let Some(payload) = event.data().as_string() else {
                    tracing::warn!("ignoring non-text log socket frame");
                    return;
                };
                match serde_json::from_str::<Log>(&payload) {
                    Ok(log) => {
                        let _ = sender.unbounded_send(log);
                    }
                    Err(err) => tracing::warn!(error = %err, "malformed log snapshot"),
                }
            })
        };
        let on_error: Handler<Event> = Closure::new(move |event: Event| {
            tracing::error!(event_type = %event.type_(), "log socket error");
        });
        let on_close: Handler<CloseEvent> = Closure::new(move |event: CloseEvent| {
            tracing::info!(code = event.code(), reason = %event.reason(), "log socket closed");
            sender.close_channel();
        });

        socket.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        socket.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        Ok(Self {
            socket,
            snapshots: Rc::new(Mutex::new(receiver)),
            _on_open: on_open,
            _on_message: on_message,
            _on_error: on_error,
            _on_close: on_close,
        })
    }

    /// Resolves with the next pushed snapshot, or `None` once the socket is
    /// gone. The future stays valid after the stream is dropped.
    pub fn next_snapshot(&self) -> impl std::future::Future<Output = Option<Log>> + 'static {
        let snapshots = Rc::clone(&self.snapshots);
        async move { snapshots.lock().await.next().await }
    }
}

impl Drop for LogStream {
    fn drop(&mut self) {
        self.socket.set_onopen(None);
        self.socket.set_onmessage(None);
        self.socket.set_onerror(None);
        self.socket.set_onclose(None);
        if let Err(err) = self.socket.close() {
            tracing::warn!(?err, "failed to close log socket");
        } else {
            tracing::info!(url = %self.socket.url(), "log socket released");
        }
    }
}

/// WebSocket URL for `path` on the page's own origin.
pub fn socket_url(page_protocol: &str, host: &str, path: &str) -> String {
    let scheme = if page_protocol == "https:" { "wss" } else { "ws" };
    format!("{scheme}://{host}{path}")
}
