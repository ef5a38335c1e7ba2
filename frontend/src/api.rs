//! Calls to the control plane, issued with the browser's fetch.

use serde::{de::DeserializeOwned, Serialize};
use umami_shared::{routes, App, CreateAppRequest, Log, RecordId, SubmitTaskRequest, Task};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{window, Blob, HtmlAnchorElement, Request, RequestInit, Response, Url};

use crate::card::{SaveRequest, SaveTarget};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("server responded with {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("browser error: {0}")]
    Browser(String),
}

impl ApiError {
    fn browser(context: &str, err: JsValue) -> Self {
        ApiError::Browser(format!("{context}: {err:?}"))
    }

    /// Text the server sent along with a failure status, if any.
    pub fn server_text(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } if !body.trim().is_empty() => Some(body),
            _ => None,
        }
    }
}

pub async fn fetch_apps() -> Result<Vec<App>, ApiError> {
    get_json(&routes::apps()).await
}

pub async fn create_app(request: CreateAppRequest) -> Result<(), ApiError> {
    send_json("POST", &routes::apps(), &request).await
}

pub async fn fetch_tasks(app_id: RecordId) -> Result<Vec<Task>, ApiError> {
    get_json(&routes::tasks(&app_id)).await
}

/// Create or update a task's content. The response body is not used; callers
/// reload the task list instead.
pub async fn save_task(app_id: RecordId, request: SaveRequest) -> Result<(), ApiError> {
    match request.target {
        SaveTarget::Create => send_json("POST", &routes::tasks(&app_id), &request.body).await,
        SaveTarget::Update(task_id) => {
            send_json("PATCH", &routes::task(&app_id, &task_id), &request.body).await
        }
    }
}

pub async fn submit_task(
    app_id: RecordId,
    task_id: RecordId,
    request: SubmitTaskRequest,
) -> Result<(), ApiError> {
    send_json("PATCH", &routes::task(&app_id, &task_id), &request).await
}

/// Current log snapshot. A task without any log yet yields an empty one.
pub async fn fetch_log(app_id: RecordId, task_id: RecordId) -> Result<Log, ApiError> {
    let log: Option<Log> = get_json(&routes::task_log(&app_id, &task_id)).await?;
    Ok(log.unwrap_or_default())
}

pub async fn download_code(app_id: RecordId) -> Result<Blob, ApiError> {
    let response = send(&routes::download(&app_id), "GET", None).await?;
    let response = ensure_ok(response).await?;
    let promise = response
        .blob()
        .map_err(|err| ApiError::browser("read body", err))?;
    let blob = JsFuture::from(promise)
        .await
        .map_err(|err| ApiError::Network(format!("{err:?}")))?;
    blob.dyn_into::<Blob>()
        .map_err(|_| ApiError::Decode("response body is not a blob".to_string()))
}

/// Hand `blob` to the browser as a file download named `file_name`.
pub fn save_blob(blob: &Blob, file_name: &str) -> Result<(), ApiError> {
    let document = window()
        .and_then(|w| w.document())
        .ok_or_else(|| ApiError::Browser("no document".to_string()))?;
    let body = document
        .body()
        .ok_or_else(|| ApiError::Browser("no document body".to_string()))?;

    let url = Url::create_object_url_with_blob(blob)
        .map_err(|err| ApiError::browser("create object url", err))?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|err| ApiError::browser("create anchor", err))?
        .dyn_into()
        .map_err(|_| ApiError::Browser("anchor element has the wrong type".to_string()))?;
    anchor.set_href(&url);
    anchor.set_download(file_name);

    let clicked = body
        .append_child(&anchor)
        .map(|_| anchor.click())
        .map_err(|err| ApiError::browser("attach anchor", err));
    let _ = body.remove_child(&anchor);
    let _ = Url::revoke_object_url(&url);
    clicked
}

/// Open `path` in a new browser tab.
pub fn open_in_new_tab(path: &str) -> Result<(), ApiError> {
    let window = window().ok_or_else(|| ApiError::Browser("no window".to_string()))?;
    window
        .open_with_url_and_target(path, "_blank")
        .map_err(|err| ApiError::browser("open tab", err))?;
    Ok(())
}

/// Blocking alert dialog.
pub fn alert(message: &str) {
    if let Some(window) = window() {
        if let Err(err) = window.alert_with_message(message) {
            tracing::warn!(?err, "alert failed");
        }
    }
}

/// Today's date as `YYYY-MM-DD`, in UTC like the rest of the board's dates.
pub fn today() -> String {
    let iso: String = js_sys::Date::new_0().to_iso_string().into();
    date_part(&iso).to_string()
}

fn date_part(iso: &str) -> &str {
    iso.split('T').next().unwrap_or(iso)
}

async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, ApiError> {
    let response = send(url, "GET", None).await?;
    let response = ensure_ok(response).await?;
    let text = read_text(&response).await?;
    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}

async fn send_json<B: Serialize>(method: &str, url: &str, body: &B) -> Result<(), ApiError> {
    let body = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    let response = send(url, method, Some(body)).await?;
    ensure_ok(response).await?;
    Ok(())
}

async fn send(url: &str, method: &str, body: Option<String>) -> Result<Response, ApiError> {
    let opts = RequestInit::new();
    opts.set_method(method);
    if let Some(body) = &body {
        opts.set_body(&JsValue::from_str(body));
    }

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|err| ApiError::browser("build request", err))?;
    if body.is_some() {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|err| ApiError::browser("set header", err))?;
    }

    let window = window().ok_or_else(|| ApiError::Browser("no window".to_string()))?;
    tracing::debug!(method, url, "sending request");
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|err| ApiError::Network(format!("{method} {url}: {err:?}")))?
        .into();
    Ok(response)
}

async fn ensure_ok(response: Response) -> Result<Response, ApiError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = read_text(&response).await.unwrap_or_default();
    Err(ApiError::Status { status, body })
}

async fn read_text(response: &Response) -> Result<String, ApiError> {
    let promise = response
        .text()
        .map_err(|err| ApiError::browser("read body", err))?;
    JsFuture::from(promise)
        .await
        .map_err(|err| ApiError::Network(format!("{err:?}")))?
        .as_string()
        .ok_or_else(|| ApiError::Decode("response body is not text".to_string()))
}
