//! Paths of the control plane API, relative to the serving origin.

use crate::RecordId;

pub const API_PREFIX: &str = "/api/v1";
pub const LAUNCH_PREFIX: &str = "/apps";
pub const LOG_SOCKET_SUFFIX: &str = "/logs/ws";

pub fn apps() -> String {
    format!("{API_PREFIX}/apps")
}

pub fn tasks(app_id: &RecordId) -> String {
    format!("{API_PREFIX}/apps/{app_id}/tasks")
}

pub fn task(app_id: &RecordId, task_id: &RecordId) -> String {
    format!("{}/{task_id}", tasks(app_id))
}

pub fn task_log(app_id: &RecordId, task_id: &RecordId) -> String {
    format!("{}/logs", task(app_id, task_id))
}

pub fn task_log_socket(app_id: &RecordId, task_id: &RecordId) -> String {
    format!("{}{LOG_SOCKET_SUFFIX}", task(app_id, task_id))
}

pub fn download(app_id: &RecordId) -> String {
    format!("{API_PREFIX}/apps/{app_id}/download")
}

/// Browser path that starts the generated app.
pub fn launch(app_id: &RecordId) -> String {
    format!("{LAUNCH_PREFIX}/{app_id}")
}

/// File name the downloaded source archive is saved under.
pub fn download_file_name(app_id: &RecordId) -> String {
    format!("app-{app_id}-code.zip")
}

/// True for paths owned by the control plane rather than the static bundle.
pub fn is_upstream_path(path: &str) -> bool {
    has_segment_prefix(path, API_PREFIX) || has_segment_prefix(path, LAUNCH_PREFIX)
}

fn has_segment_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
