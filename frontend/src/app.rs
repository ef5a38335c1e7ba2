use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use umami_shared::{routes, App, Log, RecordId, Task, TaskBuckets};

use crate::api::{self, ApiError};
use crate::card::{BoardCard, CardKey, SubmitBlocked};
use crate::create_dialog::CreateAppDialog;
use crate::log_stream::LogStream;
use crate::scope::{ScopeToken, ViewScope};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Apps,
    Board,
}

#[derive(Debug, Clone)]
pub enum Msg {
    // Apps
    LoadApps,
    AppsLoaded(Vec<App>),
    AppsFailed(ApiError),
    OpenCreateApp,
    SetNewAppName(String),
    SetNewAppDescription(String),
    SubmitNewApp,
    AppCreated,
    AppCreateFailed(ApiError),
    CancelCreateApp,

    // Board
    SelectApp(RecordId),
    TasksLoaded(ScopeToken, Vec<Task>),
    TasksFailed(ScopeToken, ApiError),
    GoHome,
    LaunchApp,
    DownloadCode,
    CodeDownloaded(RecordId),
    DownloadFailed(ApiError),
    AddDraftTask,

    // Cards
    EditCard(CardKey),
    SetCardTitle(CardKey, String),
    SetCardDescription(CardKey, String),
    SaveCard(CardKey),
    CancelEdit(CardKey),
    SubmitCard(CardKey),
    CardSynced(ScopeToken, CardKey),
    CardSyncFailed(ScopeToken, CardKey, ApiError),
    OpenCard(CardKey),

    // Logs
    LogLoaded(ScopeToken, Log),
    LogFailed(ScopeToken, ApiError),
    LogPushed(ScopeToken, Log),
    LogStreamEnded(ScopeToken),
    CloseLog,
}

#[derive(Debug)]
pub struct Model {
    pub(crate) screen: Screen,
    pub(crate) apps: Vec<App>,
    pub(crate) create_dialog: CreateAppDialog,
    /// App whose tasks are loading; it becomes `selected_app` once they arrive.
    opening_app: Option<App>,
    pub(crate) selected_app: Option<App>,
    pub(crate) board: TaskBuckets<BoardCard>,
    board_scope: ViewScope,
    pub(crate) selected_task: Option<Task>,
    pub(crate) log: Option<Log>,
    log_stream: Option<LogStream>,
    log_scope: ViewScope,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            screen: Screen::Apps,
            apps: Vec::new(),
            create_dialog: CreateAppDialog::default(),
            opening_app: None,
            selected_app: None,
            board: TaskBuckets::default(),
            board_scope: ViewScope::default(),
            selected_task: None,
            log: None,
            log_stream: None,
            log_scope: ViewScope::default(),
        }
    }
}

impl Application for Model {
    type MSG = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        Cmd::new(async { Msg::LoadApps })
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::LoadApps => Cmd::new(async {
                match api::fetch_apps().await {
                    Ok(apps) => Msg::AppsLoaded(apps),
                    Err(e) => Msg::AppsFailed(e),
                }
            }),
            Msg::AppsLoaded(apps) => {
                tracing::debug!(count = apps.len(), "apps loaded");
                self.apps = apps;
                Cmd::none()
            }
            Msg::AppsFailed(err) => {
                tracing::error!(error = %err, "error fetching apps");
                Cmd::none()
            }
            Msg::OpenCreateApp => {
                self.create_dialog.show();
                Cmd::none()
            }
            Msg::SetNewAppName(name) => {
                self.create_dialog.set_name(name);
                Cmd::none()
            }
            Msg::SetNewAppDescription(description) => {
                self.create_dialog.set_description(description);
                Cmd::none()
            }
            Msg::SubmitNewApp => match self.create_dialog.begin_submit() {
                Ok(Some(request)) => Cmd::new(async move {
                    match api::create_app(request).await {
                        Ok(()) => Msg::AppCreated,
                        Err(e) => Msg::AppCreateFailed(e),
                    }
                }),
                Ok(None) => Cmd::none(),
                Err(invalid) => {
                    api::alert(&invalid.to_string());
                    Cmd::none()
                }
            },
            Msg::AppCreated => {
                self.create_dialog.submit_succeeded();
                Cmd::new(async { Msg::LoadApps })
            }
            Msg::AppCreateFailed(err) => {
                tracing::error!(error = %err, "error creating app");
                self.create_dialog.submit_failed();
                match err.server_text() {
                    Some(reason) => api::alert(&format!("Failed to create app: {reason}")),
                    None => api::alert("Failed to create app. Please try again."),
                }
                Cmd::none()
            }
            Msg::CancelCreateApp => {
                self.create_dialog.cancel();
                Cmd::none()
            }

            Msg::SelectApp(app_id) => {
                let Some(app) = self.apps.iter().find(|a| a.id == app_id).cloned() else {
                    tracing::warn!(%app_id, "selected app is not in the list");
                    return Cmd::none();
                };
                let token = self.board_scope.renew();
                self.opening_app = Some(app);
                load_tasks(token, app_id)
            }
            Msg::TasksLoaded(token, tasks) => {
                if !self.board_scope.is_current(token) {
                    tracing::debug!("dropping task list for a board no longer shown");
                    return Cmd::none();
                }
                tracing::debug!(count = tasks.len(), "tasks loaded");
                self.board = TaskBuckets::from_items(tasks.into_iter().map(BoardCard::new));
                self.finish_opening_app();
                Cmd::none()
            }
            Msg::TasksFailed(token, err) => {
                if !self.board_scope.is_current(token) {
                    tracing::debug!(error = %err, "dropping task error for a board no longer shown");
                    return Cmd::none();
                }
                tracing::error!(error = %err, "error fetching tasks");
                if self.opening_app.is_some() {
                    self.board = TaskBuckets::default();
                }
                self.finish_opening_app();
                Cmd::none()
            }
            Msg::GoHome => {
                self.close_log();
                self.board_scope.renew();
                self.opening_app = None;
                self.selected_app = None;
                self.board = TaskBuckets::default();
                self.screen = Screen::Apps;
                Cmd::none()
            }
            Msg::LaunchApp => {
                if let Some(app) = &self.selected_app {
                    if let Err(err) = api::open_in_new_tab(&routes::launch(&app.id)) {
                        tracing::error!(error = %err, "error launching app");
                    }
                }
                Cmd::none()
            }
            Msg::DownloadCode => {
                let Some(app_id) = self.selected_app.as_ref().map(|app| app.id.clone()) else {
                    return Cmd::none();
                };
                Cmd::new(async move {
                    let downloaded = match api::download_code(app_id.clone()).await {
                        Ok(blob) => api::save_blob(&blob, &routes::download_file_name(&app_id)),
                        Err(e) => Err(e),
                    };
                    match downloaded {
                        Ok(()) => Msg::CodeDownloaded(app_id),
                        Err(e) => Msg::DownloadFailed(e),
                    }
                })
            }
            Msg::CodeDownloaded(app_id) => {
                tracing::info!(%app_id, "code archive saved");
                Cmd::none()
            }
            Msg::DownloadFailed(err) => {
                tracing::error!(error = %err, "error downloading code");
                api::alert("Failed to download code. Please try again.");
                Cmd::none()
            }
            Msg::AddDraftTask => {
                self.board
                    .push_authoring(BoardCard::new(Task::draft(api::today())));
                Cmd::none()
            }

            Msg::EditCard(key) => {
                let editable = matches!(self.board.find(|c| c.key == key), Some((bucket, _)) if bucket.is_editable());
                if let Some(card) = self.card_mut(key).filter(|_| editable) {
                    card.begin_edit();
                }
                Cmd::none()
            }
            Msg::SetCardTitle(key, value) => {
                if let Some(card) = self.card_mut(key) {
                    card.set_title(value);
                }
                Cmd::none()
            }
            Msg::SetCardDescription(key, value) => {
                if let Some(card) = self.card_mut(key) {
                    card.set_description(value);
                }
                Cmd::none()
            }
            Msg::CancelEdit(key) => {
                if let Some(card) = self.card_mut(key) {
                    card.cancel_edit();
                }
                Cmd::none()
            }
            Msg::SaveCard(key) => {
                let Some(app_id) = self.selected_app_id() else {
                    return Cmd::none();
                };
                let Some(card) = self.card_mut(key).filter(|c| !c.busy) else {
                    return Cmd::none();
                };
                let Some(request) = card.save_request() else {
                    return Cmd::none();
                };
                card.busy = true;
                let token = self.board_scope.current();
                Cmd::new(async move {
                    match api::save_task(app_id, request).await {
                        Ok(()) => Msg::CardSynced(token, key),
                        Err(e) => Msg::CardSyncFailed(token, key, e),
                    }
                })
            }
            Msg::SubmitCard(key) => {
                let Some(app_id) = self.selected_app_id() else {
                    return Cmd::none();
                };
                let Some((bucket, card)) = self.board.find(|c| c.key == key) else {
                    return Cmd::none();
                };
                if card.busy {
                    return Cmd::none();
                }
                let (task_id, request) = match card.submit_request(&bucket) {
                    Ok(submission) => submission,
                    Err(SubmitBlocked::Unsaved) => {
                        tracing::warn!(card = %key, "refusing to submit a task that was never saved");
                        return Cmd::none();
                    }
                    Err(blocked) => {
                        tracing::debug!(card = %key, ?blocked, "submit ignored");
                        return Cmd::none();
                    }
                };
                if let Some(card) = self.card_mut(key) {
                    card.busy = true;
                }
                let token = self.board_scope.current();
                Cmd::new(async move {
                    match api::submit_task(app_id, task_id, request).await {
                        Ok(()) => Msg::CardSynced(token, key),
                        Err(e) => Msg::CardSyncFailed(token, key, e),
                    }
                })
            }
            Msg::CardSynced(token, key) => {
                if !self.board_scope.is_current(token) {
                    tracing::debug!(card = %key, "dropping save result for a board no longer shown");
                    return Cmd::none();
                }
                if let Some(card) = self.card_mut(key) {
                    card.busy = false;
                    card.cancel_edit();
                }
                match self.selected_app_id() {
                    Some(app_id) => load_tasks(token, app_id),
                    None => Cmd::none(),
                }
            }
            Msg::CardSyncFailed(token, key, err) => {
                if !self.board_scope.is_current(token) {
                    tracing::debug!(card = %key, error = %err, "dropping save error for a board no longer shown");
                    return Cmd::none();
                }
                tracing::error!(card = %key, error = %err, "error saving task");
                if let Some(card) = self.card_mut(key) {
                    card.busy = false;
                }
                Cmd::none()
            }
            Msg::OpenCard(key) => {
                let Some(app_id) = self.selected_app_id() else {
                    return Cmd::none();
                };
                let task = match self.board.find(|c| c.key == key) {
                    Some((bucket, card)) if card.opens_log(&bucket) => card.task.clone(),
                    _ => return Cmd::none(),
                };
                let Some(task_id) = task.id.clone() else {
                    return Cmd::none();
                };
                self.close_log();
                let token = self.log_scope.current();
                self.selected_task = Some(task);
                Cmd::new(async move {
                    match api::fetch_log(app_id, task_id).await {
                        Ok(log) => Msg::LogLoaded(token, log),
                        Err(e) => Msg::LogFailed(token, e),
                    }
                })
            }

            Msg::LogLoaded(token, log) => {
                if !self.log_scope.is_current(token) {
                    tracing::debug!("dropping log snapshot for a closed dialog");
                    return Cmd::none();
                }
                self.log = Some(log);
                self.open_log_stream(token)
            }
            Msg::LogFailed(token, err) => {
                if self.log_scope.is_current(token) {
                    tracing::error!(error = %err, "error fetching logs");
                }
                Cmd::none()
            }
            Msg::LogPushed(token, log) => {
                if !self.log_scope.is_current(token) {
                    tracing::debug!("dropping pushed log for a closed dialog");
                    return Cmd::none();
                }
                tracing::debug!(messages = log.messages.len(), "log snapshot pushed");
                self.log = Some(log);
                match &self.log_stream {
                    Some(stream) => watch_log(token, stream),
                    None => Cmd::none(),
                }
            }
            Msg::LogStreamEnded(token) => {
                if self.log_scope.is_current(token) {
                    tracing::info!("log stream ended");
                    self.log_stream = None;
                }
                Cmd::none()
            }
            Msg::CloseLog => {
                self.close_log();
                Cmd::none()
            }
        }
    }

    fn view(&self) -> Node<Msg> {
        div(
            [class("font-sans")],
            [match self.screen {
                Screen::Apps => self.view_apps_grid(),
                Screen::Board => self.view_board(),
            }],
        )
    }
}

impl Model {
    fn selected_app_id(&self) -> Option<RecordId> {
        self.selected_app.as_ref().map(|app| app.id.clone())
    }

    fn card_mut(&mut self, key: CardKey) -> Option<&mut BoardCard> {
        self.board.find_mut(|c| c.key == key)
    }

    fn finish_opening_app(&mut self) {
        if let Some(app) = self.opening_app.take() {
            self.selected_app = Some(app);
            self.screen = Screen::Board;
        }
    }

    fn open_log_stream(&mut self, token: ScopeToken) -> Cmd<Msg> {
        let (Some(app_id), Some(task_id)) = (
            self.selected_app_id(),
            self.selected_task.as_ref().and_then(|t| t.id.clone()),
        ) else {
            return Cmd::none();
        };
        match LogStream::open(&app_id, &task_id) {
            Ok(stream) => {
                let watch = watch_log(token, &stream);
                self.log_stream = Some(stream);
                watch
            }
            Err(err) => {
                tracing::error!(error = %err, "error opening log stream");
                Cmd::none()
            }
        }
    }

    /// Hide the log dialog and release its socket. Pending log responses are
    /// invalidated.
    fn close_log(&mut self) {
        self.log_scope.renew();
        self.log_stream = None;
        self.selected_task = None;
        self.log = None;
    }
}

fn load_tasks(token: ScopeToken, app_id: RecordId) -> Cmd<Msg> {
    Cmd::new(async move {
        match api::fetch_tasks(app_id).await {
            Ok(tasks) => Msg::TasksLoaded(token, tasks),
            Err(e) => Msg::TasksFailed(token, e),
        }
    })
}

fn watch_log(token: ScopeToken, stream: &LogStream) -> Cmd<Msg> {
    let next = stream.next_snapshot();
    Cmd::new(async move {
        match next.await {
            Some(log) => Msg::LogPushed(token, log),
            None => Msg::LogStreamEnded(token),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use umami_shared::{Bucket, LogMessage, TaskStatus};

    fn demo_app() -> App {
        App {
            id: RecordId::from(1),
            name: "Demo".into(),
            description: "d".into(),
            created: "2024-01-01".into(),
            status: "Active".into(),
            color: "c".into(),
        }
    }

    fn task(id: i64, status: &str) -> Task {
        Task {
            id: Some(RecordId::from(id)),
            title: format!("T{id}"),
            status: TaskStatus::from_wire(status),
            progress: Some(40),
            ..Task::draft("2024-01-02")
        }
    }

    fn key_of(model: &Model, id: i64) -> CardKey {
        model
            .board
            .find(|c| c.task.id == Some(RecordId::from(id)))
            .map(|(_, card)| card.key)
            .unwrap()
    }

    /// Model already showing the board for the demo app.
    fn on_board(tasks: Vec<Task>) -> Model {
        let mut model = Model {
            apps: vec![demo_app()],
            ..Model::default()
        };
        let _ = model.update(Msg::SelectApp(RecordId::from(1)));
        let token = model.board_scope.current();
        let _ = model.update(Msg::TasksLoaded(token, tasks));
        model
    }

    #[test]
    fn selecting_an_app_shows_its_board_once_tasks_arrive() {
        let mut model = Model {
            apps: vec![demo_app()],
            ..Model::default()
        };
        let _ = model.update(Msg::SelectApp(RecordId::from(1)));
        assert_eq!(model.screen, Screen::Apps);
        assert!(model.selected_app.is_none());

        let token = model.board_scope.current();
        let _ = model.update(Msg::TasksLoaded(token, vec![task(5, "in-progress")]));
        assert_eq!(model.screen, Screen::Board);
        assert_eq!(model.selected_app, Some(demo_app()));
        let in_progress = model.board.get(&Bucket::InProgress);
        assert_eq!(in_progress.len(), 1);
        assert_eq!(in_progress[0].task.progress_percent(), Some(40));
    }

    #[test]
    fn failed_task_load_still_opens_an_empty_board() {
        let mut model = Model {
            apps: vec![demo_app()],
            ..Model::default()
        };
        let _ = model.update(Msg::SelectApp(RecordId::from(1)));
        let token = model.board_scope.current();
        let _ = model.update(Msg::TasksFailed(token, ApiError::Network("offline".into())));
        assert_eq!(model.screen, Screen::Board);
        assert!(model.board.is_empty());
    }

    #[test]
    fn late_task_lists_for_a_left_board_are_dropped() {
        let mut model = on_board(vec![task(1, "authoring")]);
        let stale = model.board_scope.current();
        let _ = model.update(Msg::GoHome);
        assert_eq!(model.screen, Screen::Apps);
        assert!(model.selected_app.is_none());

        let _ = model.update(Msg::TasksLoaded(stale, vec![task(2, "completed")]));
        assert_eq!(model.screen, Screen::Apps);
        assert!(model.board.is_empty());
    }

    #[test]
    fn authoring_cards_do_not_open_logs() {
        let mut model = on_board(vec![task(1, "authoring"), task(5, "in-progress")]);
        let _ = model.update(Msg::OpenCard(key_of(&model, 1)));
        assert!(model.selected_task.is_none());

        let _ = model.update(Msg::OpenCard(key_of(&model, 5)));
        assert_eq!(
            model.selected_task.as_ref().and_then(|t| t.id.clone()),
            Some(RecordId::from(5))
        );
    }

    #[test]
    fn editing_cards_do_not_open_logs() {
        let mut model = on_board(vec![task(3, "completed")]);
        let card_key = key_of(&model, 3);
        model.card_mut(card_key).unwrap().begin_edit();
        let _ = model.update(Msg::OpenCard(card_key));
        assert!(model.selected_task.is_none());
    }

    #[test]
    fn pushed_snapshot_replaces_the_log() {
        let mut model = on_board(vec![task(5, "in-progress")]);
        let _ = model.update(Msg::OpenCard(key_of(&model, 5)));
        let token = model.log_scope.current();
        model.log = Some(Log {
            task_id: "5".into(),
            messages: vec![LogMessage::default(), LogMessage::default()],
        });

        let pushed = Log {
            task_id: "5".into(),
            messages: vec![LogMessage {
                time: "t1".into(),
                title: "tool".into(),
                text: "ran build".into(),
            }],
        };
        let _ = model.update(Msg::LogPushed(token, pushed.clone()));
        assert_eq!(model.log, Some(pushed));
        assert_eq!(
            model.log.as_ref().unwrap().messages[0].kind().label(),
            "Tool Execution"
        );
    }

    #[test]
    fn closing_the_log_ignores_late_pushes() {
        let mut model = on_board(vec![task(5, "in-progress")]);
        let _ = model.update(Msg::OpenCard(key_of(&model, 5)));
        let token = model.log_scope.current();
        let _ = model.update(Msg::CloseLog);
        assert!(model.selected_task.is_none());

        let _ = model.update(Msg::LogPushed(token, Log::default()));
        assert!(model.log.is_none());
    }

    #[test]
    fn edits_are_per_card_and_cancel_restores() {
        let mut model = on_board(vec![task(1, "authoring"), task(2, "authoring")]);
        let first = key_of(&model, 1);
        let second = key_of(&model, 2);

        let _ = model.update(Msg::EditCard(first));
        let _ = model.update(Msg::SetCardTitle(first, "typed".into()));
        assert!(model.card_mut(first).unwrap().is_editing());
        assert!(!model.card_mut(second).unwrap().is_editing());

        let _ = model.update(Msg::CancelEdit(first));
        let card = model.card_mut(first).unwrap();
        assert!(!card.is_editing());
        assert_eq!(card.task.title, "T1");
    }

    #[test]
    fn only_authoring_cards_enter_edit_mode() {
        let mut model = on_board(vec![task(4, "completed")]);
        let card_key = key_of(&model, 4);
        let _ = model.update(Msg::EditCard(card_key));
        assert!(!model.card_mut(card_key).unwrap().is_editing());
    }

    #[test]
    fn unsaved_drafts_are_not_submitted() {
        let mut model = on_board(vec![]);
        let draft = BoardCard::new(Task::draft("2024-01-02"));
        let draft_key = draft.key;
        model.board.push_authoring(draft);

        let _ = model.update(Msg::SubmitCard(draft_key));
        assert!(!model.card_mut(draft_key).unwrap().busy);
    }

    #[test]
    fn submit_marks_the_card_busy_until_synced() {
        let mut model = on_board(vec![task(7, "authoring")]);
        let card_key = key_of(&model, 7);
        let _ = model.update(Msg::SubmitCard(card_key));
        assert!(model.card_mut(card_key).unwrap().busy);

        let token = model.board_scope.current();
        let _ = model.update(Msg::CardSyncFailed(token, card_key, ApiError::Network("down".into())));
        assert!(!model.card_mut(card_key).unwrap().busy);
    }
}
