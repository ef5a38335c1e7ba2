//! Per-card state on the app board.

use umami_shared::{Bucket, Bucketed, RecordId, SubmitTaskRequest, Task, TaskContentRequest, TaskStatus};
use uuid::Uuid;

/// Stable identity of a card within the current board, drafts included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardKey(Uuid);

impl CardKey {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CardKey {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CardKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Unsaved title/description while a card is in edit mode.
#[derive(Debug, Clone, PartialEq)]
pub struct CardEditor {
    pub title: String,
    pub description: String,
}

/// Where a save should go: a new task, or an existing one.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveTarget {
    Create,
    Update(RecordId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub target: SaveTarget,
    pub body: TaskContentRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitBlocked {
    /// The task has never been saved, so there is nothing to update.
    Unsaved,
    Editing,
    NotAuthoring,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardCard {
    pub key: CardKey,
    pub task: Task,
    pub editor: Option<CardEditor>,
    /// A save or submit for this card is in flight.
    pub busy: bool,
}

impl Bucketed for BoardCard {
    fn status(&self) -> &TaskStatus {
        &self.task.status
    }
}

impl BoardCard {
    pub fn new(task: Task) -> Self {
        Self {
            key: CardKey::new(),
            task,
            editor: None,
            busy: false,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }

    pub fn begin_edit(&mut self) {
        self.editor = Some(CardEditor {
            title: self.task.title.clone(),
            description: self.task.description.clone(),
        });
    }

    /// Drop unsaved keystrokes; the card shows the task as last loaded again.
    pub fn cancel_edit(&mut self) {
        self.editor = None;
    }

    pub fn set_title(&mut self, title: String) {
        if let Some(editor) = self.editor.as_mut() {
            editor.title = title;
        }
    }

    pub fn set_description(&mut self, description: String) {
        if let Some(editor) = self.editor.as_mut() {
            editor.description = description;
        }
    }

    /// Request that persists the edited content, if the card is being edited.
    pub fn save_request(&self) -> Option<SaveRequest> {
        let editor = self.editor.as_ref()?;
        let target = match &self.task.id {
            Some(id) => SaveTarget::Update(id.clone()),
            None => SaveTarget::Create,
        };
        Some(SaveRequest {
            target,
            body: TaskContentRequest {
                title: editor.title.clone(),
                description: editor.description.clone(),
            },
        })
    }

    /// Request handing the task over for execution.
    pub fn submit_request(&self, bucket: &Bucket) -> Result<(RecordId, SubmitTaskRequest), SubmitBlocked> {
        if !bucket.is_editable() {
            return Err(SubmitBlocked::NotAuthoring);
        }
        if self.is_editing() {
            return Err(SubmitBlocked::Editing);
        }
        let id = self.task.id.clone().ok_or(SubmitBlocked::Unsaved)?;
        Ok((id, SubmitTaskRequest::for_task(&self.task)))
    }

    /// Whether clicking the card body should open its execution log.
    pub fn opens_log(&self, bucket: &Bucket) -> bool {
        bucket.shows_logs() && !self.is_editing() && self.task.id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved(id: i64, status: &str) -> BoardCard {
        BoardCard::new(Task {
            id: Some(RecordId::from(id)),
            title: "Login page".into(),
            description: "Add a login form".into(),
            status: TaskStatus::from_wire(status),
            ..Task::draft("2024-01-01")
        })
    }

    #[test]
    fn cancel_restores_last_known_content() {
        let mut card = saved(1, "authoring");
        card.begin_edit();
        card.set_title("Signup page".into());
        card.set_description("something else".into());
        assert_eq!(card.editor.as_ref().unwrap().title, "Signup page");

        card.cancel_edit();
        assert!(!card.is_editing());
        assert_eq!(card.task.title, "Login page");
        assert_eq!(card.task.description, "Add a login form");

        card.begin_edit();
        assert_eq!(
            card.editor,
            Some(CardEditor {
                title: "Login page".into(),
                description: "Add a login form".into(),
            })
        );
    }

    #[test]
    fn typing_outside_edit_mode_is_ignored() {
        let mut card = saved(1, "authoring");
        card.set_title("nope".into());
        assert!(card.editor.is_none());
        assert_eq!(card.save_request(), None);
    }

    #[test]
    fn save_creates_drafts_and_updates_saved_tasks() {
        let mut draft = BoardCard::new(Task::draft("2024-01-01"));
        draft.begin_edit();
        draft.set_title("First".into());
        let request = draft.save_request().unwrap();
        assert_eq!(request.target, SaveTarget::Create);
        assert_eq!(request.body.title, "First");
        assert_eq!(request.body.description, Task::DRAFT_DESCRIPTION);

        let mut card = saved(7, "authoring");
        card.begin_edit();
        card.set_description("new text".into());
        let request = card.save_request().unwrap();
        assert_eq!(request.target, SaveTarget::Update(RecordId::from(7)));
        assert_eq!(request.body.description, "new text");
    }

    #[test]
    fn drafts_cannot_be_submitted() {
        let draft = BoardCard::new(Task::draft("2024-01-01"));
        assert_eq!(
            draft.submit_request(&Bucket::Authoring),
            Err(SubmitBlocked::Unsaved)
        );
    }

    #[test]
    fn submit_uses_saved_content_not_pending_edits() {
        let mut card = saved(4, "authoring");
        let (id, body) = card.submit_request(&Bucket::Authoring).unwrap();
        assert_eq!(id, RecordId::from(4));
        assert_eq!(body.status, TaskStatus::InProgress);
        assert_eq!(body.title, "Login page");

        card.begin_edit();
        assert_eq!(
            card.submit_request(&Bucket::Authoring),
            Err(SubmitBlocked::Editing)
        );
        assert_eq!(
            saved(5, "completed").submit_request(&Bucket::Completed),
            Err(SubmitBlocked::NotAuthoring)
        );
    }

    #[test]
    fn only_running_or_finished_cards_open_logs() {
        let authoring = saved(1, "authoring");
        assert!(!authoring.opens_log(&Bucket::Authoring));

        let running = saved(2, "in-progress");
        assert!(running.opens_log(&Bucket::InProgress));

        let mut finished = saved(3, "completed");
        assert!(finished.opens_log(&Bucket::Completed));
        finished.begin_edit();
        assert!(!finished.opens_log(&Bucket::Completed));

        assert!(!saved(4, "paused").opens_log(&Bucket::Other("paused".into())));
    }
}
