use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use umami_shared::Bucket;

use crate::app::{Model, Msg};
use crate::card::BoardCard;

/// Dot and count-pill colors for a column header.
fn column_accent(bucket: &Bucket) -> (&'static str, &'static str) {
    match bucket {
        Bucket::Authoring => ("bg-yellow-400", "bg-yellow-100 text-yellow-700"),
        Bucket::InProgress => ("bg-indigo-400", "bg-indigo-100 text-indigo-700"),
        Bucket::Completed => ("bg-green-400", "bg-green-100 text-green-700"),
        Bucket::Other(_) => ("bg-slate-400", "bg-slate-100 text-slate-700"),
    }
}

impl Model {
    pub(crate) fn view_board(&self) -> Node<Msg> {
        let (app_name, app_description) = self
            .selected_app
            .as_ref()
            .map(|app| (app.name.as_str(), app.description.as_str()))
            .unwrap_or_default();

        div([class("min-h-screen bg-gradient-to-br from-slate-50 to-slate-100")], [
            div([class("container mx-auto px-6 py-8")], [
                div([class("flex items-center gap-4 mb-8")], [
                    button([
                        on_click(|_| Msg::GoHome),
                        class("p-2 hover:bg-white/80 rounded-lg transition-colors text-slate-600 text-2xl"),
                    ], [text("←")]),
                    div([class("flex-1")], [
                        h1([class("text-3xl font-bold text-slate-800 mb-1")], [text(app_name)]),
                        p([class("text-slate-600")], [text(app_description)]),
                    ]),
                    div([class("flex gap-3")], [
                        button([
                            on_click(|_| Msg::LaunchApp),
                            class("bg-gradient-to-r from-emerald-500 to-teal-500 text-white px-4 py-2 rounded-lg hover:from-emerald-600 hover:to-teal-600 transition-all duration-200 flex items-center gap-2"),
                        ], [text("Launch")]),
                        button([
                            on_click(|_| Msg::DownloadCode),
                            class("bg-gradient-to-r from-slate-600 to-slate-700 text-white px-4 py-2 rounded-lg hover:from-slate-700 hover:to-slate-800 transition-all duration-200 flex items-center gap-2"),
                        ], [text("Download Code")]),
                    ]),
                ]),
                div(
                    [class("grid grid-cols-1 lg:grid-cols-3 gap-6")],
                    self.board
                        .columns()
                        .map(|(bucket, cards)| self.view_column(bucket, cards))
                        .collect::<Vec<_>>(),
                ),
            ]),
            self.view_log_dialog(),
        ])
    }

    fn view_column(&self, bucket: Bucket, cards: &[BoardCard]) -> Node<Msg> {
        let (dot, pill) = column_accent(&bucket);
        let add_task = if bucket == Bucket::Authoring {
            button([
                on_click(|_| Msg::AddDraftTask),
                class("w-full p-3 border-2 border-dashed border-slate-300 rounded-xl text-slate-600 hover:border-slate-400 hover:text-slate-700 transition-all duration-200 flex items-center justify-center gap-2"),
            ], [text("+ Add Task")])
        } else {
            span([], [])
        };

        div([
            key(bucket.key().to_string()),
            class("bg-white/70 backdrop-blur-sm rounded-xl p-4 border border-slate-200"),
        ], [
            div([class("flex items-center gap-3 mb-4")], [
                div([class(&format!("w-3 h-3 {dot} rounded-full"))], []),
                h2([class("text-lg font-semibold text-slate-800")], [text(&bucket.title())]),
                span([class(&format!("{pill} text-xs px-2 py-1 rounded-full"))], [text(&cards.len().to_string())]),
            ]),
            div(
                [class("space-y-3 mb-4")],
                cards
                    .iter()
                    .map(|card| self.view_task_card(&bucket, card))
                    .collect::<Vec<_>>(),
            ),
            add_task,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umami_shared::{App, RecordId, Task, TaskBuckets, TaskStatus};

    use crate::app::Screen;

    fn task(id: i64, status: &str, progress: Option<i64>) -> Task {
        Task {
            id: Some(RecordId::from(id)),
            title: format!("T{id}"),
            status: TaskStatus::from_wire(status),
            progress,
            ..Task::draft("2024-01-02")
        }
    }

    fn board_with(tasks: Vec<Task>) -> Model {
        let mut model = Model::default();
        model.screen = Screen::Board;
        model.selected_app = Some(App {
            id: RecordId::from(1),
            name: "Demo".into(),
            description: "A demo".into(),
            created: "2024-01-01".into(),
            status: "active".into(),
            color: "c".into(),
        });
        model.board = TaskBuckets::from_items(tasks.into_iter().map(BoardCard::new));
        model
    }

    #[test]
    fn in_progress_card_draws_its_progress() {
        let model = board_with(vec![task(5, "in-progress", Some(40))]);
        let html = model.view().render_to_string();

        assert!(html.contains("In Progress"));
        assert!(html.contains(">T5</h4>"));
        assert!(html.contains("width:40%"));
        assert!(html.contains(">40%</span>"));
    }

    #[test]
    fn cards_without_progress_have_no_bar() {
        let model = board_with(vec![task(5, "in-progress", Some(0)), task(6, "completed", None)]);
        let html = model.view().render_to_string();
        assert!(!html.contains("width:"));
        assert!(!html.contains(">Progress</span>"));
    }

    #[test]
    fn only_the_authoring_column_offers_new_tasks() {
        let model = board_with(vec![task(1, "authoring", None), task(2, "paused", None)]);
        let html = model.view().render_to_string();
        assert_eq!(html.matches("+ Add Task").count(), 1);
        assert!(html.contains(">paused</h2>"));
    }

    #[test]
    fn authoring_cards_are_not_clickable() {
        let model = board_with(vec![task(1, "authoring", None), task(2, "completed", None)]);
        let authoring = &model.board.get(&Bucket::Authoring)[0];
        let completed = &model.board.get(&Bucket::Completed)[0];

        let authoring_html = model.view_task_card(&Bucket::Authoring, authoring).render_to_string();
        assert!(!authoring_html.contains("cursor-pointer"));
        assert!(authoring_html.contains(">Submit</button>"));

        let completed_html = model.view_task_card(&Bucket::Completed, completed).render_to_string();
        assert!(completed_html.contains("cursor-pointer"));
        assert!(!completed_html.contains(">Submit</button>"));
    }

    #[test]
    fn drafts_show_the_save_hint() {
        let mut model = board_with(vec![]);
        model.board.push_authoring(BoardCard::new(Task::draft("2024-01-02")));
        let html = model.view().render_to_string();
        assert!(html.contains("Save before submitting"));
        assert!(html.contains(Task::DRAFT_TITLE));
    }

    #[test]
    fn fixed_columns_have_distinct_accents() {
        let accents: Vec<_> = Bucket::FIXED.iter().map(column_accent).collect();
        assert_eq!(accents[0].0, "bg-yellow-400");
        assert_eq!(accents[1].0, "bg-indigo-400");
        assert_eq!(accents[2].0, "bg-green-400");
        assert_eq!(column_accent(&Bucket::Other("paused".into())).0, "bg-slate-400");
    }
}
