use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use umami_shared::{LogKind, LogMessage};

use crate::app::{Model, Msg};

fn kind_icon(kind: LogKind) -> (&'static str, &'static str) {
    match kind {
        LogKind::Update => ("✔", "text-green-500"),
        LogKind::ToolExecution => ("⛏", "text-slate-400"),
    }
}

impl Model {
    pub(crate) fn view_log_dialog(&self) -> Node<Msg> {
        let Some(task) = &self.selected_task else {
            return span([], []);
        };
        let messages = self
            .log
            .as_ref()
            .map(|log| log.messages.as_slice())
            .unwrap_or_default();

        div([class("fixed inset-0 bg-black/50 backdrop-blur-sm z-50 flex items-center justify-center p-4")], [
            div([class("bg-white rounded-2xl p-6 w-full max-w-2xl max-h-[80vh] overflow-hidden")], [
                div([class("flex items-center justify-between mb-6")], [
                    h3([class("text-xl font-semibold text-slate-800")], [
                        text(&format!("{} - Execution Log", task.title)),
                    ]),
                    button([
                        on_click(|_| Msg::CloseLog),
                        class("text-slate-400 hover:text-slate-600 transition-colors"),
                    ], [text("✕")]),
                ]),
                div(
                    [class("space-y-4 overflow-y-auto max-h-96")],
                    messages
                        .iter()
                        .enumerate()
                        .map(|(index, message)| view_log_message(index, message))
                        .collect::<Vec<_>>(),
                ),
            ]),
        ])
    }
}

fn view_log_message(index: usize, message: &LogMessage) -> Node<Msg> {
    let kind = message.kind();
    let (icon, icon_color) = kind_icon(kind);
    div([key(index.to_string()), class("flex gap-4 p-4 bg-slate-50 rounded-xl")], [
        div([class(&format!("flex-shrink-0 text-xl {icon_color}"))], [text(icon)]),
        div([class("flex-1")], [
            div([class("flex items-center gap-2 mb-1")], [
                span([class("font-medium text-slate-800")], [text(kind.label())]),
                span([class("text-xs text-slate-500")], [text(&message.time)]),
            ]),
            p([class("text-sm text-slate-600")], [text(&message.text)]),
        ]),
    ])
}
