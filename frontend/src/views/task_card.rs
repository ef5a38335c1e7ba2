use sauron::{
    html::{attributes, attributes::*, *},
    prelude::*,
};
use umami_shared::Bucket;

use crate::app::{Model, Msg};
use crate::card::{BoardCard, CardEditor};

impl Model {
    pub(crate) fn view_task_card(&self, bucket: &Bucket, card: &BoardCard) -> Node<Msg> {
        let card_key = card.key;
        let opens_log = card.opens_log(bucket);
        let task = &card.task;

        let mut attrs = vec![
            key(card_key.to_string()),
            class(&format!(
                "bg-white rounded-xl p-4 shadow-sm border border-slate-200 hover:shadow-md transition-all duration-200 {}",
                if opens_log { "cursor-pointer hover:border-indigo-300" } else { "" }
            )),
        ];
        if opens_log {
            attrs.push(on_click(move |_| Msg::OpenCard(card_key)));
        }

        div(attrs, [
            div([class("flex items-start justify-between mb-2")], [
                match &card.editor {
                    Some(editor) => input([
                        r#type("text"),
                        value(&editor.title),
                        on_input(move |event| Msg::SetCardTitle(card_key, event.value())),
                        class("flex-1 font-semibold text-slate-800 border border-slate-300 rounded px-2 py-1 text-sm focus:outline-none focus:border-indigo-500"),
                        disabled(card.busy),
                    ], []),
                    None => h4([class("font-semibold text-slate-800 flex-1")], [text(&task.title)]),
                },
                if bucket.is_editable() {
                    self.view_card_controls(card)
                } else {
                    span([], [])
                },
            ]),
            match &card.editor {
                Some(CardEditor { description, .. }) => textarea([
                    value(description),
                    on_input(move |event| Msg::SetCardDescription(card_key, event.value())),
                    class("w-full text-slate-600 text-sm border border-slate-300 rounded px-2 py-1 h-16 resize-none focus:outline-none focus:border-indigo-500"),
                    disabled(card.busy),
                ], []),
                None => p([class("text-slate-600 text-sm mb-3 line-clamp-2")], [text(&task.description)]),
            },
            match task.progress_percent() {
                Some(percent) => div([class("mb-3")], [
                    div([class("flex justify-between text-xs text-slate-600 mb-1")], [
                        span([], [text("Progress")]),
                        span([], [text(&format!("{percent}%"))]),
                    ]),
                    div([class("w-full bg-slate-200 rounded-full h-2")], [
                        div([
                            class("bg-gradient-to-r from-indigo-500 to-purple-500 h-2 rounded-full transition-all duration-300"),
                            attributes::styles([("width", format!("{percent}%"))]),
                        ], []),
                    ]),
                ]),
                None => span([], []),
            },
            div([class("flex items-center justify-between")], [
                div([class("text-xs text-slate-500")], [
                    text(&format!("Created: {}", task.created)),
                    match task.completed_on() {
                        Some(date) => span([class("block")], [text(&format!("Completed: {date}"))]),
                        None => span([], []),
                    },
                ]),
                if bucket.is_editable() && !card.is_editing() {
                    self.view_submit_button(card)
                } else {
                    span([], [])
                },
            ]),
        ])
    }

    fn view_card_controls(&self, card: &BoardCard) -> Node<Msg> {
        let card_key = card.key;
        let controls = if card.is_editing() {
            vec![
                button([
                    on_click(move |event| {
                        event.stop_propagation();
                        Msg::SaveCard(card_key)
                    }),
                    class("p-1 text-green-600 hover:bg-green-50 rounded transition-colors text-sm"),
                    disabled(card.busy),
                ], [text(if card.busy { "Saving..." } else { "✓" })]),
                button([
                    on_click(move |event| {
                        event.stop_propagation();
                        Msg::CancelEdit(card_key)
                    }),
                    class("p-1 text-red-600 hover:bg-red-50 rounded transition-colors text-sm"),
                    disabled(card.busy),
                ], [text("✕")]),
            ]
        } else {
            vec![button([
                on_click(move |event| {
                    event.stop_propagation();
                    Msg::EditCard(card_key)
                }),
                class("p-1 text-slate-400 hover:text-slate-600 hover:bg-slate-50 rounded transition-colors text-sm"),
                disabled(card.busy),
            ], [text("✎")])]
        };
        div([class("flex items-center gap-1 ml-2")], controls)
    }

    fn view_submit_button(&self, card: &BoardCard) -> Node<Msg> {
        let card_key = card.key;
        let unsaved = card.task.is_draft();
        div([class("flex flex-col items-end gap-1")], [
            button([
                on_click(move |event| {
                    event.stop_propagation();
                    Msg::SubmitCard(card_key)
                }),
                class("bg-gradient-to-r from-indigo-500 to-purple-500 text-white px-3 py-1 rounded-lg hover:from-indigo-600 hover:to-purple-600 transition-all duration-200 flex items-center gap-1 text-xs disabled:opacity-50"),
                disabled(unsaved || card.busy),
            ], [text(if card.busy { "Submitting..." } else { "Submit" })]),
            if unsaved {
                span([class("text-[10px] text-slate-400")], [text("Save before submitting")])
            } else {
                span([], [])
            },
        ])
    }
}
