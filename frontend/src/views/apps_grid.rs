use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use umami_shared::App;

use crate::app::{Model, Msg};

/// Card header gradients, cycled by position in the grid.
const PALETTE: [&str; 3] = [
    "from-purple-500 to-pink-500",
    "from-blue-500 to-cyan-500",
    "from-green-500 to-emerald-500",
];

fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

fn status_badge_class(app: &App) -> &'static str {
    if app.is_active() {
        "bg-green-100 text-green-700"
    } else {
        "bg-blue-100 text-blue-700"
    }
}

impl Model {
    pub(crate) fn view_apps_grid(&self) -> Node<Msg> {
        div([class("min-h-screen bg-gradient-to-br from-slate-50 to-slate-100")], [
            div([class("container mx-auto px-6 py-8")], [
                div([class("flex items-center justify-between mb-8")], [
                    div([], [
                        h1([class("text-4xl font-bold text-slate-800 mb-2")], [text("Umami")]),
                        p([class("text-slate-600")], [text("AI-powered application builder")]),
                    ]),
                    button([
                        on_click(|_| Msg::OpenCreateApp),
                        class("bg-gradient-to-r from-indigo-600 to-purple-600 text-white px-6 py-3 rounded-xl hover:from-indigo-700 hover:to-purple-700 transition-all duration-200 flex items-center gap-2 shadow-lg hover:shadow-xl"),
                    ], [
                        span([class("text-xl leading-none")], [text("+")]),
                        text("Create New App"),
                    ]),
                ]),
                div(
                    [class("grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6")],
                    self.apps
                        .iter()
                        .enumerate()
                        .map(|(index, app)| self.view_app_card(index, app))
                        .collect::<Vec<_>>(),
                ),
                self.view_create_dialog(),
            ]),
        ])
    }

    fn view_app_card(&self, index: usize, app: &App) -> Node<Msg> {
        let app_id = app.id.clone();
        div([
            key(app.id.to_string()),
            on_click(move |_| Msg::SelectApp(app_id.clone())),
            class("bg-white rounded-2xl p-6 shadow-lg hover:shadow-xl transition-all duration-300 cursor-pointer group border border-slate-200 hover:border-slate-300"),
        ], [
            div([class(&format!(
                "w-full h-32 bg-gradient-to-br {} rounded-xl mb-4 relative overflow-hidden",
                palette_color(index)
            ))], [
                div([class("absolute inset-0 bg-white/10 backdrop-blur-sm flex items-center justify-center opacity-0 group-hover:opacity-100 transition-opacity duration-300")], [
                    span([class("text-white text-3xl")], [text("▶")]),
                ]),
            ]),
            h3([class("text-xl font-semibold text-slate-800 mb-2")], [text(&app.name)]),
            p([class("text-slate-600 text-sm mb-4 line-clamp-2")], [text(&app.description)]),
            div([class("flex items-center justify-between")], [
                span([class(&format!(
                    "px-3 py-1 rounded-full text-xs font-medium {}",
                    status_badge_class(app)
                ))], [text(&app.status)]),
                span([class("text-xs text-slate-500")], [text(&app.created)]),
            ]),
        ])
    }
}
