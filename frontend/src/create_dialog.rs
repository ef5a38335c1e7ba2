use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use umami_shared::{CreateAppRequest, ValidationError};

use crate::app::{Model, Msg};

/// Form state of the "Create New App" dialog.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CreateAppDialog {
    pub open: bool,
    pub name: String,
    pub description: String,
    pub submitting: bool,
}

impl CreateAppDialog {
    pub fn show(&mut self) {
        self.open = true;
    }

    pub fn set_name(&mut self, name: String) {
        if !self.submitting {
            self.name = name;
        }
    }

    pub fn set_description(&mut self, description: String) {
        if !self.submitting {
            self.description = description;
        }
    }

    /// Validate and mark the dialog busy. `Ok(None)` means a submission is
    /// already running.
    pub fn begin_submit(&mut self) -> Result<Option<CreateAppRequest>, ValidationError> {
        if self.submitting {
            return Ok(None);
        }
        let request = CreateAppRequest::new(&self.name, &self.description)?;
        self.submitting = true;
        Ok(Some(request))
    }

    pub fn submit_succeeded(&mut self) {
        *self = Self::default();
    }

    /// Keep what the user typed so they can retry.
    pub fn submit_failed(&mut self) {
        self.submitting = false;
    }

    /// Clear and close. Refused while a submission is in flight.
    pub fn cancel(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        *self = Self::default();
        true
    }
}

impl Model {
    pub(crate) fn view_create_dialog(&self) -> Node<Msg> {
        let dialog = &self.create_dialog;
        if !dialog.open {
            return span([], []);
        }
        let busy = dialog.submitting;
        div([class("fixed inset-0 bg-black/50 backdrop-blur-sm z-50 flex items-center justify-center p-4")], [
            div([class("bg-white rounded-2xl p-6 w-full max-w-md")], [
                div([class("flex items-center justify-between mb-6")], [
                    h3([class("text-xl font-semibold text-slate-800")], [text("Create New App")]),
                    button([
                        on_click(|_| Msg::CancelCreateApp),
                        class("text-slate-400 hover:text-slate-600 transition-colors"),
                        disabled(busy),
                    ], [text("✕")]),
                ]),
                div([class("space-y-4")], [
                    div([], [
                        label([class("block text-sm font-medium text-slate-700 mb-2")], [text("App Name")]),
                        input([
                            r#type("text"),
                            value(&dialog.name),
                            placeholder("Enter app name..."),
                            on_input(|event| Msg::SetNewAppName(event.value())),
                            class("w-full px-3 py-2 border border-slate-300 rounded-lg focus:outline-none focus:ring-2 focus:ring-indigo-500 focus:border-transparent"),
                            disabled(busy),
                            autofocus(true),
                        ], []),
                    ]),
                    div([], [
                        label([class("block text-sm font-medium text-slate-700 mb-2")], [text("Description")]),
                        textarea([
                            value(&dialog.description),
                            placeholder("Describe what you want to build..."),
                            on_input(|event| Msg::SetNewAppDescription(event.value())),
                            class("w-full px-3 py-2 border border-slate-300 rounded-lg focus:outline-none focus:ring-2 focus:ring-indigo-500 focus:border-transparent resize-none h-28"),
                            disabled(busy),
                        ], []),
                    ]),
                ]),
                div([class("flex gap-3 mt-6")], [
                    button([
                        on_click(|_| Msg::CancelCreateApp),
                        class("flex-1 px-4 py-2 text-slate-600 bg-slate-100 rounded-lg hover:bg-slate-200 transition-colors disabled:opacity-50"),
                        disabled(busy),
                    ], [text("Cancel")]),
                    button([
                        on_click(|_| Msg::SubmitNewApp),
                        class("flex-1 px-4 py-2 bg-gradient-to-r from-indigo-600 to-purple-600 text-white rounded-lg hover:from-indigo-700 hover:to-purple-700 transition-all duration-200 disabled:opacity-50"),
                        disabled(busy),
                    ], [text(if busy { "Creating..." } else { "Create App" })]),
                ]),
            ]),
        ])
    }
}
