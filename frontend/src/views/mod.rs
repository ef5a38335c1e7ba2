//! Screens and dialogs rendered from [`crate::app::Model`].

mod apps_grid;
mod board;
mod log_dialog;
mod task_card;
