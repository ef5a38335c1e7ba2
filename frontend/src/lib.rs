use sauron::prelude::*;

pub mod api;
pub mod app;
pub mod card;
pub mod create_dialog;
pub mod log_stream;
pub mod scope;
mod views;

use app::Model;

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_tracing::set_as_global_default();

    tracing::info!("starting umami board");
    Program::mount_to_body(Model::default());
}
