//! The controller façade: one live position, an optional timeline, the
//! oracle that judges every move and the configuration that shapes them.

mod action;
mod config;
mod controller;
mod diagnostics;

pub use action::ActionResult;
pub use config::GameConfig;
pub use controller::GameController;
pub use diagnostics::{DiagnosticSink, Diagnostics, Severity};
