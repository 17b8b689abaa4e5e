//! Core domain types for PST.
//!
//! This crate contains pure domain types with no IO and no terminal access.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod fault;
mod navigation;
mod ui;
mod value;

pub use fault::{FatalError, Fault, SourceLocation};
pub use navigation::{NavigationSignal, Termination};
pub use ui::UiOptions;
pub use value::ConfigValue;
