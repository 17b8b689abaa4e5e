//! Core engine for PST - views, view registry and scene state.
//!
//! This crate contains the navigation state machine without terminal
//! dependencies. Rendering and input live in `pst-tui`.

mod registry;
mod scene;
pub mod views;

pub use registry::{CONFIG_VIEW, MAIN_VIEW, UnknownViewError, ViewFactory, ViewRegistry};
pub use scene::{App, Flow, Notice, NoticeLevel, SceneExit};
pub use views::View;

pub use pst_config::{ConfigError, ConfigStore};
pub use pst_types::{ConfigValue, Fault, NavigationSignal, Termination, UiOptions};
