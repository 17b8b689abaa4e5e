//! Outcomes of view actions.

use crate::Fault;

/// Why a scene stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Global quit shortcut.
    UserRequested,
    /// "Return to Main" from the exception view: re-enter the scene graph fresh.
    Resume,
    /// "Close" from the exception view: exit with success status.
    Close,
}

impl Termination {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::UserRequested => "user requested",
            Self::Resume => "resume",
            Self::Close => "close",
        }
    }

    /// Whether this termination ends the process (as opposed to resuming).
    #[must_use]
    pub const fn is_exit(self) -> bool {
        matches!(self, Self::UserRequested | Self::Close)
    }
}

/// Tagged outcome of a view action, consumed only by the control loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationSignal {
    /// Render the named view next. The empty name means "no target".
    GoTo(String),
    Terminate(Termination),
    /// Terminal dimensions changed; resume at the named view.
    Resize(String),
    /// Re-raise a captured fault to the process boundary.
    Fatal(Fault),
}

impl NavigationSignal {
    pub fn go_to(name: impl Into<String>) -> Self {
        Self::GoTo(name.into())
    }
}
