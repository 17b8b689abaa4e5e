//! Full-screen diagnostic for an error that escaped the scene graph.

use pst_types::{Fault, NavigationSignal, Termination};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExceptionButton {
    #[default]
    ReturnToMain,
    Trace,
    Close,
}

impl ExceptionButton {
    pub const ALL: [ExceptionButton; 3] = [Self::ReturnToMain, Self::Trace, Self::Close];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ReturnToMain => "Return to Main",
            Self::Trace => "Trace",
            Self::Close => "Close",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::ReturnToMain => 0,
            Self::Trace => 1,
            Self::Close => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExceptionView {
    fault: Fault,
    resume_target: Option<String>,
    focused: ExceptionButton,
    scroll: u16,
}

impl ExceptionView {
    /// `resume_target` is the view that was active when the fault was raised.
    #[must_use]
    pub fn new(fault: Fault, resume_target: Option<String>) -> Self {
        Self {
            fault,
            resume_target,
            focused: ExceptionButton::default(),
            scroll: 0,
        }
    }

    #[must_use]
    pub fn fault(&self) -> &Fault {
        &self.fault
    }

    #[must_use]
    pub fn resume_target(&self) -> Option<&str> {
        self.resume_target.as_deref()
    }

    #[must_use]
    pub fn title(&self) -> String {
        format!("ERROR: [{}]", self.fault.kind())
    }

    #[must_use]
    pub fn headline(&self) -> String {
        match self.fault.location() {
            Some(location) => format!(
                "Exception on line {} ({})",
                location.line(),
                location.file()
            ),
            None => "Exception at an unknown location".to_string(),
        }
    }

    #[must_use]
    pub fn focused(&self) -> ExceptionButton {
        self.focused
    }

    pub fn focus(&mut self, button: ExceptionButton) {
        self.focused = button;
    }

    pub fn focus_next(&mut self) {
        self.focused = ExceptionButton::ALL[(self.focused.index() + 1) % 3];
    }

    pub fn focus_prev(&mut self) {
        self.focused = ExceptionButton::ALL[(self.focused.index() + 2) % 3];
    }

    #[must_use]
    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max = self.fault.trace().lines().count().saturating_sub(1);
        let max = u16::try_from(max).unwrap_or(u16::MAX);
        self.scroll = self.scroll.saturating_add(lines).min(max);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Activate the focused button.
    #[must_use]
    pub fn activate(&self) -> NavigationSignal {
        match self.focused {
            ExceptionButton::ReturnToMain => Self::return_to_main(),
            ExceptionButton::Trace => self.trace(),
            ExceptionButton::Close => Self::close(),
        }
    }

    #[must_use]
    pub fn return_to_main() -> NavigationSignal {
        NavigationSignal::Terminate(Termination::Resume)
    }

    /// Re-raise the original fault.
    #[must_use]
    pub fn trace(&self) -> NavigationSignal {
        NavigationSignal::Fatal(self.fault.clone())
    }

    #[must_use]
    pub fn close() -> NavigationSignal {
        NavigationSignal::Terminate(Termination::Close)
    }
}
