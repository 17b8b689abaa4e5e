//! Control loop: draw, read one event, dispatch, repeat.
//!
//! [`run_scenes`] drives the scene graph until something stops it.
//! [`supervise`] wraps it as the single recovery boundary:
//!
//! ```text
//! supervise ──► run_scenes ──► Resized    ──► reopen screen, resume same view
//!                          ├─► Terminated ──► return (Resume re-enters main)
//!                          └─► Err/panic  ──► exception loop
//!                                               ├─► Return to Main ──► reset, re-enter
//!                                               ├─► Close          ──► Ok(Close)
//!                                               └─► Trace / error  ──► Err(fault)
//! ```

use std::cell::{Cell, RefCell};
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use crossterm::event::Event;
use ratatui::{Terminal, backend::Backend};
use tracing::{error, info, warn};

use pst_engine::views::ExceptionView;
use pst_engine::{App, Fault, Flow, NavigationSignal, SceneExit, Termination, UiOptions};
use pst_types::SourceLocation;

use crate::input::{handle_event, handle_exception_event};

/// The rendering surface plus its input source.
pub trait Screen {
    type Backend: Backend;

    fn terminal(&mut self) -> &mut Terminal<Self::Backend>;

    /// Block until the next input event.
    fn next_event(&mut self) -> io::Result<Event>;

    /// Re-acquire the surface after its dimensions changed.
    fn reopen(&mut self) -> io::Result<()>;
}

thread_local! {
    /// Nesting depth of `guarded` on this thread.
    static SUPERVISED: Cell<usize> = const { Cell::new(0) };
    static PANIC_LOCATION: RefCell<Option<SourceLocation>> = const { RefCell::new(None) };
}

static PANIC_HOOK: Once = Once::new();

/// Record panic locations for supervised code instead of printing them.
///
/// Installed once per process. Panics outside `guarded` reach the previous hook.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if SUPERVISED.with(Cell::get) == 0 {
                previous(info);
                return;
            }
            let location = info.location().map(SourceLocation::from);
            match &location {
                Some(at) => error!(location = %at, "Panic captured by supervisor"),
                None => error!("Panic captured by supervisor"),
            }
            PANIC_LOCATION.with(|slot| *slot.borrow_mut() = location);
        }));
    });
}

/// Run `body`, converting an unwinding panic into a [`Fault`].
fn guarded<T>(body: impl FnOnce() -> Result<T, Fault>) -> Result<T, Fault> {
    SUPERVISED.with(|depth| depth.set(depth.get() + 1));
    let outcome = panic::catch_unwind(AssertUnwindSafe(body));
    SUPERVISED.with(|depth| depth.set(depth.get().saturating_sub(1)));

    outcome.unwrap_or_else(|payload| {
        let location = PANIC_LOCATION.with(|slot| slot.borrow_mut().take());
        Err(Fault::from_panic(&*payload, location))
    })
}

/// Drive the scene graph until it stops or fails.
pub fn run_scenes<S: Screen>(screen: &mut S, app: &mut App) -> Result<SceneExit, Fault> {
    loop {
        screen.terminal().draw(|frame| crate::draw(frame, app))?;
        let event = screen.next_event()?;
        let Some(signal) = handle_event(app, event)? else {
            continue;
        };
        if let Flow::Exit(exit) = app.dispatch(signal)? {
            return Ok(exit);
        }
    }
}

/// Nested loop that owns the screen while an error is displayed.
///
/// Resizes redraw in place. `Err` carries either the original fault (Trace)
/// or a new one raised while the exception view was active.
fn run_exception<S: Screen>(
    screen: &mut S,
    view: &mut ExceptionView,
    options: UiOptions,
) -> Result<Termination, Fault> {
    loop {
        screen
            .terminal()
            .draw(|frame| crate::draw_exception(frame, view, options))?;
        let event = screen.next_event()?;
        match handle_exception_event(view, event)? {
            None | Some(NavigationSignal::GoTo(_)) => {}
            Some(NavigationSignal::Resize(_)) => screen.reopen()?,
            Some(NavigationSignal::Terminate(reason)) => return Ok(reason),
            Some(NavigationSignal::Fatal(fault)) => return Err(fault),
        }
    }
}

/// Show `fault` and wait for the user to pick a recovery.
fn recover<S: Screen>(screen: &mut S, app: &App, fault: Fault) -> Result<Termination, Fault> {
    error!(
        kind = fault.kind(),
        line = ?fault.line(),
        view = %app.current_view_name(),
        "Unhandled error: {}",
        fault.message()
    );

    let options = app.ui_options();
    let mut view = ExceptionView::new(fault, Some(app.current_view_name().to_string()));
    let outcome = guarded(|| run_exception(screen, &mut view, options));

    if let Err(raised) = &outcome {
        if raised == view.fault() {
            info!(kind = raised.kind(), "Trace requested; re-raising");
        } else {
            error!(
                kind = raised.kind(),
                line = ?raised.line(),
                "Error inside exception view is fatal: {}",
                raised.message()
            );
        }
    }
    outcome
}

/// Work to do before the next `run_scenes`, inside the guard.
enum Reentry {
    /// Re-open the screen and resume the named view.
    Resume(String),
    /// Rebuild the entry view after "Return to Main".
    Reset,
}

/// Outer control loop and single recovery boundary.
///
/// `Ok` means a graceful exit (quit shortcut or Close). `Err` carries the
/// fault to report at the process boundary.
pub fn supervise<S: Screen>(screen: &mut S, app: &mut App) -> Result<Termination, Fault> {
    install_panic_hook();
    let mut reentry: Option<Reentry> = None;

    loop {
        let outcome = guarded(|| {
            match reentry.take() {
                Some(Reentry::Resume(view)) => {
                    screen.reopen()?;
                    app.resume(&view)?;
                }
                Some(Reentry::Reset) => app.reset()?,
                None => {}
            }
            run_scenes(screen, app)
        });

        match outcome {
            Ok(SceneExit::Resized { last_view }) => {
                info!(view = %last_view, "Reopening screen after resize");
                reentry = Some(Reentry::Resume(last_view));
            }
            Ok(SceneExit::Terminated(reason)) if reason.is_exit() => {
                info!(reason = reason.message(), "Control loop finished");
                return Ok(reason);
            }
            Ok(SceneExit::Terminated(_)) => reentry = Some(Reentry::Reset),
            Err(fault) => match recover(screen, app, fault)? {
                reason if reason.is_exit() => {
                    info!(reason = reason.message(), "Control loop finished");
                    return Ok(reason);
                }
                _ => {
                    warn!("Recovered from error; re-entering entry view");
                    reentry = Some(Reentry::Reset);
                }
            },
        }
    }
}
