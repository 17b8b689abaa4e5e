//! Shared test utilities and fixtures
//!
//! A scripted [`Screen`] that feeds canned terminal events into the control
//! loop and records what was on screen each time input was requested.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;

use pst_config::ConfigStore;
use pst_tui::Screen;

use crate::vt100_backend::VT100Backend;

pub const WIDTH: u16 = 100;
pub const HEIGHT: u16 = 32;

pub struct ScriptedScreen {
    terminal: Terminal<VT100Backend>,
    events: VecDeque<Event>,
    /// Screen contents captured before each event was delivered.
    frames: Vec<String>,
    pending_size: Option<(u16, u16)>,
    reopened: usize,
}

impl ScriptedScreen {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            terminal: Terminal::new(VT100Backend::new(WIDTH, HEIGHT))
                .expect("vt100 terminal"),
            events: events.into_iter().collect(),
            frames: Vec::new(),
            pending_size: None,
            reopened: 0,
        }
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    /// Index of the first captured frame containing `needle`.
    pub fn frame_with(&self, needle: &str) -> Option<usize> {
        self.frames.iter().position(|frame| frame.contains(needle))
    }

    pub fn last_frame(&self) -> &str {
        self.frames.last().map_or("", String::as_str)
    }

    pub fn reopened(&self) -> usize {
        self.reopened
    }

    pub fn size(&self) -> (u16, u16) {
        self.terminal.backend().size_cells()
    }
}

impl Screen for ScriptedScreen {
    type Backend = VT100Backend;

    fn terminal(&mut self) -> &mut Terminal<VT100Backend> {
        &mut self.terminal
    }

    fn next_event(&mut self) -> io::Result<Event> {
        self.frames.push(self.terminal.backend().contents());
        let event = self
            .events
            .pop_front()
            .ok_or_else(|| io::Error::other("event script exhausted"))?;
        if let Event::Resize(width, height) = event {
            self.pending_size = Some((width, height));
        }
        Ok(event)
    }

    fn reopen(&mut self) -> io::Result<()> {
        if let Some((width, height)) = self.pending_size.take() {
            self.terminal.backend_mut().reopen(width, height);
        }
        self.reopened += 1;
        self.terminal.clear()
    }
}

pub fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

pub fn chr(c: char) -> Event {
    key(KeyCode::Char(c))
}

pub fn ctrl(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

/// Config file in a fresh temp dir, seeded with `json`.
pub fn seeded_config(json: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("current_config.json");
    fs::write(&path, json).expect("seed config");
    (dir, path)
}

pub fn load(path: &Path) -> ConfigStore {
    ConfigStore::load(path, Some("pst")).expect("load config")
}
