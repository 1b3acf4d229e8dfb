//! Opening navigation targets

use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};
use tracing::info;

/// How a navigation was carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opened {
    /// Handed to the system browser
    Browser,
    /// Left for the user to open; the session shows the URL
    Manual,
}

pub trait Navigator: Send {
    fn open(&mut self, url: &str) -> Result<Opened>;
}

/// Opens URLs in the system browser
#[derive(Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn open(&mut self, url: &str) -> Result<Opened> {
        info!(url, "Opening browser");
        webbrowser::open(url).with_context(|| format!("Failed to open {url}"))?;
        Ok(Opened::Browser)
    }
}

/// Never launches anything
#[derive(Debug, Default)]
pub struct ManualNavigator;

impl Navigator for ManualNavigator {
    fn open(&mut self, _url: &str) -> Result<Opened> {
        Ok(Opened::Manual)
    }
}

/// Records every URL; clones share the record
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    opened: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<String> {
        match self.opened.lock() {
            Ok(opened) => opened.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Navigator for RecordingNavigator {
    fn open(&mut self, url: &str) -> Result<Opened> {
        let mut opened = self
            .opened
            .lock()
            .map_err(|_| anyhow::anyhow!("navigation record poisoned"))?;
        opened.push(url.to_string());
        Ok(Opened::Browser)
    }
}

pub fn for_config(open_browser: bool) -> Box<dyn Navigator> {
    if open_browser {
        Box::new(BrowserNavigator)
    } else {
        Box::new(ManualNavigator)
    }
}
