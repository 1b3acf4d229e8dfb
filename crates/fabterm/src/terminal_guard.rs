//! RAII guard for terminal ownership while the UI runs

use anyhow::Result;
use crossterm::{cursor, execute, terminal};
use std::io;

/// Owns raw mode and the alternate screen for its lifetime.
///
/// Both are restored on drop, so every exit path (including errors) leaves
/// the user's shell usable.
pub struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen: bool,
    // Marker to ensure this type is !Send and !Sync
    _marker: std::marker::PhantomData<*const ()>,
}

impl TerminalGuard {
    pub fn acquire() -> Result<Self> {
        let mut guard = Self {
            raw_mode_enabled: false,
            alternate_screen: false,
            _marker: std::marker::PhantomData,
        };
        guard.enable_raw_mode()?;
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        guard.alternate_screen = true;
        Ok(guard)
    }

    fn enable_raw_mode(&mut self) -> Result<()> {
        if !self.raw_mode_enabled {
            terminal::enable_raw_mode()?;
            self.raw_mode_enabled = true;
        }
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> Result<()> {
        if self.raw_mode_enabled {
            terminal::disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.alternate_screen {
            let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        }
        let _ = self.disable_raw_mode();
    }
}
