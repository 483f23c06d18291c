//! Raw-mode terminal surface: the 3x3 button grid and a status line.

use std::io::{self, Stdout, Write};

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::Print,
    terminal::{
        self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use rc_core::{ControlButton, KeyBindings};
use rc_shared::domain::Action;
use tracing::warn;

use crate::keymap::{CELL_WIDTH, GRID_LEFT, GRID_TOP};

const STATUS_ROW: u16 = GRID_TOP + 4;
const HELP_ROW: u16 = GRID_TOP + 5;

fn label(button: ControlButton) -> &'static str {
    match button {
        ControlButton::HeadUp => "[h^]",
        ControlButton::Forward => "[^^]",
        ControlButton::Left => "[<<]",
        ControlButton::Fire => "[**]",
        ControlButton::Right => "[>>]",
        ControlButton::HeadDown => "[hv]",
        ControlButton::Backward => "[vv]",
    }
}

fn action_label(action: Action) -> &'static str {
    match action {
        Action::DriveForward => "forward",
        Action::DriveBackward => "back",
        Action::DriveLeft => "left",
        Action::DriveRight => "right",
        Action::Fire => "fire",
        Action::HeadUp => "head up",
        Action::HeadDown => "head down",
    }
}

/// Restores the terminal on every exit path, including early returns and panics.
pub struct TerminalGuard {
    stdout: Stdout,
    enhanced: bool,
}

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut guard = Self {
            stdout: io::stdout(),
            enhanced: false,
        };
        execute!(guard.stdout, EnterAlternateScreen, EnableMouseCapture, Hide)
            .context("failed to prepare terminal")?;

        if matches!(terminal::supports_keyboard_enhancement(), Ok(true)) {
            execute!(
                guard.stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )
            .context("failed to enable key release reporting")?;
            guard.enhanced = true;
        } else if !cfg!(windows) {
            warn!("terminal does not report key releases; every key press acts as a tap");
        }
        Ok(guard)
    }

    /// Whether key releases arrive as their own events.
    pub fn reports_release(&self) -> bool {
        self.enhanced || cfg!(windows)
    }

    pub fn draw_grid(&mut self, endpoint: &str, keys: &KeyBindings) -> Result<()> {
        queue!(
            self.stdout,
            Clear(ClearType::All),
            MoveTo(GRID_LEFT, 0),
            Print(format!("RC Human Controller  {endpoint}"))
        )?;
        for button in ControlButton::ALL {
            let (row, column) = button.cell();
            queue!(
                self.stdout,
                MoveTo(
                    GRID_LEFT + u16::from(column) * CELL_WIDTH,
                    GRID_TOP + u16::from(row)
                ),
                Print(label(button))
            )?;
        }
        let help = keys
            .iter()
            .map(|(key, action)| format!("{key} {}", action_label(action)))
            .collect::<Vec<_>>()
            .join("  ");
        queue!(
            self.stdout,
            MoveTo(GRID_LEFT, HELP_ROW),
            Print(format!("{help}  Esc quit"))
        )?;
        self.stdout.flush()?;
        Ok(())
    }

    pub fn status(&mut self, message: &str) -> Result<()> {
        queue!(
            self.stdout,
            MoveTo(GRID_LEFT, STATUS_ROW),
            Clear(ClearType::CurrentLine),
            Print(message)
        )?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.enhanced {
            let _ = execute!(self.stdout, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(self.stdout, DisableMouseCapture, LeaveAlternateScreen, Show);
        let _ = disable_raw_mode();
    }
}
