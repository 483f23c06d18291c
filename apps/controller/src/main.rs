use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::event::EventStream;
use futures::StreamExt;
use rc_core::{
    load_settings, spawn_ws_link, ClientSettings, ControllerView, DispatchOutcome, InputBus,
    KeymapPreset, LinkSession, SettingsOverrides,
};
use tracing::{info, warn};

mod keymap;
mod logging;
mod terminal;

use keymap::{translate, Translated};
use terminal::TerminalGuard;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Keymap {
    Full,
    DriveOnly,
}

impl From<Keymap> for KeymapPreset {
    fn from(value: Keymap) -> Self {
        match value {
            Keymap::Full => KeymapPreset::Full,
            Keymap::DriveOnly => KeymapPreset::DriveOnly,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "rc-controller", about = "Keyboard and mouse remote control for an RC actuator")]
struct Args {
    /// WebSocket endpoint of the actuator, e.g. ws://host:8081
    #[arg(long)]
    endpoint: Option<String>,
    /// TOML control profile with drive/fire/head tables and key bindings
    #[arg(long)]
    profile: Option<PathBuf>,
    /// Replace the profile's key bindings with a built-in set
    #[arg(long, value_enum)]
    keymap: Option<Keymap>,
    /// tracing filter directive; defaults to RUST_LOG or "info"
    #[arg(long)]
    log_filter: Option<String>,
    /// Append logs to this file; without it logs are discarded while the grid is shown
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_tracing(args.log_filter.as_deref(), args.log_file.as_deref())?;

    let overrides = SettingsOverrides {
        endpoint: args.endpoint,
        profile: args.profile,
        keymap: args.keymap.map(KeymapPreset::from),
    };
    let settings = load_settings(&overrides).context("refusing to start")?;
    run(settings).await
}

async fn run(settings: ClientSettings) -> Result<()> {
    let ClientSettings {
        endpoint,
        shared_secret,
        profile,
    } = settings;

    let mut link = spawn_ws_link(endpoint.clone());
    let mut session = LinkSession::new(link.transport.clone(), shared_secret);

    let mut screen = TerminalGuard::enter()?;
    screen.draw_grid(endpoint.as_str(), &profile.keys)?;
    screen.status(&format!("link {}", session.state()))?;

    let bus = InputBus::new();
    let mut view = ControllerView::mount(&bus, profile);
    let mut terminal_events = EventStream::new();
    let reports_release = screen.reports_release();

    loop {
        tokio::select! {
            event = terminal_events.next() => match event {
                Some(Ok(event)) => match translate(&event, reports_release) {
                    Translated::Quit => break,
                    Translated::Input(events) => {
                        for event in events {
                            bus.publish(event);
                        }
                    }
                },
                Some(Err(err)) => {
                    warn!(%err, "terminal input failed");
                    break;
                }
                None => break,
            },
            Some(event) = view.next_event() => {
                let status = match view.dispatch(&mut session, &event) {
                    DispatchOutcome::Ignored => continue,
                    DispatchOutcome::Sent(command) => format!("sent {}", command.kind()),
                    DispatchOutcome::Dropped { error, .. } if error.is_link_unavailable() => {
                        "WebSocket not available!".to_string()
                    }
                    DispatchOutcome::Dropped { error, .. } => error.to_string(),
                };
                screen.status(&status)?;
            },
            Some(event) = link.events.recv() => {
                session.handle_event(event);
                screen.status(&format!("link {}", session.state()))?;
            },
        }
    }

    // Unmounting releases the input listeners only; the link stays up until
    // the process exits.
    drop(view);
    info!(state = %session.state(), "controller view closed");
    Ok(())
}
