use clap::Subcommand;
use pullfocus_core::{Event, Mode, Status, TimerEngine, TimerService, TimerView};
use serde::Serialize;
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use super::common::{print_json, print_line, CmdResult, Host};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON
    Status,
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Back to idle with a full interval in the current mode
    Reset,
    /// Switch to a mode: focus, short-break or long-break
    Mode { mode: Mode },
    /// Advance to the next mode, logging the interrupted interval as skipped
    Next {
        /// Do not record the interrupted interval
        #[arg(long)]
        no_log: bool,
    },
    /// Set the completed-focus counter back to zero
    ResetCycles,
    /// Run the countdown in the foreground, one JSON line per tick and event
    Watch {
        /// Exit after the current interval completes
        #[arg(long)]
        once: bool,
        /// Description attached to the next logged session
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete all sessions, restore default settings and reset the timer
    FullReset {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Serialize)]
struct Outcome {
    event: Option<Event>,
    timer: TimerView,
}

fn report(engine: &TimerEngine, event: Option<Event>) -> CmdResult {
    print_json(&Outcome {
        event,
        timer: engine.view(),
    })
}

pub fn run(action: TimerAction, host: &Host) -> CmdResult {
    let mut engine = host.open_engine()?;

    match action {
        TimerAction::Status => {
            print_json(&json!({
                "timer": engine.view(),
                "snapshot": engine.snapshot(),
                "lastSession": engine.sessions().latest(),
            }))?;
        }
        TimerAction::Start => {
            let event = engine.start();
            report(&engine, event)?;
        }
        TimerAction::Pause => {
            let event = engine.pause();
            report(&engine, event)?;
        }
        TimerAction::Reset => {
            let event = engine.reset();
            report(&engine, event)?;
        }
        TimerAction::Mode { mode } => {
            let event = engine.change_mode(mode);
            report(&engine, event)?;
        }
        TimerAction::Next { no_log } => {
            let event = engine.next_mode(!no_log);
            report(&engine, event)?;
        }
        TimerAction::ResetCycles => {
            let event = engine.reset_cycles();
            report(&engine, event)?;
        }
        TimerAction::Watch { once, note } => watch(engine, once, note)?,
        TimerAction::FullReset { yes } => {
            if !yes {
                return Err("refusing to wipe all data without --yes".into());
            }
            let event = engine.full_reset();
            report(&engine, event)?;
        }
    }
    Ok(())
}

/// Hand the engine to a [`TimerService`] and stream until Ctrl-C, or until
/// the running interval completes when `once` is set.
fn watch(engine: TimerEngine, once: bool, note: Option<String>) -> CmdResult {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let handle = TimerService::spawn(engine);
        let mut events = handle.subscribe();
        let mut views = handle.watch();

        handle.set_session_note(note).await?;
        if handle.view().status != Status::Running {
            handle.start().await?;
        }

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                changed = views.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let view = views.borrow_and_update().clone();
                    print_line(&view)?;
                }
                event = events.recv() => match event {
                    Ok(event) => {
                        let completed = matches!(event, Event::TimerCompleted { .. });
                        print_line(&event)?;
                        if completed && once {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => warn!(skipped, "event stream lagged"),
                    Err(RecvError::Closed) => break,
                },
                _ = &mut ctrl_c => {
                    info!("interrupted");
                    break;
                }
            }
        }

        handle.shutdown().await?;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
