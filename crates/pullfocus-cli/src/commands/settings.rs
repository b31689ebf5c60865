use clap::Subcommand;

use super::common::{print_json, CmdResult, Host};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the active settings profile
    Show,
    /// Change one or more settings; the rest keep their values
    Set {
        /// Focus length in minutes
        #[arg(long)]
        focus: Option<u32>,
        /// Short break length in minutes
        #[arg(long)]
        short_break: Option<u32>,
        /// Long break length in minutes
        #[arg(long)]
        long_break: Option<u32>,
        /// Completed focus intervals per long break
        #[arg(long)]
        round_interval: Option<u32>,
        /// Start the next interval automatically
        #[arg(long)]
        auto_start: Option<bool>,
    },
}

pub fn run(action: SettingsAction, host: &Host) -> CmdResult {
    let mut engine = host.open_engine()?;

    match action {
        SettingsAction::Show => print_json(engine.settings())?,
        SettingsAction::Set {
            focus,
            short_break,
            long_break,
            round_interval,
            auto_start,
        } => {
            let mut profile = engine.settings().clone();
            if let Some(v) = focus {
                profile.focus_duration = v;
            }
            if let Some(v) = short_break {
                profile.short_break_duration = v;
            }
            if let Some(v) = long_break {
                profile.long_break_duration = v;
            }
            if let Some(v) = round_interval {
                profile.round_interval = v;
            }
            if let Some(v) = auto_start {
                profile.auto_start = v;
            }

            let event = engine.update_settings(profile)?;
            print_json(&event)?;
        }
    }
    Ok(())
}
