use clap::Subcommand;

use super::{open_session, CliResult};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Current and longest streak
    Show,
}

pub fn run(action: StreakAction) -> CliResult {
    let session = open_session()?;

    match action {
        StreakAction::Show => {
            println!("{}", serde_json::to_string_pretty(session.streak())?);
        }
    }
    Ok(())
}
