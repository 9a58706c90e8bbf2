use clap::Subcommand;

use super::{now, open_session, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's per-subject study time and question counts
    Today,
}

pub fn run(action: StatsAction) -> CliResult {
    let session = open_session()?;

    match action {
        StatsAction::Today => {
            let stats = session.today_stats(now());
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
