use clap::Subcommand;
use serde_json::json;
use studytrack_core::SyncPhase;

use super::{now, open_session, CliResult};

#[derive(Subcommand)]
pub enum SyncAction {
    /// Push the full state to the remote immediately
    Now,
    /// Current sync phase
    Status,
}

pub fn run(action: SyncAction) -> CliResult {
    let mut session = open_session()?;

    match action {
        SyncAction::Now => {
            session.sync_now(now())?;
            println!(
                "{}",
                json!({
                    "pushed": true,
                    "lastSyncAt": session.last_sync_at().map(|t| t.to_rfc3339()),
                })
            );
        }
        SyncAction::Status => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "phase": session.phase(),
                    "synced": session.phase() == SyncPhase::Synced,
                    "lastSyncAt": session.last_sync_at().map(|t| t.to_rfc3339()),
                }))?
            );
        }
    }
    Ok(())
}
