pub mod auth;
pub mod goal;
pub mod log;
pub mod settings;
pub mod stats;
pub mod streak;
pub mod sync;
pub mod task;
pub mod timer;

use chrono::{Local, NaiveDateTime};
use studytrack_core::clock::parse_wall_clock;
use studytrack_core::storage::{Config, LocalStore};
use studytrack_core::sync::RestRemote;
use studytrack_core::{StudySession, Subject, SyncPhase};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Open the session, attaching the remote when the config carries both an
/// endpoint and a signed-in identity. Sign-in runs the download/migrate
/// reconciliation; a dead remote degrades to local-only with a warning.
pub fn open_session() -> Result<StudySession, Box<dyn std::error::Error>> {
    let store = LocalStore::open()?;
    let mut session = StudySession::open(store)?;

    let config = Config::load()?;
    if let Some(user_id) = &config.user_id {
        if config.remote.is_configured() {
            let url = config.remote.url.as_deref().unwrap_or_default();
            let api_key = config.remote.api_key.as_deref().unwrap_or_default();
            match RestRemote::new(url, api_key) {
                Ok(remote) => {
                    session.sign_in(user_id, Box::new(remote), now());
                }
                Err(err) => ::log::warn!("remote unavailable, working locally: {err}"),
            }
        }
    }
    Ok(session)
}

/// Flush state before the process exits. While synced, push immediately
/// (the in-process debounce never gets a chance to fire). A failed push
/// saves the state locally instead; note the remote stays authoritative,
/// so a later sign-in that can fetch the old row discards that save.
pub fn finish(session: &mut StudySession) {
    if session.phase() != SyncPhase::Synced {
        return;
    }
    if let Err(err) = session.sync_now(now()) {
        ::log::warn!("push failed, keeping state locally: {err}");
        session.sign_out(now());
    }
}

pub fn parse_subject(tag: &str) -> Result<Subject, Box<dyn std::error::Error>> {
    Subject::parse(&tag.to_ascii_lowercase())
        .ok_or_else(|| format!("unknown subject '{tag}'").into())
}

pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, Box<dyn std::error::Error>> {
    parse_wall_clock(s).ok_or_else(|| format!("unparseable time '{s}'").into())
}
