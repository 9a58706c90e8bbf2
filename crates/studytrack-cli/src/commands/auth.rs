use clap::Subcommand;
use serde_json::json;
use studytrack_core::storage::Config;

use super::CliResult;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store the identity (and optionally the remote endpoint)
    Login {
        user_id: String,
        /// Remote base URL
        #[arg(long)]
        url: Option<String>,
        /// Remote API key
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Forget the identity; local data stays put
    Logout,
    /// Current identity and endpoint configuration
    Status,
}

pub fn run(action: AuthAction) -> CliResult {
    let mut config = Config::load()?;

    match action {
        AuthAction::Login { user_id, url, api_key } => {
            config.user_id = Some(user_id);
            if let Some(url) = url {
                config.remote.url = Some(url);
            }
            if let Some(api_key) = api_key {
                config.remote.api_key = Some(api_key);
            }
            config.save()?;
            println!(
                "{}",
                json!({
                    "userId": config.user_id,
                    "remoteConfigured": config.remote.is_configured(),
                })
            );
        }
        AuthAction::Logout => {
            config.user_id = None;
            config.save()?;
            println!("{}", json!({ "userId": serde_json::Value::Null }));
        }
        AuthAction::Status => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "userId": config.user_id,
                    "remoteConfigured": config.remote.is_configured(),
                }))?
            );
        }
    }
    Ok(())
}
