use clap::Subcommand;

use super::{finish, now, open_session, CliResult};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Current daily question goal
    Show,
    /// Set the daily question goal
    Set { daily: u32 },
}

pub fn run(action: GoalAction) -> CliResult {
    let mut session = open_session()?;

    match action {
        GoalAction::Show => {
            println!("{}", serde_json::to_string_pretty(&session.question_goal())?);
        }
        GoalAction::Set { daily } => {
            session.set_question_goal(daily, now());
            println!("{}", serde_json::to_string_pretty(&session.question_goal())?);
            finish(&mut session);
        }
    }
    Ok(())
}
