use clap::Subcommand;
use serde_json::json;

use super::{finish, now, open_session, parse_datetime, parse_subject, CliResult};

#[derive(Subcommand)]
pub enum LogAction {
    /// Record a session manually with explicit start/end times
    Add {
        subject: String,
        /// Start time, e.g. 2024-03-15T10:00:00
        start: String,
        /// End time, must be after start
        end: String,
        #[arg(long, default_value = "0")]
        questions: u32,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List all recorded sessions
    List,
    /// Edit a session's end time, question count, or notes
    Edit {
        id: String,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        questions: Option<u32>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a session
    Delete { id: String },
}

pub fn run(action: LogAction) -> CliResult {
    let mut session = open_session()?;
    let at = now();

    match action {
        LogAction::Add {
            subject,
            start,
            end,
            questions,
            notes,
        } => {
            let subject = parse_subject(&subject)?;
            let start = parse_datetime(&start)?;
            let end = parse_datetime(&end)?;
            let log = session.add_manual_log(subject, start, end, questions, notes, at)?;
            println!("{}", serde_json::to_string_pretty(&log)?);
        }
        LogAction::List => {
            println!("{}", serde_json::to_string_pretty(session.time_logs())?);
        }
        LogAction::Edit {
            id,
            end,
            questions,
            notes,
        } => {
            if let Some(end) = end {
                session.edit_log_end_time(&id, parse_datetime(&end)?, at)?;
            }
            if let Some(questions) = questions {
                session.edit_log_question_count(&id, questions, at)?;
            }
            if let Some(notes) = notes {
                session.edit_log_notes(&id, Some(notes), at)?;
            }
            let log = session.time_logs().iter().find(|l| l.id == id);
            println!("{}", serde_json::to_string_pretty(&log)?);
        }
        LogAction::Delete { id } => {
            session.delete_log(&id, at)?;
            println!("{}", json!({ "deleted": id }));
        }
    }

    finish(&mut session);
    Ok(())
}
