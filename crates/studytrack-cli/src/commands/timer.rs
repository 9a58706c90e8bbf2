use clap::Subcommand;
use serde_json::json;

use super::{finish, now, open_session, parse_subject, CliResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a subject's timer
    Start {
        /// Subject tag (physics, chemistry, ...)
        subject: String,
        /// Task id to attach to the session
        #[arg(long)]
        goal_id: Option<String>,
        /// Task title snapshot
        #[arg(long)]
        goal_title: Option<String>,
    },
    /// Stop a subject's timer, logging the completed session
    Pause {
        subject: String,
    },
    /// Print every timer's state as JSON
    Status,
    /// Adjust the running question count
    Questions {
        subject: String,
        #[command(subcommand)]
        op: QuestionsOp,
    },
}

#[derive(Subcommand)]
pub enum QuestionsOp {
    /// Count one more solved question
    Inc,
    /// Undo one (floors at zero)
    Dec,
    /// Set the count outright
    Set { count: u32 },
}

pub fn run(action: TimerAction) -> CliResult {
    let mut session = open_session()?;
    let at = now();

    match action {
        TimerAction::Start {
            subject,
            goal_id,
            goal_title,
        } => {
            let subject = parse_subject(&subject)?;
            session.start_timer(subject, at, goal_id, goal_title)?;
            println!("{}", json!({ "started": subject }));
        }
        TimerAction::Pause { subject } => {
            let subject = parse_subject(&subject)?;
            let log = session.pause_timer(subject, at)?;
            println!("{}", serde_json::to_string_pretty(&log)?);
        }
        TimerAction::Status => {
            let snapshot: serde_json::Map<String, serde_json::Value> = session
                .timers()
                .timers()
                .iter()
                .map(|(subject, timer)| {
                    (
                        subject.tag().to_string(),
                        json!({
                            "isRunning": timer.is_running,
                            "elapsedSecs": timer.projected_elapsed(at),
                            "questionCount": timer.question_count,
                            "goalTitle": timer.goal_title,
                        }),
                    )
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        TimerAction::Questions { subject, op } => {
            let subject = parse_subject(&subject)?;
            match op {
                QuestionsOp::Inc => session.increment_questions(subject, at)?,
                QuestionsOp::Dec => session.decrement_questions(subject, at)?,
                QuestionsOp::Set { count } => session.set_question_count(subject, count, at)?,
            }
            let count = session
                .timers()
                .timer(subject)
                .map(|t| t.question_count)
                .unwrap_or(0);
            println!("{}", json!({ "subject": subject, "questionCount": count }));
        }
    }

    finish(&mut session);
    Ok(())
}
