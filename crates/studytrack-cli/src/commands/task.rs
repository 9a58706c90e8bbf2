use clap::Subcommand;
use serde_json::json;
use studytrack_core::{Priority, Task};

use super::{finish, now, open_session, parse_datetime, parse_subject, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a task
    Add {
        title: String,
        subject: String,
        /// low, medium or high
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Estimated effort in minutes
        #[arg(long)]
        estimated: Option<u32>,
        /// Target date, defaults to now
        #[arg(long)]
        target: Option<String>,
    },
    /// List all tasks
    List,
    /// Toggle a task's completion
    Done { id: String },
    /// Delete a task
    Delete { id: String },
}

pub fn run(action: TaskAction) -> CliResult {
    let mut session = open_session()?;
    let at = now();

    match action {
        TaskAction::Add {
            title,
            subject,
            priority,
            estimated,
            target,
        } => {
            let subject = parse_subject(&subject)?;
            let mut task = Task::new(title, subject, at);
            task.priority = Priority::parse(&priority)
                .ok_or_else(|| format!("unknown priority '{priority}'"))?;
            task.estimated_time = estimated;
            if let Some(target) = target {
                task.target_date = Some(parse_datetime(&target)?);
            }
            let out = serde_json::to_string_pretty(&task)?;
            session.add_task(task, at)?;
            println!("{out}");
        }
        TaskAction::List => {
            println!("{}", serde_json::to_string_pretty(session.tasks())?);
        }
        TaskAction::Done { id } => {
            let completed = session.toggle_task(&id, at)?;
            println!("{}", json!({ "id": id, "completed": completed }));
        }
        TaskAction::Delete { id } => {
            session.delete_task(&id, at)?;
            println!("{}", json!({ "deleted": id }));
        }
    }

    finish(&mut session);
    Ok(())
}
