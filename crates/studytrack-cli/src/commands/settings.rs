use clap::Subcommand;
use studytrack_core::ExamType;

use super::{finish, now, open_session, parse_subject, CliResult};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Current exam profile and streak thresholds
    Show,
    /// Switch the exam profile (JEE or NEET)
    Exam { exam_type: String },
    /// Adjust streak thresholds
    Streak {
        #[arg(long)]
        hours: Option<f64>,
        #[arg(long)]
        questions: Option<u32>,
    },
    /// Override a subject's display name
    SubjectName { subject: String, name: String },
}

pub fn run(action: SettingsAction) -> CliResult {
    let mut session = open_session()?;
    let at = now();

    match action {
        SettingsAction::Show => {
            println!("{}", serde_json::to_string_pretty(session.exam_settings())?);
            return Ok(());
        }
        SettingsAction::Exam { exam_type } => {
            let exam_type = ExamType::parse(&exam_type)
                .ok_or_else(|| format!("unknown exam type '{exam_type}'"))?;
            let mut settings = session.exam_settings().clone();
            settings.exam_type = exam_type;
            session.update_exam_settings(settings, at);
        }
        SettingsAction::Streak { hours, questions } => {
            let mut settings = session.exam_settings().clone();
            if let Some(hours) = hours {
                settings.streak_settings.min_study_hours = hours;
            }
            if let Some(questions) = questions {
                settings.streak_settings.min_questions = questions;
            }
            session.update_exam_settings(settings, at);
        }
        SettingsAction::SubjectName { subject, name } => {
            let subject = parse_subject(&subject)?;
            let mut settings = session.exam_settings().clone();
            settings.subject_names.insert(subject.tag().to_string(), name);
            session.update_exam_settings(settings, at);
        }
    }

    println!("{}", serde_json::to_string_pretty(session.exam_settings())?);
    finish(&mut session);
    Ok(())
}
