use crate::{
    cli::{
        actions::{
            admin::{self, Register, StudentsCommand, TeachersCommand},
            login,
            results::{self, Entry, GradeArgs, ResultsCommand},
            student, Action,
        },
        commands::{self, portal, results as results_args},
        globals::GlobalArgs,
    },
    dashboard::{GradeBands, Portal, StudentForm, TeacherForm},
    gateway::types::ResultFilter,
};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;
use std::path::PathBuf;

fn text(matches: &ArgMatches, id: &str) -> Option<String> {
    matches.get_one::<String>(id).cloned()
}

fn text_or_empty(matches: &ArgMatches, id: &str) -> String {
    text(matches, id).unwrap_or_default()
}

fn secret(matches: &ArgMatches, id: &str) -> Option<SecretString> {
    text(matches, id).map(SecretString::from)
}

fn globals(matches: &ArgMatches) -> Result<GlobalArgs> {
    let url = text(matches, commands::ARG_URL).context("missing required argument: --url")?;
    let timeout = matches
        .get_one::<u64>(commands::ARG_TIMEOUT)
        .copied()
        .unwrap_or(10);
    Ok(GlobalArgs::new(url, timeout))
}

fn bands(matches: &ArgMatches) -> GradeBands {
    let threshold = |id: &str| matches.get_one::<f64>(id).copied();
    GradeBands::new(
        threshold(results_args::ARG_GRADE_A),
        threshold(results_args::ARG_GRADE_B),
        threshold(results_args::ARG_GRADE_C),
        threshold(results_args::ARG_GRADE_D),
    )
}

fn entry(matches: &ArgMatches) -> Entry {
    Entry {
        form: None,
        level: text(matches, "level"),
        subject: text(matches, "subject"),
        new_subject: text(matches, "new-subject"),
        term: text(matches, "term"),
        year: matches.get_one::<i32>("year").copied(),
        exam_type: text(matches, "exam-type"),
        exam_date: text(matches, "exam-date"),
        marks: text(matches, results_args::ARG_MARKS),
        comment: text(matches, "comment"),
    }
}

fn login_args(globals: GlobalArgs, kind: Portal, matches: &ArgMatches) -> login::Args {
    login::Args {
        globals,
        portal: kind,
        id: text(matches, portal::ARG_ID),
        password: secret(matches, portal::ARG_PASSWORD),
        remember: matches
            .try_get_one::<bool>(portal::ARG_REMEMBER)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false),
        prefs: matches
            .try_get_one::<PathBuf>(portal::ARG_PREFS)
            .ok()
            .flatten()
            .cloned(),
    }
}

fn delete_args(matches: &ArgMatches) -> Result<(i64, bool)> {
    let id = matches
        .get_one::<i64>(portal::ARG_ID)
        .copied()
        .context("missing required argument: <id>")?;
    Ok((id, matches.get_flag(portal::ARG_YES)))
}

fn students(matches: &ArgMatches) -> Result<StudentsCommand> {
    match matches.subcommand() {
        Some(("list", _)) => Ok(StudentsCommand::List),
        Some(("add", add)) => Ok(StudentsCommand::Add(StudentForm {
            sid: text_or_empty(add, "sid"),
            name: text_or_empty(add, "name"),
            surname: text_or_empty(add, "surname"),
            class: text_or_empty(add, "class"),
            phone: text_or_empty(add, "phone"),
            attendance: text_or_empty(add, "attendance"),
            age: text_or_empty(add, "age"),
            sex: text_or_empty(add, "sex"),
        })),
        Some(("delete", delete)) => {
            let (id, yes) = delete_args(delete)?;
            Ok(StudentsCommand::Delete { id, yes })
        }
        _ => Err(anyhow!("unknown students command")),
    }
}

fn teachers(matches: &ArgMatches) -> Result<TeachersCommand> {
    match matches.subcommand() {
        Some(("list", _)) => Ok(TeachersCommand::List),
        Some(("add", add)) => Ok(TeachersCommand::Add(TeacherForm {
            teacher_id: text_or_empty(add, "teacher-id"),
            name: text_or_empty(add, "name"),
            surname: text_or_empty(add, "surname"),
            class: text_or_empty(add, "class"),
            phone: text_or_empty(add, "phone"),
            password: SecretString::from(text_or_empty(add, "teacher-password")),
            role: text_or_empty(add, "role"),
        })),
        Some(("delete", delete)) => {
            let (id, yes) = delete_args(delete)?;
            Ok(TeachersCommand::Delete { id, yes })
        }
        _ => Err(anyhow!("unknown teachers command")),
    }
}

fn results_command(matches: &ArgMatches) -> Result<(ResultsCommand, GradeBands)> {
    match matches.subcommand() {
        Some(("list", list)) => Ok((
            ResultsCommand::List(ResultFilter {
                form: text_or_empty(list, "form"),
                subject: text_or_empty(list, "subject"),
                term: text_or_empty(list, "term"),
            }),
            bands(list),
        )),
        Some(("save", save)) => Ok((
            ResultsCommand::Save {
                student_id: text(save, "student-id"),
                name: text(save, "name"),
                entry: Entry {
                    form: text(save, "form"),
                    ..entry(save)
                },
            },
            bands(save),
        )),
        Some(("edit", edit)) => {
            let id = edit
                .get_one::<i64>("id")
                .copied()
                .context("missing required argument: <id>")?;
            Ok((
                ResultsCommand::Edit {
                    id,
                    entry: entry(edit),
                },
                bands(edit),
            ))
        }
        Some(("delete", delete)) => {
            let (id, yes) = delete_args(delete)?;
            Ok((ResultsCommand::Delete { id, yes }, GradeBands::default()))
        }
        Some(("student", sub)) => Ok((
            ResultsCommand::Student(
                text(sub, "student-id").context("missing required argument: <student-id>")?,
            ),
            GradeBands::default(),
        )),
        Some(("subjects", _)) => Ok((ResultsCommand::Subjects, GradeBands::default())),
        _ => Err(anyhow!("unknown results command")),
    }
}

/// Maps parsed arguments to an [`Action`].
///
/// # Errors
/// Returns an error if required arguments are missing or the subcommand is
/// unknown.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let globals = globals(matches)?;

    match matches.subcommand() {
        Some(("student", sub)) => match sub.subcommand() {
            Some(("login", login)) => Ok(Action::Student(student::Args {
                globals,
                student_id: text(login, portal::ARG_ID),
                password: secret(login, portal::ARG_PASSWORD),
            })),
            _ => Err(anyhow!("unknown student command")),
        },
        Some((name @ ("admin" | "teacher"), sub)) => match sub.subcommand() {
            Some(("login", login)) => {
                let kind = if name == "admin" {
                    Portal::Admin
                } else {
                    Portal::Teacher
                };
                Ok(Action::Login(login_args(globals, kind, login)))
            }
            _ => Err(anyhow!("unknown {name} command")),
        },
        Some(("students", sub)) => Ok(Action::Admin(admin::Args {
            globals,
            register: Register::Students(students(sub)?),
        })),
        Some(("teachers", sub)) => Ok(Action::Admin(admin::Args {
            globals,
            register: Register::Teachers(teachers(sub)?),
        })),
        Some(("results", sub)) => {
            let (command, bands) = results_command(sub)?;
            Ok(Action::Results(results::Args {
                globals,
                bands,
                command,
            }))
        }
        Some(("grade", grade)) => Ok(Action::Grade(GradeArgs {
            bands: bands(grade),
            marks: text(grade, results_args::ARG_MARKS)
                .context("missing required argument: <marks>")?,
        })),
        Some(("stats", _)) => Ok(Action::Stats(globals)),
        _ => Err(anyhow!("no command given")),
    }
}
