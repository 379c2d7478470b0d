use crate::{
    cli::{globals::GlobalArgs, terminal::Terminal},
    dashboard::{
        grading::{current_year, year_options},
        portal_statistics, student_results, GradeBands, TeacherDashboard,
    },
    gateway::{
        types::{ResultFilter, ResultRow},
        Gateway,
    },
};
use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};

/// Optional result fields given on the command line.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Entry {
    pub form: Option<String>,
    pub level: Option<String>,
    pub subject: Option<String>,
    pub new_subject: Option<String>,
    pub term: Option<String>,
    pub year: Option<i32>,
    pub exam_type: Option<String>,
    pub exam_date: Option<String>,
    pub marks: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug)]
pub enum ResultsCommand {
    List(ResultFilter),
    Save {
        student_id: Option<String>,
        name: Option<String>,
        entry: Entry,
    },
    Edit {
        id: i64,
        entry: Entry,
    },
    Delete {
        id: i64,
        yes: bool,
    },
    Student(String),
    Subjects,
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub bands: GradeBands,
    pub command: ResultsCommand,
}

#[derive(Debug)]
pub struct GradeArgs {
    pub bands: GradeBands,
    pub marks: String,
}

/// # Errors
/// Returns an error if the gateway cannot be built or the operation fails.
pub async fn execute(args: Args) -> Result<()> {
    let mut dashboard = TeacherDashboard::new(args.globals.gateway()?, args.bands);
    let mut terminal = Terminal::stdio();
    run(&mut dashboard, args.command, &mut terminal).await
}

/// # Errors
/// Returns an error if `marks` is not a number or stdout fails.
pub fn grade(args: &GradeArgs) -> Result<()> {
    let mut terminal = Terminal::stdio();
    print_grade(args, &mut terminal)
}

fn print_grade<R: BufRead, W: Write>(
    args: &GradeArgs,
    terminal: &mut Terminal<R, W>,
) -> Result<()> {
    let Some((grade, status)) = args.bands.preview(&args.marks) else {
        bail!("marks must be a number, got '{}'", args.marks);
    };
    terminal.say(&format!("{grade} ({status})"))
}

/// # Errors
/// Returns an error if the gateway cannot be built or stdout fails.
pub async fn stats(globals: &GlobalArgs) -> Result<()> {
    let gateway = globals.gateway()?;
    let mut terminal = Terminal::stdio();
    print_stats(&gateway, &mut terminal).await
}

async fn print_stats<G: Gateway, R: BufRead, W: Write>(
    gateway: &G,
    terminal: &mut Terminal<R, W>,
) -> Result<()> {
    let stats = portal_statistics(gateway).await;
    terminal.say(&format!("Students: {}", stats.students))?;
    terminal.say(&format!("Teachers: {}", stats.teachers))?;
    terminal.say(&format!("Subjects: {}", stats.subjects))?;
    terminal.say(&format!("Uptime:   {} ({})", stats.uptime, stats.uptime_hours))
}

fn result_lines(rows: &[ResultRow]) -> Vec<String> {
    let mut lines = vec![format!(
        "{:>5}  {:<10} {:<20} {:<5} {:<22} {:<12} {:>6} {:<2} {:<12} {}",
        "ID", "STUDENT", "NAME", "FORM", "SUBJECT", "TERM", "MARKS", "GR", "STATUS", "COMMENT"
    )];
    lines.extend(rows.iter().map(|row| {
        format!(
            "{:>5}  {:<10} {:<20} {:<5} {:<22} {:<12} {:>6} {:<2} {:<12} {}",
            row.id,
            row.student_id,
            row.student_name,
            row.form,
            row.subject,
            format!("Term {} {}", row.term, row.year),
            row.marks.map(|marks| marks.to_string()).unwrap_or_default(),
            row.grade,
            row.status,
            row.comment
        )
    }));
    lines
}

fn apply<G: Gateway>(dashboard: &mut TeacherDashboard<G>, entry: Entry) -> Result<()> {
    let subject = match entry.new_subject {
        Some(name) => Some(dashboard.subjects_mut().add(&name)?),
        None => entry.subject,
    };
    let form = dashboard.form_mut();
    let fields = [
        (&mut form.form, entry.form),
        (&mut form.level, entry.level),
        (&mut form.subject, subject),
        (&mut form.term, entry.term),
        (&mut form.year, entry.year.map(|year| year.to_string())),
        (&mut form.exam_type, entry.exam_type),
        (&mut form.exam_date, entry.exam_date),
        (&mut form.marks, entry.marks),
        (&mut form.comment, entry.comment),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            *field = value;
        }
    }
    Ok(())
}

async fn save_and_report<G: Gateway, R: BufRead, W: Write>(
    dashboard: &mut TeacherDashboard<G>,
    terminal: &mut Terminal<R, W>,
) -> Result<()> {
    if let Some((grade, status)) = dashboard.grade_preview() {
        terminal.say(&format!("Grade: {grade} ({status})"))?;
    }
    let year = dashboard.form().year.trim().parse::<i32>().ok();
    if let Some(year) = year {
        if !year_options(current_year()).contains(&year) {
            terminal.say(&format!("warning: {year} is outside the usual exam years"))?;
        }
    }
    let message = dashboard.save().await?;
    terminal.say(&message)?;
    for line in result_lines(dashboard.results()) {
        terminal.say(&line)?;
    }
    Ok(())
}

/// # Errors
/// Returns an error if the terminal fails or the dashboard rejects the
/// operation.
pub async fn run<G, R, W>(
    dashboard: &mut TeacherDashboard<G>,
    command: ResultsCommand,
    terminal: &mut Terminal<R, W>,
) -> Result<()>
where
    G: Gateway,
    R: BufRead,
    W: Write,
{
    match command {
        ResultsCommand::List(filter) => {
            dashboard.set_filter(filter);
            let rows = dashboard.reload().await?;
            for line in result_lines(rows) {
                terminal.say(&line)?;
            }
            Ok(())
        }
        ResultsCommand::Save {
            student_id,
            name,
            entry,
        } => {
            let student = dashboard
                .search(
                    student_id.as_deref().unwrap_or_default(),
                    name.as_deref().unwrap_or_default(),
                )
                .await?;
            terminal.say(&format!(
                "Found {} - {} {} ({})",
                student.student_id, student.name, student.surname, student.class
            ))?;
            apply(dashboard, entry)?;
            save_and_report(dashboard, terminal).await
        }
        ResultsCommand::Edit { id, entry } => {
            dashboard
                .edit(id)
                .await
                .with_context(|| format!("Edit failed for result {id}"))?;
            apply(dashboard, entry)?;
            save_and_report(dashboard, terminal).await
        }
        ResultsCommand::Delete { id, yes } => {
            if !yes && !terminal.confirm("Delete this result?")? {
                terminal.say("Cancelled")?;
                return Ok(());
            }
            dashboard.delete(id).await?;
            terminal.say("Deleted")
        }
        ResultsCommand::Student(student_id) => {
            let response = student_results(dashboard.gateway(), &student_id).await?;
            for line in result_lines(&response.results) {
                terminal.say(&line)?;
            }
            let stats = response.statistics;
            terminal.say(&format!(
                "Subjects: {}  Average: {:.1}  Passed: {}  Failed: {}",
                stats.total_subjects, stats.average, stats.passed, stats.failed
            ))?;
            if !stats.best_subject.is_empty() {
                terminal.say(&format!(
                    "Best: {} ({})  Weakest: {} ({})",
                    stats.best_subject,
                    stats.best_score.unwrap_or_default(),
                    stats.weakest_subject,
                    stats.weakest_score.unwrap_or_default()
                ))?;
            }
            Ok(())
        }
        ResultsCommand::Subjects => {
            for subject in dashboard.subjects().as_slice() {
                terminal.say(subject)?;
            }
            Ok(())
        }
    }
}
