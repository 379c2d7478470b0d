use crate::{
    cli::{globals::GlobalArgs, terminal::Terminal},
    dashboard::{AdminDashboard, Mutation, StudentForm, TeacherForm},
    gateway::{
        types::{ActionResponse, StudentRow, TeacherRow},
        Gateway, GatewayError,
    },
};
use anyhow::{bail, Result};
use secrecy::{ExposeSecret, SecretString};
use std::io::{BufRead, Write};

#[derive(Debug)]
pub enum StudentsCommand {
    List,
    Add(StudentForm),
    Delete { id: i64, yes: bool },
}

#[derive(Debug)]
pub enum TeachersCommand {
    List,
    /// The password is prompted for when the form carries none.
    Add(TeacherForm),
    Delete { id: i64, yes: bool },
}

#[derive(Debug)]
pub enum Register {
    Students(StudentsCommand),
    Teachers(TeachersCommand),
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub register: Register,
}

/// # Errors
/// Returns an error if the gateway cannot be built or the operation fails.
pub async fn execute(args: Args) -> Result<()> {
    let dashboard = AdminDashboard::new(args.globals.gateway()?);
    let mut terminal = Terminal::stdio();
    run(&dashboard, args.register, &mut terminal).await
}

fn student_table(rows: &[StudentRow]) -> Vec<String> {
    let mut lines = vec![format!(
        "{:>5}  {:<10} {:<24} {:<6} {:<14} {:>4} {:<4}",
        "ID", "STUDENT", "NAME", "CLASS", "PHONE", "AGE", "SEX"
    )];
    lines.extend(rows.iter().map(|row| {
        format!(
            "{:>5}  {:<10} {:<24} {:<6} {:<14} {:>4} {:<4}",
            row.id,
            row.student_id,
            format!("{} {}", row.name, row.surname).trim(),
            row.class,
            row.phone,
            row.age,
            row.sex
        )
    }));
    lines
}

fn teacher_table(rows: &[TeacherRow]) -> Vec<String> {
    let mut lines = vec![format!(
        "{:>5}  {:<10} {:<24} {:<6} {:<14} {:<10}",
        "ID", "TEACHER", "NAME", "CLASS", "PHONE", "ROLE"
    )];
    lines.extend(rows.iter().map(|row| {
        format!(
            "{:>5}  {:<10} {:<24} {:<6} {:<14} {:<10}",
            row.id,
            row.teacher_id,
            format!("{} {}", row.name, row.surname).trim(),
            row.class,
            row.phone,
            row.role
        )
    }));
    lines
}

fn print_table<T, R: BufRead, W: Write>(
    terminal: &mut Terminal<R, W>,
    table: Result<Vec<T>, GatewayError>,
    render: fn(&[T]) -> Vec<String>,
) -> Result<()> {
    match table {
        Ok(rows) => {
            for line in render(&rows) {
                terminal.say(&line)?;
            }
            Ok(())
        }
        Err(err) => {
            terminal.say(&format!("error: {}", err.user_message()))?;
            Err(err.into())
        }
    }
}

fn report<T, R: BufRead, W: Write>(
    terminal: &mut Terminal<R, W>,
    mutation: Mutation<T>,
    render: fn(&[T]) -> Vec<String>,
) -> Result<()> {
    let ActionResponse { success, message } = mutation.outcome;
    let message = message.unwrap_or_default();
    if success {
        terminal.say(&message)?;
    } else {
        terminal.say(&format!("error: {message}"))?;
    }
    print_table(terminal, mutation.table, render)?;
    if !success {
        bail!("{message}");
    }
    Ok(())
}

/// # Errors
/// Returns an error if the terminal fails, the form is invalid or the
/// backend rejects the change.
pub async fn run<G, R, W>(
    dashboard: &AdminDashboard<G>,
    register: Register,
    terminal: &mut Terminal<R, W>,
) -> Result<()>
where
    G: Gateway,
    R: BufRead,
    W: Write,
{
    match register {
        Register::Students(StudentsCommand::List) => {
            print_table(terminal, dashboard.list_students().await, student_table)
        }
        Register::Students(StudentsCommand::Add(form)) => {
            let mutation = dashboard.add_student(&form).await?;
            report(terminal, mutation, student_table)
        }
        Register::Students(StudentsCommand::Delete { id, yes }) => {
            if !yes && !terminal.confirm("Are you sure you want to delete this student?")? {
                terminal.say("Cancelled")?;
                return Ok(());
            }
            let mutation = dashboard.delete_student(id).await;
            report(terminal, mutation, student_table)
        }
        Register::Teachers(TeachersCommand::List) => {
            print_table(terminal, dashboard.list_teachers().await, teacher_table)
        }
        Register::Teachers(TeachersCommand::Add(mut form)) => {
            if form.password.expose_secret().is_empty() {
                form.password = terminal
                    .prompt_secret("Teacher password")?
                    .unwrap_or_else(|| SecretString::from(String::new()));
            }
            let mutation = dashboard.add_teacher(&form).await?;
            report(terminal, mutation, teacher_table)
        }
        Register::Teachers(TeachersCommand::Delete { id, yes }) => {
            if !yes && !terminal.confirm("Are you sure you want to delete this teacher?")? {
                terminal.say("Cancelled")?;
                return Ok(());
            }
            let mutation = dashboard.delete_teacher(id).await;
            report(terminal, mutation, teacher_table)
        }
    }
}
