use clap::{value_parser, Arg, ArgAction, Command};

pub const ARG_ID: &str = "id";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_REMEMBER: &str = "remember";
pub const ARG_PREFS: &str = "prefs";
pub const ARG_YES: &str = "yes";

fn login(name: &'static str, about: &'static str, id_help: &'static str) -> Command {
    Command::new(name).about(about).subcommand(
        Command::new("login")
            .about("Sign in")
            .arg(Arg::new(ARG_ID).long("id").help(id_help))
            .arg(
                Arg::new(ARG_PASSWORD)
                    .long("password")
                    .help("Password (prompted when omitted)")
                    .env("SCHOOLGATE_PASSWORD")
                    .hide_env_values(true),
            ),
    )
}

fn delete(about: &'static str) -> Command {
    Command::new("delete")
        .about(about)
        .arg(
            Arg::new(ARG_ID)
                .help("Row id")
                .required(true)
                .value_parser(value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_YES)
                .short('y')
                .long("yes")
                .help("Skip the confirmation prompt")
                .action(ArgAction::SetTrue),
        )
}

fn text(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

#[must_use]
pub fn student() -> Command {
    login(
        "student",
        "Student enrollment and login wizard",
        "Student ID to verify (prompted when omitted)",
    )
    .subcommand_required(true)
}

#[must_use]
pub fn admin() -> Command {
    login("admin", "Admin portal", "Admin ID (prompted when omitted)").subcommand_required(true)
}

#[must_use]
pub fn teacher() -> Command {
    let command = login("teacher", "Teacher portal", "Teacher ID (prompted when omitted)")
        .subcommand_required(true);
    command.mut_subcommand("login", |login| {
        login
            .arg(
                Arg::new(ARG_REMEMBER)
                    .long("remember")
                    .help("Remember the teacher id for next time")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new(ARG_PREFS)
                    .long("prefs")
                    .help("Preferences file (default: <config dir>/schoolgate/prefs.json)")
                    .env("SCHOOLGATE_PREFS")
                    .value_parser(value_parser!(std::path::PathBuf)),
            )
    })
}

#[must_use]
pub fn students() -> Command {
    Command::new("students")
        .about("Manage the student register")
        .subcommand_required(true)
        .subcommand(Command::new("list").about("List students"))
        .subcommand(
            Command::new("add")
                .about("Add a student")
                .arg(text("sid", "Student ID").required(true))
                .arg(text("name", "First name").required(true))
                .arg(text("surname", "Surname"))
                .arg(text("class", "Class"))
                .arg(text("phone", "Phone"))
                .arg(text("attendance", "Attendance"))
                .arg(text("age", "Age"))
                .arg(text("sex", "Sex")),
        )
        .subcommand(delete("Delete a student"))
}

#[must_use]
pub fn teachers() -> Command {
    Command::new("teachers")
        .about("Manage teacher accounts")
        .subcommand_required(true)
        .subcommand(Command::new("list").about("List teachers"))
        .subcommand(
            Command::new("add")
                .about("Add a teacher")
                .arg(text("teacher-id", "Teacher ID").required(true))
                .arg(text("name", "First name").required(true))
                .arg(text("surname", "Surname"))
                .arg(text("class", "Class"))
                .arg(text("phone", "Phone"))
                .arg(
                    text("teacher-password", "Initial password (prompted when omitted)")
                        .env("SCHOOLGATE_TEACHER_PASSWORD")
                        .hide_env_values(true),
                )
                .arg(text("role", "Role").default_value("teacher")),
        )
        .subcommand(delete("Delete a teacher"))
}
