use clap::{value_parser, Arg, ArgAction, Command};

pub const ARG_GRADE_A: &str = "grade-a";
pub const ARG_GRADE_B: &str = "grade-b";
pub const ARG_GRADE_C: &str = "grade-c";
pub const ARG_GRADE_D: &str = "grade-d";
pub const ARG_MARKS: &str = "marks";

fn threshold(id: &'static str, help: &'static str, env: &'static str) -> Arg {
    Arg::new(id)
        .long(id)
        .help(help)
        .env(env)
        .value_parser(value_parser!(f64))
}

/// Grade band thresholds; a zero or missing value falls back to its default.
#[must_use]
pub fn with_grade_args(command: Command) -> Command {
    command
        .arg(threshold(ARG_GRADE_A, "Lowest mark for an A (default 80)", "SCHOOLGATE_GRADE_A"))
        .arg(threshold(ARG_GRADE_B, "Lowest mark for a B (default 70)", "SCHOOLGATE_GRADE_B"))
        .arg(threshold(ARG_GRADE_C, "Lowest mark for a C (default 60)", "SCHOOLGATE_GRADE_C"))
        .arg(threshold(ARG_GRADE_D, "Lowest mark for a D (default 50)", "SCHOOLGATE_GRADE_D"))
}

fn text(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

fn filters(command: Command) -> Command {
    command
        .arg(text("form", "Only this form/class"))
        .arg(text("subject", "Only this subject"))
        .arg(text("term", "Only this term"))
}

fn entry_fields(command: Command) -> Command {
    command
        .arg(text("level", "Level, e.g. O Level"))
        .arg(text("subject", "Subject"))
        .arg(text("new-subject", "Add a subject to the catalogue and use it"))
        .arg(text("term", "Term"))
        .arg(text("year", "Exam year (default: current year)").value_parser(value_parser!(i32)))
        .arg(text("exam-type", "Exam type"))
        .arg(text("exam-date", "Exam date"))
        .arg(text(ARG_MARKS, "Marks obtained"))
        .arg(text("comment", "Teacher comment"))
}

#[must_use]
pub fn results() -> Command {
    let save = entry_fields(
        Command::new("save")
            .about("Verify a student and record a result")
            .arg(text("student-id", "Student ID to search for"))
            .arg(text("name", "Student name to search for"))
            .arg(text("form", "Form/class (filled from the student record when found)")),
    );
    let edit = entry_fields(
        Command::new("edit")
            .about("Load an existing result, apply changes and save it")
            .arg(
                Arg::new("id")
                    .help("Result id")
                    .required(true)
                    .value_parser(value_parser!(i64)),
            ),
    );

    Command::new("results")
        .about("Exam results (teacher dashboard)")
        .subcommand_required(true)
        .subcommand(with_grade_args(filters(
            Command::new("list").about("List recorded results"),
        )))
        .subcommand(with_grade_args(save))
        .subcommand(with_grade_args(edit))
        .subcommand(
            Command::new("delete")
                .about("Delete a result")
                .arg(
                    Arg::new("id")
                        .help("Result id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(
                    Arg::new("yes")
                        .short('y')
                        .long("yes")
                        .help("Skip the confirmation prompt")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("student")
                .about("Results and summary for one student")
                .arg(Arg::new("student-id").help("Student ID").required(true)),
        )
        .subcommand(Command::new("subjects").about("List the subject catalogue"))
}

#[must_use]
pub fn grade() -> Command {
    with_grade_args(
        Command::new("grade")
            .about("Show grade and status for a mark")
            .arg(
                Arg::new(ARG_MARKS)
                    .help("Marks obtained")
                    .required(true)
                    .allow_negative_numbers(true),
            ),
    )
}

#[must_use]
pub fn stats() -> Command {
    Command::new("stats").about("Portal statistics")
}
