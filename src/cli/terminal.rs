//! Line-oriented terminal front end: prompts, confirmations and the wizard
//! view.

use crate::{
    gateway::types::StudentRecord,
    wizard::{PasswordPolicy, Rule, Step, WizardView},
};
use anyhow::{bail, Result};
use secrecy::SecretString;
use std::{
    fmt,
    io::{self, BufRead, BufReader, Stdin, Stdout, Write},
};
use tracing::warn;

pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl Terminal<BufReader<Stdin>, Stdout> {
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.output
    }

    /// Prints `label` and reads one line. `None` at end of input.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be read or written.
    pub fn prompt(&mut self, label: &str, default: Option<&str>) -> Result<Option<String>> {
        match default.filter(|value| !value.is_empty()) {
            Some(value) => write!(self.output, "{label} [{value}]: ")?,
            None => write!(self.output, "{label}: ")?,
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim_end_matches(['\r', '\n']).to_string();
        match default {
            Some(value) if line.trim().is_empty() => Ok(Some(value.to_string())),
            _ => Ok(Some(line)),
        }
    }

    /// Same as [`Terminal::prompt`] but keeps the answer in a secret.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be read or written.
    pub fn prompt_secret(&mut self, label: &str) -> Result<Option<SecretString>> {
        Ok(self.prompt(label, None)?.map(SecretString::from))
    }

    /// Reads a line, failing on end of input.
    ///
    /// # Errors
    /// Returns an error at end of input or on I/O failure.
    pub fn require(&mut self, label: &str, default: Option<&str>) -> Result<String> {
        match self.prompt(label, default)? {
            Some(line) => Ok(line),
            None => bail!("no input for {label}"),
        }
    }

    /// Yes/no question, defaulting to no.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be read or written.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.prompt(&format!("{question} [y/N]"), None)?;
        Ok(matches!(
            answer.as_deref().map(str::trim).map(str::to_lowercase).as_deref(),
            Some("y" | "yes")
        ))
    }

    /// # Errors
    /// Returns an error if the terminal cannot be written.
    pub fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    /// Writes one line for the wizard view. View callbacks cannot fail, so a
    /// broken stdout is logged instead.
    fn emit(&mut self, line: fmt::Arguments<'_>) {
        if let Err(err) = writeln!(self.output, "{line}") {
            warn!("failed to write to terminal: {err}");
        }
    }
}

impl<R: BufRead, W: Write> WizardView for Terminal<R, W> {
    fn show_step(&mut self, step: Step, record: Option<&StudentRecord>) {
        self.emit(format_args!("\n[{}/3] {step}", step.number()));
        if let Some(record) = record {
            self.emit(format_args!(
                "Student: {} ({}), class {}",
                record.name, record.id, record.class
            ));
        }
    }

    fn show_error(&mut self, message: &str) {
        self.emit(format_args!("error: {message}"));
    }

    fn clear_error(&mut self) {}

    fn show_loading(&mut self, loading: bool) {
        if loading {
            self.emit(format_args!("..."));
        }
    }

    fn show_banner(&mut self, message: &str) {
        self.emit(format_args!("{message}"));
    }

    fn show_strength(&mut self, policy: &PasswordPolicy, can_submit: bool) {
        self.emit(format_args!("strength: {}", policy.strength()));
        for rule in Rule::ALL {
            let mark = if policy.passes(rule) { "x" } else { " " };
            self.emit(format_args!("  [{mark}] {}", rule.hint()));
        }
        if !can_submit {
            self.emit(format_args!("password not accepted yet"));
        }
    }

    fn redirect(&mut self, target: &str) {
        self.emit(format_args!("Login successful. Continue at {target}"));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::{
        io::Cursor,
        sync::{Arc, Mutex},
    };

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn terminal(input: &str) -> Terminal<Cursor<Vec<u8>>, Vec<u8>> {
        Terminal::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(terminal: Terminal<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8_lossy(&terminal.into_output()).into_owned()
    }

    #[test]
    fn prompt_uses_default_on_blank_line() -> Result<()> {
        let mut term = terminal("\nS2\n");
        assert_eq!(term.prompt("Student ID", Some("S1"))?, Some("S1".to_string()));
        assert_eq!(term.prompt("Student ID", Some("S1"))?, Some("S2".to_string()));
        assert_eq!(term.prompt("Student ID", None)?, None);
        assert!(output(term).contains("Student ID [S1]: "));
        Ok(())
    }

    #[test]
    fn confirm_defaults_to_no() -> Result<()> {
        let mut term = terminal("\nYes\nn\n");
        assert!(!term.confirm("Delete?")?);
        assert!(term.confirm("Delete?")?);
        assert!(!term.confirm("Delete?")?);
        assert!(!term.confirm("Delete?")?);
        Ok(())
    }

    #[test]
    fn require_fails_at_end_of_input() {
        let mut term = terminal("");
        assert!(term.require("Marks", None).is_err());
    }

    #[test]
    fn strength_checklist() {
        let mut term = terminal("");
        term.show_strength(&PasswordPolicy::evaluate("abc"), false);
        let out = output(term);
        assert!(out.contains("strength: weak"));
        assert!(out.contains("[x] One lowercase letter"));
        assert!(out.contains("[ ] At least 8 characters"));
        assert!(out.contains("password not accepted yet"));
    }

    #[test]
    fn view_logs_write_failures() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let mut term = Terminal::new(Cursor::new(Vec::new()), BrokenPipe);
        tracing::subscriber::with_default(subscriber, || {
            term.show_error("Student ID not found");
            term.redirect("/student/student_dashboard.html");
        });
        assert!(term.say("still broken").is_err());

        let logs = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert_eq!(logs.matches("failed to write to terminal").count(), 2);
    }
}
