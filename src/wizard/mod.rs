//! Student enrollment/login wizard.
//!
//! The session moves through three steps: `Identify`, `SetPassword` and
//! `Authenticate`. Transitions are split in two halves so the state machine
//! never touches the network: `begin_*` validates input and hands out a
//! [`Ticket`], the caller performs the request, and `apply_*` folds the
//! response back in.
//!
//! Tickets carry a sequence number. A response is applied only when its
//! sequence number is newer than the last accepted one; navigation also
//! advances the accepted mark, so answers to requests issued before a
//! back-click are dropped.
//!
//! Invariant: a student record is held exactly when the current step is not
//! `Identify`.

mod controller;
pub mod password;

pub use controller::{Controller, WizardView};
pub use password::{can_submit, PasswordPolicy, Rule, Strength};

use crate::gateway::types::{
    ActionResponse, LoginResponse, StudentRecord, VerifyStudentResponse,
};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

pub const STUDENT_NOT_FOUND: &str = "Student ID not found";
pub const PASSWORD_CREATE_FAILED: &str = "Failed to create password";
pub const PASSWORD_CREATED: &str =
    "Password created successfully! Please log in with your new password.";
pub const LOGIN_FAILED: &str = "Login failed";
pub const FORGOT_PASSWORD: &str =
    "Please contact your administrator at support@school.edu to reset your password.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    Identify,
    SetPassword,
    Authenticate,
}

impl Step {
    /// One-based position shown in the step indicator.
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Step::Identify => 1,
            Step::SetPassword => 2,
            Step::Authenticate => 3,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Step::Identify => "Verify Student ID",
            Step::SetPassword => "Create Password",
            Step::Authenticate => "Login",
        };
        f.write_str(label)
    }
}

/// Input rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your Student ID")]
    EmptyStudentId,
    #[error("Passwords do not match.")]
    PasswordMismatch,
    #[error("Password does not meet all requirements")]
    WeakPassword,
    #[error("Please enter your password")]
    EmptyPassword,
    #[error("{action} is not available on the {step} step")]
    WrongStep { action: &'static str, step: Step },
    #[error("Going back is not available from the {0} step")]
    BackUnavailable(Step),
    #[error("Login already completed")]
    Finished,
}

/// Claim on a pending request. Consumed when the response is applied.
#[derive(Debug)]
#[must_use = "a ticket must be applied or the response is lost"]
pub struct Ticket {
    seq: u64,
    step: Step,
    student_id: String,
}

impl Ticket {
    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    /// Student id the request must be sent for.
    #[must_use]
    pub fn student_id(&self) -> &str {
        &self.student_id
    }
}

/// Result of applying a response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Moved to a new step.
    Advanced { from: Step, to: Step },
    /// Stayed (or fell back to) `step` with a message to show inline.
    Rejected { step: Step, message: String },
    /// Login succeeded; navigate to `redirect`. The session is finished.
    Completed { redirect: String },
    /// Response arrived after a newer one was accepted and was ignored.
    Stale { seq: u64 },
}

/// Transient wizard state for one visit.
#[derive(Debug)]
pub struct WizardSession {
    student_id: String,
    record: Option<StudentRecord>,
    has_existing_password: bool,
    step: Step,
    via_password_creation: bool,
    banner: Option<String>,
    issued: u64,
    accepted: u64,
    finished: bool,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            student_id: String::new(),
            record: None,
            has_existing_password: false,
            step: Step::Identify,
            via_password_creation: false,
            banner: None,
            issued: 0,
            accepted: 0,
            finished: false,
        }
    }

    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    /// Verified student id, or the last identifier typed on the identify step.
    #[must_use]
    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    #[must_use]
    pub fn record(&self) -> Option<&StudentRecord> {
        self.record.as_ref()
    }

    #[must_use]
    pub fn has_existing_password(&self) -> bool {
        self.has_existing_password
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the back control is offered on the current step.
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        match self.step {
            Step::Identify => false,
            Step::SetPassword => true,
            Step::Authenticate => self.via_password_creation,
        }
    }

    /// Returns the success banner once; later calls yield `None`.
    pub fn take_banner(&mut self) -> Option<String> {
        self.banner.take()
    }

    fn issue(&mut self, step: Step, student_id: String) -> Ticket {
        self.issued += 1;
        Ticket {
            seq: self.issued,
            step,
            student_id,
        }
    }

    fn ensure(&self, action: &'static str, step: Step) -> Result<(), ValidationError> {
        if self.finished {
            return Err(ValidationError::Finished);
        }
        if self.step != step {
            return Err(ValidationError::WrongStep {
                action,
                step: self.step,
            });
        }
        Ok(())
    }

    /// Accepts the ticket unless a newer response or navigation already won.
    fn accept(&mut self, ticket: &Ticket) -> bool {
        if self.finished || ticket.seq <= self.accepted {
            debug!(
                "discarding stale response seq={} accepted={}",
                ticket.seq, self.accepted
            );
            return false;
        }
        self.accepted = ticket.seq;
        true
    }

    fn set_step(&mut self, step: Step) {
        if self.step != step {
            info!("wizard step {} -> {}", self.step.number(), step.number());
        }
        self.step = step;
        if step == Step::Identify {
            self.record = None;
            self.via_password_creation = false;
        }
    }

    /// Validates the identifier and issues a verify request ticket.
    ///
    /// # Errors
    /// Returns `ValidationError::EmptyStudentId` for blank input, or a step error
    /// when not on the identify step.
    pub fn begin_identify(&mut self, input: &str) -> Result<Ticket, ValidationError> {
        self.ensure("Verify", Step::Identify)?;
        let student_id = input.trim();
        if student_id.is_empty() {
            return Err(ValidationError::EmptyStudentId);
        }
        self.student_id = student_id.to_string();
        Ok(self.issue(Step::Identify, student_id.to_string()))
    }

    /// Applies a verify response.
    ///
    /// The newest identify answer wins even if an older one already advanced
    /// the session; a rejection then returns the session to `Identify`.
    pub fn apply_identify(&mut self, ticket: Ticket, response: VerifyStudentResponse) -> Outcome {
        if !self.accept(&ticket) {
            return Outcome::Stale { seq: ticket.seq };
        }
        let from = self.step;

        let record = match (response.valid, response.student) {
            (true, Some(record)) => record,
            (valid, _) => {
                self.set_step(Step::Identify);
                let message = response
                    .message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| {
                        if valid {
                            "Student record missing from response".to_string()
                        } else {
                            STUDENT_NOT_FOUND.to_string()
                        }
                    });
                return Outcome::Rejected {
                    step: Step::Identify,
                    message,
                };
            }
        };

        if !record.id.trim().is_empty() {
            self.student_id = record.id.clone();
        }
        self.record = Some(record);
        self.has_existing_password = response.has_password;
        self.via_password_creation = false;
        self.banner = None;

        let to = if response.has_password {
            Step::Authenticate
        } else {
            Step::SetPassword
        };
        self.set_step(to);
        Outcome::Advanced { from, to }
    }

    /// Re-validates the password pair and issues a password-creation ticket.
    ///
    /// # Errors
    /// Returns `PasswordMismatch` if the fields differ, `WeakPassword` if any
    /// strength rule fails, or a step error.
    pub fn begin_set_password(
        &mut self,
        password: &SecretString,
        confirmation: &SecretString,
    ) -> Result<Ticket, ValidationError> {
        self.ensure("Create password", Step::SetPassword)?;
        let password = password.expose_secret();
        if password != confirmation.expose_secret() {
            return Err(ValidationError::PasswordMismatch);
        }
        if !PasswordPolicy::evaluate(password).all_satisfied() {
            return Err(ValidationError::WeakPassword);
        }
        Ok(self.issue(Step::SetPassword, self.student_id.clone()))
    }

    pub fn apply_set_password(&mut self, ticket: Ticket, response: ActionResponse) -> Outcome {
        if !self.accept(&ticket) {
            return Outcome::Stale { seq: ticket.seq };
        }
        if !response.success {
            return Outcome::Rejected {
                step: self.step,
                message: response
                    .message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| PASSWORD_CREATE_FAILED.to_string()),
            };
        }

        let from = self.step;
        self.has_existing_password = true;
        self.via_password_creation = true;
        self.banner = Some(PASSWORD_CREATED.to_string());
        self.set_step(Step::Authenticate);
        Outcome::Advanced {
            from,
            to: Step::Authenticate,
        }
    }

    /// Issues a login ticket for a non-empty password.
    ///
    /// # Errors
    /// Returns `EmptyPassword` or a step error.
    pub fn begin_login(&mut self, password: &SecretString) -> Result<Ticket, ValidationError> {
        self.ensure("Login", Step::Authenticate)?;
        if password.expose_secret().is_empty() {
            return Err(ValidationError::EmptyPassword);
        }
        Ok(self.issue(Step::Authenticate, self.student_id.clone()))
    }

    pub fn apply_login(&mut self, ticket: Ticket, response: LoginResponse) -> Outcome {
        if !self.accept(&ticket) {
            return Outcome::Stale { seq: ticket.seq };
        }
        if !response.success {
            return Outcome::Rejected {
                step: self.step,
                message: response
                    .message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| LOGIN_FAILED.to_string()),
            };
        }

        self.finished = true;
        let redirect = response
            .redirect
            .filter(|target| !target.trim().is_empty())
            .unwrap_or_else(|| {
                format!(
                    "/student/student_dashboard.html?studentId={}",
                    self.student_id
                )
            });
        info!("student login completed");
        Outcome::Completed { redirect }
    }

    /// User-triggered back navigation. Any in-flight response becomes stale.
    ///
    /// # Errors
    /// Returns `BackUnavailable` when the current step offers no back control.
    pub fn back(&mut self) -> Result<Step, ValidationError> {
        if self.finished {
            return Err(ValidationError::Finished);
        }
        let target = match self.step {
            Step::SetPassword => Step::Identify,
            Step::Authenticate if self.via_password_creation => Step::SetPassword,
            step => return Err(ValidationError::BackUnavailable(step)),
        };
        self.accepted = self.issued;
        self.banner = None;
        self.set_step(target);
        Ok(target)
    }
}
