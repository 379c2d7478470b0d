use super::{
    can_submit, Outcome, PasswordPolicy, Step, ValidationError, WizardSession, FORGOT_PASSWORD,
};
use crate::gateway::{types::StudentRecord, Gateway};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info_span, Instrument};

/// Rendering surface for the wizard. Implemented by the terminal front end and
/// by test recorders.
pub trait WizardView {
    /// Show `step` and hide the others. `record` is set outside `Identify`.
    fn show_step(&mut self, step: Step, record: Option<&StudentRecord>);

    fn show_error(&mut self, message: &str);

    fn clear_error(&mut self);

    /// Toggle the busy state of the active submit control.
    fn show_loading(&mut self, loading: bool);

    fn show_banner(&mut self, message: &str);

    /// Live strength feedback for the password-creation form.
    fn show_strength(&mut self, policy: &PasswordPolicy, can_submit: bool);

    fn redirect(&mut self, target: &str);
}

/// Drives a [`WizardSession`] against a gateway and a view.
pub struct Controller<G, V> {
    session: WizardSession,
    gateway: G,
    view: V,
}

impl<G: Gateway, V: WizardView> Controller<G, V> {
    pub fn new(gateway: G, mut view: V) -> Self {
        let session = WizardSession::new();
        view.show_step(session.step(), None);
        Self {
            session,
            gateway,
            view,
        }
    }

    pub fn session(&self) -> &WizardSession {
        &self.session
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_parts(self) -> (WizardSession, G, V) {
        (self.session, self.gateway, self.view)
    }

    /// Submits the identify form.
    pub async fn identify(&mut self, input: &str) -> Option<Outcome> {
        let ticket = match self.session.begin_identify(input) {
            Ok(ticket) => ticket,
            Err(err) => return self.reject(&err),
        };
        self.view.clear_error();
        self.view.show_loading(true);
        let response = self
            .gateway
            .verify_identity(ticket.student_id())
            .instrument(info_span!("wizard.identify", seq = ticket.seq()))
            .await;
        self.view.show_loading(false);
        let outcome = self.session.apply_identify(ticket, response);
        self.render(&outcome);
        Some(outcome)
    }

    /// Recomputes strength feedback for the current password inputs.
    pub fn password_changed(&mut self, password: &SecretString, confirmation: &SecretString) {
        let password = password.expose_secret();
        let policy = PasswordPolicy::evaluate(password);
        let ready = can_submit(password, confirmation.expose_secret());
        self.view.show_strength(&policy, ready);
    }

    /// Submits the password-creation form.
    pub async fn create_password(
        &mut self,
        password: &SecretString,
        confirmation: &SecretString,
    ) -> Option<Outcome> {
        let ticket = match self.session.begin_set_password(password, confirmation) {
            Ok(ticket) => ticket,
            Err(err) => return self.reject(&err),
        };
        self.view.clear_error();
        self.view.show_loading(true);
        let response = self
            .gateway
            .set_password(ticket.student_id(), password)
            .instrument(info_span!("wizard.set_password", seq = ticket.seq()))
            .await;
        self.view.show_loading(false);
        let outcome = self.session.apply_set_password(ticket, response);
        self.render(&outcome);
        Some(outcome)
    }

    /// Submits the login form.
    pub async fn login(&mut self, password: &SecretString) -> Option<Outcome> {
        let ticket = match self.session.begin_login(password) {
            Ok(ticket) => ticket,
            Err(err) => return self.reject(&err),
        };
        self.view.clear_error();
        self.view.show_loading(true);
        let response = self
            .gateway
            .login(ticket.student_id(), password)
            .instrument(info_span!("wizard.login", seq = ticket.seq()))
            .await;
        self.view.show_loading(false);
        let outcome = self.session.apply_login(ticket, response);
        self.render(&outcome);
        Some(outcome)
    }

    /// Back control. Returns the step shown afterwards.
    pub fn back(&mut self) -> Result<Step, ValidationError> {
        let step = self.session.back()?;
        self.view.clear_error();
        self.view.show_step(step, self.session.record());
        Ok(step)
    }

    pub fn forgot_password(&mut self) {
        self.view.show_banner(FORGOT_PASSWORD);
    }

    fn reject(&mut self, err: &ValidationError) -> Option<Outcome> {
        self.view.show_error(&err.to_string());
        None
    }

    fn render(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Advanced { to, .. } => {
                self.view.show_step(*to, self.session.record());
                if let Some(banner) = self.session.take_banner() {
                    self.view.show_banner(&banner);
                }
            }
            Outcome::Rejected { step, message } => {
                if *step == Step::Identify {
                    self.view.show_step(Step::Identify, None);
                }
                self.view.show_error(message);
            }
            Outcome::Completed { redirect } => self.view.redirect(redirect),
            Outcome::Stale { .. } => {}
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::gateway::{
        testing::{Call, ScriptedGateway},
        types::{ActionResponse, LoginResponse, VerifyStudentResponse},
        NETWORK_ERROR_MESSAGE,
    };
    use crate::wizard::{PASSWORD_CREATED, STUDENT_NOT_FOUND};

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Step(Step, Option<String>),
        Error(String),
        ClearError,
        Loading(bool),
        Banner(String),
        Strength(u8, bool),
        Redirect(String),
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<Event>,
    }

    impl Recorder {
        fn errors(&self) -> Vec<&str> {
            self.events
                .iter()
                .filter_map(|event| match event {
                    Event::Error(message) => Some(message.as_str()),
                    _ => None,
                })
                .collect()
        }

        fn last_step(&self) -> Option<&Event> {
            self.events
                .iter()
                .rev()
                .find(|event| matches!(event, Event::Step(..)))
        }
    }

    impl WizardView for Recorder {
        fn show_step(&mut self, step: Step, record: Option<&StudentRecord>) {
            self.events
                .push(Event::Step(step, record.map(|record| record.name.clone())));
        }

        fn show_error(&mut self, message: &str) {
            self.events.push(Event::Error(message.to_string()));
        }

        fn clear_error(&mut self) {
            self.events.push(Event::ClearError);
        }

        fn show_loading(&mut self, loading: bool) {
            self.events.push(Event::Loading(loading));
        }

        fn show_banner(&mut self, message: &str) {
            self.events.push(Event::Banner(message.to_string()));
        }

        fn show_strength(&mut self, policy: &PasswordPolicy, can_submit: bool) {
            self.events.push(Event::Strength(policy.score(), can_submit));
        }

        fn redirect(&mut self, target: &str) {
            self.events.push(Event::Redirect(target.to_string()));
        }
    }

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    fn jane(has_password: bool) -> VerifyStudentResponse {
        VerifyStudentResponse {
            valid: true,
            student: Some(StudentRecord {
                id: "S1001".to_string(),
                name: "Jane".to_string(),
                class: "4A".to_string(),
                email: "j@x.com".to_string(),
            }),
            has_password,
            message: None,
        }
    }

    #[tokio::test]
    async fn first_visit_creates_password_then_logs_in() {
        let gateway = ScriptedGateway::new()
            .with_verify(jane(false))
            .with_action(ActionResponse {
                success: true,
                message: None,
            })
            .with_login(LoginResponse {
                success: true,
                redirect: Some("/student/student_dashboard.html".to_string()),
                ..LoginResponse::default()
            });
        let mut controller = Controller::new(gateway, Recorder::default());

        controller.identify("S1001").await.unwrap();
        assert_eq!(
            controller.view().last_step(),
            Some(&Event::Step(Step::SetPassword, Some("Jane".to_string())))
        );

        controller.password_changed(&secret("Abcd123!"), &secret("Abcd123!"));
        controller
            .create_password(&secret("Abcd123!"), &secret("Abcd123!"))
            .await
            .unwrap();
        assert_eq!(controller.session().step(), Step::Authenticate);

        let outcome = controller.login(&secret("Abcd123!")).await.unwrap();
        assert_eq!(
            outcome,
            Outcome::Completed {
                redirect: "/student/student_dashboard.html".to_string()
            }
        );

        let (_, gateway, view) = controller.into_parts();
        assert_eq!(
            gateway.calls(),
            vec![
                Call::Verify("S1001".to_string()),
                Call::SetPassword {
                    student_id: "S1001".to_string(),
                    password: "Abcd123!".to_string()
                },
                Call::Login {
                    student_id: "S1001".to_string(),
                    password: "Abcd123!".to_string()
                },
            ]
        );
        assert!(view.events.contains(&Event::Strength(5, true)));
        assert!(view.events.contains(&Event::Banner(PASSWORD_CREATED.to_string())));
        assert_eq!(
            view.events.last(),
            Some(&Event::Redirect("/student/student_dashboard.html".to_string()))
        );
    }

    #[tokio::test]
    async fn returning_student_goes_straight_to_login() {
        let gateway = ScriptedGateway::new().with_verify(jane(true));
        let mut controller = Controller::new(gateway, Recorder::default());

        controller.identify("S1001").await.unwrap();
        assert_eq!(controller.session().step(), Step::Authenticate);
        assert_eq!(controller.back(), Err(ValidationError::BackUnavailable(Step::Authenticate)));
    }

    #[tokio::test]
    async fn empty_identifier_never_reaches_gateway() {
        let mut controller = Controller::new(ScriptedGateway::new(), Recorder::default());

        assert!(controller.identify("  ").await.is_none());
        let (_, gateway, view) = controller.into_parts();
        assert!(gateway.calls().is_empty());
        assert_eq!(view.errors(), vec!["Please enter your Student ID"]);
    }

    #[tokio::test]
    async fn transport_failure_surfaces_network_message() {
        // No scripted verify response: the gateway answers as if offline.
        let mut controller = Controller::new(ScriptedGateway::new(), Recorder::default());

        let outcome = controller.identify("S1001").await.unwrap();
        assert_eq!(
            outcome,
            Outcome::Rejected {
                step: Step::Identify,
                message: NETWORK_ERROR_MESSAGE.to_string()
            }
        );
        assert_eq!(controller.view().errors(), vec![NETWORK_ERROR_MESSAGE]);
        assert_eq!(
            controller.view().events[..4],
            [
                Event::Step(Step::Identify, None),
                Event::ClearError,
                Event::Loading(true),
                Event::Loading(false),
            ]
        );
    }

    #[tokio::test]
    async fn mismatched_passwords_are_caught_locally() {
        let gateway = ScriptedGateway::new().with_verify(jane(false));
        let mut controller = Controller::new(gateway, Recorder::default());
        controller.identify("S1001").await.unwrap();

        controller.password_changed(&secret("Abcd123!"), &secret("Abcd123"));
        assert!(controller
            .create_password(&secret("Abcd123!"), &secret("Abcd123"))
            .await
            .is_none());

        let (_, gateway, view) = controller.into_parts();
        assert_eq!(gateway.calls(), vec![Call::Verify("S1001".to_string())]);
        assert!(view.events.contains(&Event::Strength(5, false)));
        assert_eq!(view.errors(), vec!["Passwords do not match."]);
    }

    #[tokio::test]
    async fn unknown_student_shows_not_found() {
        let gateway = ScriptedGateway::new().with_verify(VerifyStudentResponse {
            valid: false,
            ..VerifyStudentResponse::default()
        });
        let mut controller = Controller::new(gateway, Recorder::default());

        controller.identify("S404").await.unwrap();
        assert_eq!(controller.session().step(), Step::Identify);
        assert_eq!(controller.view().errors(), vec![STUDENT_NOT_FOUND]);
    }

    #[tokio::test]
    async fn back_returns_to_identify_and_forgot_shows_contact() {
        let gateway = ScriptedGateway::new().with_verify(jane(false));
        let mut controller = Controller::new(gateway, Recorder::default());
        controller.identify("S1001").await.unwrap();

        assert_eq!(controller.back(), Ok(Step::Identify));
        assert_eq!(
            controller.view().last_step(),
            Some(&Event::Step(Step::Identify, None))
        );
        assert_eq!(controller.session().student_id(), "S1001");

        controller.forgot_password();
        assert_eq!(
            controller.view().events.last(),
            Some(&Event::Banner(FORGOT_PASSWORD.to_string()))
        );
    }
}
