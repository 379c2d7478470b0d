//! API gateway boundary for the portal backend.
//!
//! Every envelope-returning call resolves to a structured response, even when
//! the transport fails: connection errors, timeouts and unreadable bodies are
//! folded into the same `{success: false, valid: false, message}` shape the
//! backend uses for application errors. Table fetches have no envelope and
//! return `Result<Vec<_>, GatewayError>` instead.

pub mod http;
#[cfg(test)]
pub(crate) mod testing;
pub mod types;

pub use http::HttpGateway;

use secrecy::SecretString;
use thiserror::Error;
use types::{
    ActionResponse, DeleteResultResponse, LoginResponse, NewStudent, NewTeacher, ResultFilter,
    ResultPayload, ResultRow, SearchStudentRequest, SearchStudentResponse, StatisticsResponse,
    StudentResultsResponse, StudentRow, TeacherRow, VerifyStudentResponse,
};

/// Message surfaced for any transport-level failure.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your connection and try again.";

/// Transport failures seen before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("Invalid portal URL: {0}")]
    Url(String),
    #[error("Unable to reach the server: {0}")]
    Network(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Response error ({status}): {message}")]
    Decode { status: u16, message: String },
}

impl GatewayError {
    /// The user-facing text for this failure.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        NETWORK_ERROR_MESSAGE
    }
}

/// Response shapes that can stand in for a failed transport.
pub trait Envelope: Sized {
    /// Builds the failure envelope carrying `message`.
    fn transport_failure(message: &str) -> Self;
}

impl Envelope for VerifyStudentResponse {
    fn transport_failure(message: &str) -> Self {
        Self {
            valid: false,
            message: Some(message.to_string()),
            ..Self::default()
        }
    }
}

impl Envelope for ActionResponse {
    fn transport_failure(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
        }
    }
}

impl Envelope for LoginResponse {
    fn transport_failure(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
            ..Self::default()
        }
    }
}

impl Envelope for SearchStudentResponse {
    fn transport_failure(message: &str) -> Self {
        Self {
            found: false,
            student: None,
            message: Some(message.to_string()),
        }
    }
}

impl Envelope for DeleteResultResponse {
    fn transport_failure(message: &str) -> Self {
        Self {
            ok: false,
            message: Some(message.to_string()),
        }
    }
}

impl Envelope for StudentResultsResponse {
    fn transport_failure(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::default()
        }
    }
}

impl Envelope for StatisticsResponse {
    fn transport_failure(_message: &str) -> Self {
        // Same fallback block the backend renders when its own lookup fails.
        let mut response = Self::default();
        response.statistics.subjects = 15;
        response.statistics.uptime = "99.9%".to_string();
        response.statistics.uptime_hours = "0h 0m".to_string();
        response
    }
}

/// Collapses a transport result into its envelope.
pub fn normalize<T: Envelope>(result: Result<T, GatewayError>) -> T {
    result.unwrap_or_else(|err| {
        tracing::debug!("normalizing transport failure: {err}");
        T::transport_failure(err.user_message())
    })
}

/// Calls the portal backend. Implementations never fail on envelope-returning
/// calls; see [`normalize`].
#[allow(async_fn_in_trait)]
pub trait Gateway {
    async fn verify_identity(&self, student_id: &str) -> VerifyStudentResponse;

    async fn set_password(&self, student_id: &str, password: &SecretString) -> ActionResponse;

    async fn login(&self, student_id: &str, password: &SecretString) -> LoginResponse;

    async fn admin_login(&self, admin_id: &str, password: &SecretString) -> LoginResponse;

    async fn teacher_login(&self, teacher_id: &str, password: &SecretString) -> LoginResponse;

    async fn add_student(&self, student: &NewStudent) -> ActionResponse;

    async fn list_students(&self) -> Result<Vec<StudentRow>, GatewayError>;

    async fn delete_student(&self, id: i64) -> ActionResponse;

    async fn add_teacher(&self, teacher: &NewTeacher) -> ActionResponse;

    async fn list_teachers(&self) -> Result<Vec<TeacherRow>, GatewayError>;

    async fn delete_teacher(&self, id: i64) -> ActionResponse;

    async fn search_student(&self, request: &SearchStudentRequest) -> SearchStudentResponse;

    async fn save_result(&self, result: &ResultPayload) -> ActionResponse;

    async fn list_results(&self, filter: &ResultFilter) -> Result<Vec<ResultRow>, GatewayError>;

    async fn delete_result(&self, id: i64) -> DeleteResultResponse;

    async fn student_results(&self, student_id: &str) -> StudentResultsResponse;

    async fn statistics(&self) -> StatisticsResponse;
}

impl<T: Gateway> Gateway for &T {
    async fn verify_identity(&self, student_id: &str) -> VerifyStudentResponse {
        (**self).verify_identity(student_id).await
    }

    async fn set_password(&self, student_id: &str, password: &SecretString) -> ActionResponse {
        (**self).set_password(student_id, password).await
    }

    async fn login(&self, student_id: &str, password: &SecretString) -> LoginResponse {
        (**self).login(student_id, password).await
    }

    async fn admin_login(&self, admin_id: &str, password: &SecretString) -> LoginResponse {
        (**self).admin_login(admin_id, password).await
    }

    async fn teacher_login(&self, teacher_id: &str, password: &SecretString) -> LoginResponse {
        (**self).teacher_login(teacher_id, password).await
    }

    async fn add_student(&self, student: &NewStudent) -> ActionResponse {
        (**self).add_student(student).await
    }

    async fn list_students(&self) -> Result<Vec<StudentRow>, GatewayError> {
        (**self).list_students().await
    }

    async fn delete_student(&self, id: i64) -> ActionResponse {
        (**self).delete_student(id).await
    }

    async fn add_teacher(&self, teacher: &NewTeacher) -> ActionResponse {
        (**self).add_teacher(teacher).await
    }

    async fn list_teachers(&self) -> Result<Vec<TeacherRow>, GatewayError> {
        (**self).list_teachers().await
    }

    async fn delete_teacher(&self, id: i64) -> ActionResponse {
        (**self).delete_teacher(id).await
    }

    async fn search_student(&self, request: &SearchStudentRequest) -> SearchStudentResponse {
        (**self).search_student(request).await
    }

    async fn save_result(&self, result: &ResultPayload) -> ActionResponse {
        (**self).save_result(result).await
    }

    async fn list_results(&self, filter: &ResultFilter) -> Result<Vec<ResultRow>, GatewayError> {
        (**self).list_results(filter).await
    }

    async fn delete_result(&self, id: i64) -> DeleteResultResponse {
        (**self).delete_result(id).await
    }

    async fn student_results(&self, student_id: &str) -> StudentResultsResponse {
        (**self).student_results(student_id).await
    }

    async fn statistics(&self) -> StatisticsResponse {
        (**self).statistics().await
    }
}
