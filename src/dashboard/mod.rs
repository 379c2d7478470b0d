//! Staff sign-in and the admin, teacher and student dashboards.

pub mod admin;
pub mod grading;
pub mod login;
pub mod teacher;

pub use admin::{AdminDashboard, FormError, Mutation, StudentForm, TeacherForm};
pub use grading::{Grade, GradeBands, Status};
pub use login::{sign_in, LoginError, Portal, SignedIn};
pub use teacher::{DashboardError, ResultForm, SubjectCatalogue, TeacherDashboard};

use crate::gateway::{
    types::{PortalStatistics, StudentResultsResponse},
    Gateway,
};
use tracing::{info_span, Instrument};

/// Results and summary for one student.
///
/// # Errors
/// `Rejected` with the backend (or transport) error text.
pub async fn student_results<G: Gateway>(
    gateway: &G,
    student_id: &str,
) -> Result<StudentResultsResponse, DashboardError> {
    let student_id = student_id.trim();
    if student_id.is_empty() {
        return Err(DashboardError::SearchCriteria);
    }
    let response = gateway
        .student_results(student_id)
        .instrument(info_span!("student.results", student_id))
        .await;
    match response.error {
        Some(error) => Err(DashboardError::Rejected(error)),
        None => Ok(response),
    }
}

/// Portal-wide counters. Never fails; the fallback block stands in when the
/// backend cannot be reached.
pub async fn portal_statistics<G: Gateway>(gateway: &G) -> PortalStatistics {
    gateway
        .statistics()
        .instrument(info_span!("portal.statistics"))
        .await
        .statistics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{
        testing::{Call, ScriptedGateway},
        NETWORK_ERROR_MESSAGE,
    };

    #[tokio::test]
    async fn statistics_fallback_when_offline() {
        let gateway = ScriptedGateway::new();
        let stats = portal_statistics(&gateway).await;
        assert_eq!(stats.subjects, 15);
        assert_eq!(stats.uptime, "99.9%");
        assert_eq!(gateway.calls(), vec![Call::Statistics]);
    }

    #[tokio::test]
    async fn student_results_reports_error_text() {
        let gateway = ScriptedGateway::new();
        assert_eq!(
            student_results(&gateway, " S1001 ").await,
            Err(DashboardError::Rejected(NETWORK_ERROR_MESSAGE.to_string()))
        );
        assert_eq!(
            gateway.calls(),
            vec![Call::StudentResults("S1001".to_string())]
        );
        assert_eq!(
            student_results(&gateway, "").await,
            Err(DashboardError::SearchCriteria)
        );
    }
}
