//! Teacher dashboard: student lookup and exam result entry.

use super::grading::{current_year, Grade, GradeBands, Status};
use crate::gateway::{
    types::{FoundStudent, ResultFilter, ResultPayload, ResultRow, SearchStudentRequest},
    Gateway, GatewayError,
};
use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};

pub const DEFAULT_SUBJECTS: [&str; 18] = [
    "English Language",
    "French",
    "Shona / Mutauro",
    "Mathematics",
    "Biology",
    "Chemistry",
    "Physics",
    "Combined Science",
    "Geography",
    "Agriculture",
    "Computer Science",
    "Heritage Studies",
    "Religious Studies",
    "Literature in English",
    "Accounting",
    "Business Studies",
    "Textile Tech & Design",
    "Building Tech & Design",
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    #[error("Enter Student ID (or name) to search")]
    SearchCriteria,
    #[error("{0}")]
    NotFound(String),
    #[error(
        "Please search and verify the student exists in the student database before saving marks."
    )]
    NotVerified,
    #[error("Please fill all required fields and ensure student is verified.")]
    MissingFields,
    #[error("{field} must be a number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("Enter subject name")]
    EmptySubject,
    #[error("Record not found")]
    RecordNotFound(i64),
    #[error("{0}")]
    Rejected(String),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Ordered, duplicate-free subject list offered by the entry form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectCatalogue {
    subjects: Vec<String>,
}

impl Default for SubjectCatalogue {
    fn default() -> Self {
        Self {
            subjects: DEFAULT_SUBJECTS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl SubjectCatalogue {
    /// Adds `name` unless it is already listed. Returns the trimmed name.
    ///
    /// # Errors
    /// `EmptySubject` for blank input.
    pub fn add(&mut self, name: &str) -> Result<String, DashboardError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DashboardError::EmptySubject);
        }
        if !self.contains(name) {
            self.subjects.push(name.to_string());
        }
        Ok(name.to_string())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.subjects.iter().any(|subject| subject == name)
    }

    /// Picks up subjects seen in loaded results.
    pub fn merge<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            let name = name.trim();
            if !name.is_empty() && !self.contains(name) {
                self.subjects.push(name.to_string());
            }
        }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.subjects
    }
}

/// Result entry form. Numeric fields hold the raw text typed by the user.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultForm {
    pub student_id: String,
    pub student_name: String,
    pub form: String,
    pub level: String,
    pub subject: String,
    pub term: String,
    pub year: String,
    pub exam_type: String,
    pub exam_date: String,
    pub marks: String,
    pub comment: String,
}

pub struct TeacherDashboard<G> {
    gateway: G,
    bands: GradeBands,
    subjects: SubjectCatalogue,
    form: ResultForm,
    verified: bool,
    filter: ResultFilter,
    results: Vec<ResultRow>,
}

impl<G: Gateway> TeacherDashboard<G> {
    pub fn new(gateway: G, bands: GradeBands) -> Self {
        Self {
            gateway,
            bands,
            subjects: SubjectCatalogue::default(),
            form: ResultForm {
                year: current_year().to_string(),
                ..ResultForm::default()
            },
            verified: false,
            filter: ResultFilter::default(),
            results: Vec::new(),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn form(&self) -> &ResultForm {
        &self.form
    }

    /// Editing the form directly. The verified flag is left alone, matching
    /// the browser form where typing does not reset a previous search.
    pub fn form_mut(&mut self) -> &mut ResultForm {
        &mut self.form
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    pub fn subjects(&self) -> &SubjectCatalogue {
        &self.subjects
    }

    pub fn subjects_mut(&mut self) -> &mut SubjectCatalogue {
        &mut self.subjects
    }

    pub fn results(&self) -> &[ResultRow] {
        &self.results
    }

    pub fn set_filter(&mut self, filter: ResultFilter) {
        self.filter = filter;
    }

    /// Grade and status derived from the current marks field.
    pub fn grade_preview(&self) -> Option<(Grade, Status)> {
        self.bands.preview(&self.form.marks)
    }

    /// Looks a student up by id or name and, when found, fills the student
    /// part of the form and marks it verified.
    ///
    /// # Errors
    /// `SearchCriteria` when both inputs are blank, `NotFound` otherwise.
    pub async fn search(
        &mut self,
        student_id: &str,
        name: &str,
    ) -> Result<FoundStudent, DashboardError> {
        let request = SearchStudentRequest {
            student_id: student_id.trim().to_string(),
            name: name.trim().to_string(),
        };
        if request.student_id.is_empty() && request.name.is_empty() {
            return Err(DashboardError::SearchCriteria);
        }

        let response = self
            .gateway
            .search_student(&request)
            .instrument(info_span!("teacher.search_student"))
            .await;

        match (response.found, response.student) {
            (true, Some(student)) => {
                self.verified = true;
                self.form.student_id = student.student_id.clone();
                self.form.student_name = student.name.clone();
                self.form.form = student.class.clone();
                Ok(student)
            }
            _ => {
                self.verified = false;
                Err(DashboardError::NotFound(
                    response
                        .message
                        .filter(|message| !message.trim().is_empty())
                        .unwrap_or_else(|| {
                            "Student ID not found. Please add the student first.".to_string()
                        }),
                ))
            }
        }
    }

    fn payload(&self) -> Result<ResultPayload, DashboardError> {
        if !self.verified {
            return Err(DashboardError::NotVerified);
        }
        let form = &self.form;
        let student_id = form.student_id.trim();
        let student_name = form.student_name.trim();
        let required: [&str; 8] = [
            student_id,
            student_name,
            &form.form,
            &form.level,
            &form.subject,
            &form.term,
            &form.year,
            &form.marks,
        ];
        if required.iter().any(|value| value.trim().is_empty()) {
            return Err(DashboardError::MissingFields);
        }

        let year = form
            .year
            .trim()
            .parse::<i32>()
            .map_err(|_| DashboardError::InvalidNumber {
                field: "Year",
                value: form.year.clone(),
            })?;
        let marks = form
            .marks
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|marks| marks.is_finite())
            .ok_or_else(|| DashboardError::InvalidNumber {
                field: "Marks",
                value: form.marks.clone(),
            })?;
        let grade = self.bands.grade(marks);

        Ok(ResultPayload {
            student_id: student_id.to_string(),
            student_name: student_name.to_string(),
            form: form.form.clone(),
            level: form.level.clone(),
            subject: form.subject.clone(),
            term: form.term.clone(),
            year,
            exam_type: form.exam_type.clone(),
            exam_date: form.exam_date.clone(),
            marks,
            grade: grade.to_string(),
            status: grade.status().to_string(),
            comment: form.comment.clone(),
            teacher_id: String::new(),
        })
    }

    /// Saves the form as a result row, then clears marks and reloads.
    ///
    /// # Errors
    /// Local validation errors, or `Rejected` with the server message.
    pub async fn save(&mut self) -> Result<String, DashboardError> {
        let payload = self.payload()?;
        let response = self
            .gateway
            .save_result(&payload)
            .instrument(info_span!("teacher.save_result", student_id = %payload.student_id))
            .await;
        if !response.success {
            return Err(DashboardError::Rejected(
                response
                    .message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| "Save failed".to_string()),
            ));
        }

        info!("saved {} result for {}", payload.subject, payload.student_id);
        self.clear_form();
        if let Err(err) = self.reload().await {
            warn!("result list reload failed after save: {err}");
        }
        Ok(response
            .message
            .unwrap_or_else(|| "Saved successfully".to_string()))
    }

    /// Fetches results with the current filter.
    ///
    /// # Errors
    /// Transport failures.
    pub async fn reload(&mut self) -> Result<&[ResultRow], DashboardError> {
        let rows = self
            .gateway
            .list_results(&self.filter)
            .instrument(info_span!("teacher.list_results"))
            .await?;
        self.subjects
            .merge(rows.iter().map(|row| row.subject.as_str()));
        self.results = rows;
        Ok(&self.results)
    }

    /// Loads result `id` into the form for correction. The unfiltered list is
    /// fetched since the backend has no single-row lookup.
    ///
    /// # Errors
    /// `RecordNotFound` when no row carries `id`, or a transport failure.
    pub async fn edit(&mut self, id: i64) -> Result<&ResultForm, DashboardError> {
        let rows = self
            .gateway
            .list_results(&ResultFilter::default())
            .instrument(info_span!("teacher.edit_result", id))
            .await?;
        let row = rows
            .into_iter()
            .find(|row| row.id == id)
            .ok_or(DashboardError::RecordNotFound(id))?;

        self.form = ResultForm {
            student_id: row.student_id,
            student_name: row.student_name,
            form: row.form,
            level: row.level,
            subject: row.subject,
            term: row.term,
            year: row.year,
            exam_type: row.exam_type,
            exam_date: row.exam_date,
            marks: row.marks.map(|marks| marks.to_string()).unwrap_or_default(),
            comment: row.comment,
        };
        self.verified = true;
        Ok(&self.form)
    }

    /// Deletes result `id` and reloads on success.
    ///
    /// # Errors
    /// `Rejected` when the backend does not confirm the delete.
    pub async fn delete(&mut self, id: i64) -> Result<(), DashboardError> {
        let response = self
            .gateway
            .delete_result(id)
            .instrument(info_span!("teacher.delete_result", id))
            .await;
        if !response.ok {
            return Err(DashboardError::Rejected(
                response
                    .message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| "Delete failed".to_string()),
            ));
        }
        self.reload().await?;
        Ok(())
    }

    /// Clears marks and comment; the student stays selected.
    pub fn clear_form(&mut self) {
        self.form.marks.clear();
        self.form.comment.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::gateway::{
        testing::{Call, ScriptedGateway},
        types::{ActionResponse, DeleteResultResponse, SearchStudentResponse},
    };

    fn found(student_id: &str) -> SearchStudentResponse {
        SearchStudentResponse {
            found: true,
            student: Some(FoundStudent {
                student_id: student_id.to_string(),
                name: "Jane".to_string(),
                surname: "Dube".to_string(),
                class: "4A".to_string(),
            }),
            message: None,
        }
    }

    fn row(id: i64, subject: &str, marks: f64) -> ResultRow {
        ResultRow {
            id,
            student_id: "S1001".to_string(),
            student_name: "Jane".to_string(),
            form: "4A".to_string(),
            level: "O Level".to_string(),
            subject: subject.to_string(),
            term: "1".to_string(),
            year: "2025".to_string(),
            exam_type: "End of Term".to_string(),
            exam_date: String::new(),
            marks: Some(marks),
            grade: String::new(),
            status: String::new(),
            comment: "steady".to_string(),
        }
    }

    fn fill(dashboard: &mut TeacherDashboard<ScriptedGateway>) {
        let form = dashboard.form_mut();
        form.level = "O Level".to_string();
        form.subject = "Mathematics".to_string();
        form.term = "1".to_string();
        form.year = "2025".to_string();
        form.marks = "72".to_string();
        form.comment = "good work".to_string();
    }

    #[test]
    fn catalogue_defaults_and_additions() {
        let mut catalogue = SubjectCatalogue::default();
        assert_eq!(catalogue.as_slice().len(), 18);
        assert_eq!(catalogue.add("  Music "), Ok("Music".to_string()));
        assert_eq!(catalogue.add("Music"), Ok("Music".to_string()));
        assert_eq!(catalogue.add("Physics"), Ok("Physics".to_string()));
        assert_eq!(catalogue.as_slice().len(), 19);
        assert_eq!(catalogue.add(" "), Err(DashboardError::EmptySubject));
        catalogue.merge(["Music", "Art", ""]);
        assert_eq!(catalogue.as_slice().last().map(String::as_str), Some("Art"));
    }

    #[tokio::test]
    async fn search_requires_criteria() {
        let mut dashboard = TeacherDashboard::new(ScriptedGateway::new(), GradeBands::default());
        assert_eq!(
            dashboard.search(" ", "").await,
            Err(DashboardError::SearchCriteria)
        );
        assert!(dashboard.gateway().calls().is_empty());
    }

    #[tokio::test]
    async fn save_requires_verified_student() {
        let mut dashboard = TeacherDashboard::new(ScriptedGateway::new(), GradeBands::default());
        fill(&mut dashboard);
        assert_eq!(dashboard.save().await, Err(DashboardError::NotVerified));
        assert!(dashboard.gateway().calls().is_empty());
    }

    #[tokio::test]
    async fn search_then_save_derives_grade_and_clears_marks() {
        let gateway = ScriptedGateway::new()
            .with_search(found("S1001"))
            .with_action(ActionResponse {
                success: true,
                message: Some("Result saved".to_string()),
            })
            .with_results(vec![row(1, "Mathematics", 72.0)]);
        let mut dashboard = TeacherDashboard::new(gateway, GradeBands::default());

        dashboard.search("S1001", "").await.unwrap();
        assert!(dashboard.is_verified());
        assert_eq!(dashboard.form().form, "4A");

        fill(&mut dashboard);
        assert_eq!(dashboard.grade_preview(), Some((Grade::B, Status::Good)));
        assert_eq!(dashboard.save().await, Ok("Result saved".to_string()));

        assert!(dashboard.form().marks.is_empty());
        assert!(dashboard.form().comment.is_empty());
        assert_eq!(dashboard.form().student_id, "S1001");
        assert_eq!(dashboard.results().len(), 1);

        let calls = dashboard.gateway().calls();
        let Call::SaveResult(payload) = &calls[1] else {
            panic!("expected save, got {:?}", calls[1]);
        };
        assert_eq!(payload.grade, "B");
        assert_eq!(payload.status, "Good");
        assert_eq!(payload.year, 2025);
        assert!((payload.marks - 72.0).abs() < f64::EPSILON);
        assert_eq!(payload.teacher_id, "");
        assert_eq!(calls[2], Call::ListResults(ResultFilter::default()));
    }

    #[tokio::test]
    async fn missing_fields_and_bad_marks_are_rejected() {
        let gateway = ScriptedGateway::new().with_search(found("S1001"));
        let mut dashboard = TeacherDashboard::new(gateway, GradeBands::default());
        dashboard.search("S1001", "").await.unwrap();

        assert_eq!(dashboard.save().await, Err(DashboardError::MissingFields));

        fill(&mut dashboard);
        dashboard.form_mut().marks = "seventy".to_string();
        assert!(matches!(
            dashboard.save().await,
            Err(DashboardError::InvalidNumber { field: "Marks", .. })
        ));
        assert_eq!(dashboard.gateway().calls().len(), 1);
    }

    #[tokio::test]
    async fn failed_search_clears_verification() {
        let gateway = ScriptedGateway::new()
            .with_search(found("S1001"))
            .with_search(SearchStudentResponse {
                found: false,
                student: None,
                message: Some("Student not found".to_string()),
            });
        let mut dashboard = TeacherDashboard::new(gateway, GradeBands::default());

        dashboard.search("S1001", "").await.unwrap();
        assert!(dashboard.is_verified());
        assert_eq!(
            dashboard.search("S404", "").await,
            Err(DashboardError::NotFound("Student not found".to_string()))
        );
        assert!(!dashboard.is_verified());
    }

    #[tokio::test]
    async fn edit_loads_row_from_full_list() {
        let gateway = ScriptedGateway::new()
            .with_results(vec![row(1, "Physics", 55.0), row(2, "Mathematics", 81.5)]);
        let mut dashboard = TeacherDashboard::new(gateway, GradeBands::default());
        dashboard.set_filter(ResultFilter {
            form: "4A".to_string(),
            ..ResultFilter::default()
        });

        let form = dashboard.edit(2).await.unwrap();
        assert_eq!(form.subject, "Mathematics");
        assert_eq!(form.marks, "81.5");
        assert!(dashboard.is_verified());
        assert_eq!(dashboard.grade_preview(), Some((Grade::A, Status::Excellent)));
        assert_eq!(
            dashboard.gateway().calls(),
            vec![Call::ListResults(ResultFilter::default())]
        );
    }

    #[tokio::test]
    async fn edit_unknown_id() {
        let gateway = ScriptedGateway::new().with_results(vec![row(1, "Physics", 55.0)]);
        let mut dashboard = TeacherDashboard::new(gateway, GradeBands::default());
        assert_eq!(
            dashboard.edit(7).await.map(|form| form.clone()),
            Err(DashboardError::RecordNotFound(7))
        );
        assert!(!dashboard.is_verified());
    }

    #[tokio::test]
    async fn delete_reloads_only_when_confirmed() {
        let gateway = ScriptedGateway::new()
            .with_delete(DeleteResultResponse {
                ok: false,
                message: None,
            })
            .with_delete(DeleteResultResponse {
                ok: true,
                message: None,
            })
            .with_results(vec![]);
        let mut dashboard = TeacherDashboard::new(gateway, GradeBands::default());

        assert_eq!(
            dashboard.delete(3).await,
            Err(DashboardError::Rejected("Delete failed".to_string()))
        );
        assert_eq!(dashboard.delete(3).await, Ok(()));
        assert_eq!(
            dashboard.gateway().calls(),
            vec![
                Call::DeleteResult(3),
                Call::DeleteResult(3),
                Call::ListResults(ResultFilter::default())
            ]
        );
    }

    #[tokio::test]
    async fn reload_surfaces_transport_failure() {
        let mut dashboard = TeacherDashboard::new(ScriptedGateway::new(), GradeBands::default());
        assert_eq!(
            dashboard.reload().await.map(<[ResultRow]>::len),
            Err(DashboardError::Gateway(GatewayError::Timeout))
        );
    }
}
