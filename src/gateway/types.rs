//! Request and response types for the portal API. Login and password payloads
//! carry plain passwords only for the duration of serialization; callers hold
//! them as `SecretString` and must never log these requests.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

/// Accepts strings, numbers or null for loosely typed columns.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

/// Student details returned by the identify step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub class: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyStudentRequest<'a> {
    pub student_id: &'a str,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyStudentResponse {
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub student: Option<StudentRecord>,
    #[serde(default)]
    pub has_password: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body shared by password creation and student login.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCredentialsRequest<'a> {
    pub student_id: &'a str,
    pub password: &'a str,
}

impl std::fmt::Debug for StudentCredentialsRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudentCredentialsRequest")
            .field("student_id", &self.student_id)
            .field("password", &"***")
            .finish()
    }
}

/// Generic `{success, message}` envelope used by every mutating endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Student summary attached to a successful student login.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct StudentSummary {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub class: String,
}

/// Envelope returned by the student, admin and teacher login endpoints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub redirect: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub student: Option<StudentSummary>,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginRequest<'a> {
    pub admin_id: &'a str,
    pub password: &'a str,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherLoginRequest<'a> {
    pub teacher_id: &'a str,
    pub password: &'a str,
}

/// Payload for `/add_student`; field names follow the admin form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NewStudent {
    pub sid: String,
    pub name: String,
    pub surname: String,
    pub class: String,
    pub phone: String,
    pub attendance: String,
    pub age: Option<u32>,
    pub sex: String,
}

/// Payload for `/add_teacher`.
#[derive(Serialize)]
pub struct NewTeacher {
    pub teacher_id: String,
    pub name: String,
    pub surname: String,
    pub class: String,
    pub phone: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
    pub role: String,
}

impl std::fmt::Debug for NewTeacher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewTeacher")
            .field("teacher_id", &self.teacher_id)
            .field("name", &self.name)
            .field("surname", &self.surname)
            .field("class", &self.class)
            .field("phone", &self.phone)
            .field("password", &"***")
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct StudentRow {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub student_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub surname: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub class: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub attendance: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub age: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sex: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: String,
}

/// Teacher row as listed on the admin dashboard. The stored password column
/// is deliberately not deserialized.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TeacherRow {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub teacher_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub surname: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub class: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub role: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchStudentRequest {
    pub student_id: String,
    pub name: String,
}

/// Full student row returned by `/search_student`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FoundStudent {
    #[serde(default, deserialize_with = "lenient_text")]
    pub student_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub surname: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub class: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SearchStudentResponse {
    #[serde(default)]
    pub found: bool,
    #[serde(default)]
    pub student: Option<FoundStudent>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Payload for `/save_result`; the backend upserts on
/// `(student_id, subject, term, year, exam_type)`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultPayload {
    pub student_id: String,
    pub student_name: String,
    pub form: String,
    pub level: String,
    pub subject: String,
    pub term: String,
    pub year: i32,
    pub exam_type: String,
    pub exam_date: String,
    pub marks: f64,
    pub grade: String,
    pub status: String,
    pub comment: String,
    pub teacher_id: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ResultRow {
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub student_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub student_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub form: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub level: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub subject: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub term: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub year: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub exam_type: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub exam_date: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub marks: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub grade: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub comment: String,
}

/// Optional filters for `/get_results`; empty values are not sent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultFilter {
    pub form: String,
    pub subject: String,
    pub term: String,
}

impl ResultFilter {
    #[must_use]
    pub fn query(&self) -> Vec<(&'static str, &str)> {
        [
            ("form", self.form.as_str()),
            ("subject", self.subject.as_str()),
            ("term", self.term.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct DeleteResultResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultStatistics {
    #[serde(default)]
    pub total_subjects: u32,
    #[serde(default)]
    pub average: f64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub best_subject: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub best_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub weakest_subject: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub weakest_score: Option<f64>,
    #[serde(default)]
    pub passed: u32,
    #[serde(default)]
    pub failed: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct StudentResultsResponse {
    #[serde(default)]
    pub results: Vec<ResultRow>,
    #[serde(default)]
    pub statistics: ResultStatistics,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct PortalStatistics {
    #[serde(default)]
    pub students: u64,
    #[serde(default)]
    pub teachers: u64,
    #[serde(default)]
    pub subjects: u64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub uptime: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub uptime_hours: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct StatisticsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub statistics: PortalStatistics,
}
