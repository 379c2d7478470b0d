//! In-memory gateway for exercising the wizard and dashboards without HTTP.
//! Responses are queued per endpoint; an empty queue answers with the
//! normalized transport failure so tests also cover the offline path.

use super::{
    normalize, Gateway, GatewayError,
    types::{
        ActionResponse, DeleteResultResponse, LoginResponse, NewStudent, NewTeacher,
        ResultFilter, ResultPayload, ResultRow, SearchStudentRequest, SearchStudentResponse,
        StatisticsResponse, StudentResultsResponse, StudentRow, TeacherRow,
        VerifyStudentResponse,
    },
};
use secrecy::{ExposeSecret, SecretString};
use std::{collections::VecDeque, sync::Mutex};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    Verify(String),
    SetPassword { student_id: String, password: String },
    Login { student_id: String, password: String },
    AdminLogin { admin_id: String, password: String },
    TeacherLogin { teacher_id: String, password: String },
    AddStudent(NewStudent),
    ListStudents,
    DeleteStudent(i64),
    AddTeacher(String),
    ListTeachers,
    DeleteTeacher(i64),
    Search(SearchStudentRequest),
    SaveResult(ResultPayload),
    ListResults(ResultFilter),
    DeleteResult(i64),
    StudentResults(String),
    Statistics,
}

#[derive(Default)]
pub(crate) struct ScriptedGateway {
    pub calls: Mutex<Vec<Call>>,
    pub verify: Mutex<VecDeque<VerifyStudentResponse>>,
    pub actions: Mutex<VecDeque<ActionResponse>>,
    pub logins: Mutex<VecDeque<LoginResponse>>,
    pub searches: Mutex<VecDeque<SearchStudentResponse>>,
    pub deletes: Mutex<VecDeque<DeleteResultResponse>>,
    pub students: Mutex<VecDeque<Result<Vec<StudentRow>, GatewayError>>>,
    pub teachers: Mutex<VecDeque<Result<Vec<TeacherRow>, GatewayError>>>,
    pub results: Mutex<VecDeque<Result<Vec<ResultRow>, GatewayError>>>,
    pub reports: Mutex<VecDeque<StudentResultsResponse>>,
    pub stats: Mutex<VecDeque<StatisticsResponse>>,
}

fn pop<T>(queue: &Mutex<VecDeque<T>>) -> Option<T> {
    queue.lock().ok().and_then(|mut queue| queue.pop_front())
}

fn push<T>(queue: &Mutex<VecDeque<T>>, value: T) {
    if let Ok(mut queue) = queue.lock() {
        queue.push_back(value);
    }
}

fn offline<T: super::Envelope>(value: Option<T>) -> T {
    normalize(value.ok_or_else(|| GatewayError::Network("scripted offline".to_string())))
}

impl ScriptedGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_verify(self, response: VerifyStudentResponse) -> Self {
        push(&self.verify, response);
        self
    }

    pub(crate) fn with_action(self, response: ActionResponse) -> Self {
        push(&self.actions, response);
        self
    }

    pub(crate) fn with_login(self, response: LoginResponse) -> Self {
        push(&self.logins, response);
        self
    }

    pub(crate) fn with_search(self, response: SearchStudentResponse) -> Self {
        push(&self.searches, response);
        self
    }

    pub(crate) fn with_delete(self, response: DeleteResultResponse) -> Self {
        push(&self.deletes, response);
        self
    }

    pub(crate) fn with_students(self, rows: Vec<StudentRow>) -> Self {
        push(&self.students, Ok(rows));
        self
    }

    pub(crate) fn with_teachers(self, rows: Vec<TeacherRow>) -> Self {
        push(&self.teachers, Ok(rows));
        self
    }

    pub(crate) fn with_results(self, rows: Vec<ResultRow>) -> Self {
        push(&self.results, Ok(rows));
        self
    }

    pub(crate) fn with_student_results(self, response: StudentResultsResponse) -> Self {
        push(&self.reports, response);
        self
    }

    pub(crate) fn with_statistics(self, response: StatisticsResponse) -> Self {
        push(&self.stats, response);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: Call) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl Gateway for ScriptedGateway {
    async fn verify_identity(&self, student_id: &str) -> VerifyStudentResponse {
        self.record(Call::Verify(student_id.to_string()));
        offline(pop(&self.verify))
    }

    async fn set_password(&self, student_id: &str, password: &SecretString) -> ActionResponse {
        self.record(Call::SetPassword {
            student_id: student_id.to_string(),
            password: password.expose_secret().to_string(),
        });
        offline(pop(&self.actions))
    }

    async fn login(&self, student_id: &str, password: &SecretString) -> LoginResponse {
        self.record(Call::Login {
            student_id: student_id.to_string(),
            password: password.expose_secret().to_string(),
        });
        offline(pop(&self.logins))
    }

    async fn admin_login(&self, admin_id: &str, password: &SecretString) -> LoginResponse {
        self.record(Call::AdminLogin {
            admin_id: admin_id.to_string(),
            password: password.expose_secret().to_string(),
        });
        offline(pop(&self.logins))
    }

    async fn teacher_login(&self, teacher_id: &str, password: &SecretString) -> LoginResponse {
        self.record(Call::TeacherLogin {
            teacher_id: teacher_id.to_string(),
            password: password.expose_secret().to_string(),
        });
        offline(pop(&self.logins))
    }

    async fn add_student(&self, student: &NewStudent) -> ActionResponse {
        self.record(Call::AddStudent(student.clone()));
        offline(pop(&self.actions))
    }

    async fn list_students(&self) -> Result<Vec<StudentRow>, GatewayError> {
        self.record(Call::ListStudents);
        pop(&self.students).unwrap_or(Err(GatewayError::Timeout))
    }

    async fn delete_student(&self, id: i64) -> ActionResponse {
        self.record(Call::DeleteStudent(id));
        offline(pop(&self.actions))
    }

    async fn add_teacher(&self, teacher: &NewTeacher) -> ActionResponse {
        self.record(Call::AddTeacher(teacher.teacher_id.clone()));
        offline(pop(&self.actions))
    }

    async fn list_teachers(&self) -> Result<Vec<TeacherRow>, GatewayError> {
        self.record(Call::ListTeachers);
        pop(&self.teachers).unwrap_or(Err(GatewayError::Timeout))
    }

    async fn delete_teacher(&self, id: i64) -> ActionResponse {
        self.record(Call::DeleteTeacher(id));
        offline(pop(&self.actions))
    }

    async fn search_student(&self, request: &SearchStudentRequest) -> SearchStudentResponse {
        self.record(Call::Search(request.clone()));
        offline(pop(&self.searches))
    }

    async fn save_result(&self, result: &ResultPayload) -> ActionResponse {
        self.record(Call::SaveResult(result.clone()));
        offline(pop(&self.actions))
    }

    async fn list_results(&self, filter: &ResultFilter) -> Result<Vec<ResultRow>, GatewayError> {
        self.record(Call::ListResults(filter.clone()));
        pop(&self.results).unwrap_or(Err(GatewayError::Timeout))
    }

    async fn delete_result(&self, id: i64) -> DeleteResultResponse {
        self.record(Call::DeleteResult(id));
        offline(pop(&self.deletes))
    }

    async fn student_results(&self, student_id: &str) -> StudentResultsResponse {
        self.record(Call::StudentResults(student_id.to_string()));
        offline(pop(&self.reports))
    }

    async fn statistics(&self) -> StatisticsResponse {
        self.record(Call::Statistics);
        offline(pop(&self.stats))
    }
}
