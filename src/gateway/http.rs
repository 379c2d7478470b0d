//! `reqwest` implementation of the portal gateway. Every request shares one
//! client with the crate user agent and an optional timeout. Response bodies
//! are decoded regardless of status because the backend reports 400/401/404/500
//! with the same JSON envelope as successes.

use super::{
    normalize, Gateway, GatewayError,
    types::{
        ActionResponse, AdminLoginRequest, DeleteResultResponse, LoginResponse, NewStudent,
        NewTeacher, ResultFilter, ResultPayload, ResultRow, SearchStudentRequest,
        SearchStudentResponse, StatisticsResponse, StudentCredentialsRequest,
        StudentResultsResponse, StudentRow, TeacherLoginRequest, TeacherRow,
        VerifyStudentRequest, VerifyStudentResponse,
    },
};
use crate::APP_USER_AGENT;
use reqwest::{Client, Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, info_span, Instrument};
use url::Url;

/// Maximum number of body characters carried into a decode error.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Build a gateway for the portal at `base_url`.
    ///
    /// # Errors
    /// Returns `GatewayError::Url` if the URL does not parse or is not http(s),
    /// and `GatewayError::Network` if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, GatewayError> {
        let parsed = Url::parse(base_url.trim()).map_err(|err| GatewayError::Url(err.to_string()))?;
        match parsed.scheme() {
            "http" | "https" => {}
            scheme => return Err(GatewayError::Url(format!("unsupported scheme {scheme}"))),
        }

        let mut builder = Client::builder().user_agent(APP_USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| GatewayError::Network(err.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim().to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> (RequestBuilder, String) {
        let url = build_url_with_base(&self.base_url, path);
        (self.client.request(method, &url), url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        method: &Method,
        url: &str,
    ) -> Result<T, GatewayError> {
        let span = info_span!("portal.request", http.method = %method, url = %url);
        let response = builder
            .send()
            .instrument(span)
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if !status.is_success() {
            debug!("{} {} returned {}", method, url, status);
        }

        let body = response.text().await.map_err(map_request_error)?;
        serde_json::from_str(&body).map_err(|err| GatewayError::Decode {
            status: status.as_u16(),
            message: format!("{err}: {}", sanitize_body(&body)),
        })
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let (builder, url) = self.request(Method::POST, path);
        self.send(builder.json(body), &Method::POST, &url).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, GatewayError> {
        let (builder, url) = self.request(Method::GET, path);
        let builder = if query.is_empty() {
            builder
        } else {
            builder.query(query)
        };
        self.send(builder, &Method::GET, &url).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let (builder, url) = self.request(Method::DELETE, path);
        self.send(builder, &Method::DELETE, &url).await
    }
}

impl Gateway for HttpGateway {
    async fn verify_identity(&self, student_id: &str) -> VerifyStudentResponse {
        normalize(
            self.post("/verify_student", &VerifyStudentRequest { student_id })
                .await,
        )
    }

    async fn set_password(&self, student_id: &str, password: &SecretString) -> ActionResponse {
        let request = StudentCredentialsRequest {
            student_id,
            password: password.expose_secret(),
        };
        normalize(self.post("/create_student_password", &request).await)
    }

    async fn login(&self, student_id: &str, password: &SecretString) -> LoginResponse {
        let request = StudentCredentialsRequest {
            student_id,
            password: password.expose_secret(),
        };
        normalize(self.post("/student_login", &request).await)
    }

    async fn admin_login(&self, admin_id: &str, password: &SecretString) -> LoginResponse {
        let request = AdminLoginRequest {
            admin_id,
            password: password.expose_secret(),
        };
        normalize(self.post("/admin_login", &request).await)
    }

    async fn teacher_login(&self, teacher_id: &str, password: &SecretString) -> LoginResponse {
        let request = TeacherLoginRequest {
            teacher_id,
            password: password.expose_secret(),
        };
        normalize(self.post("/teacher_login", &request).await)
    }

    async fn add_student(&self, student: &NewStudent) -> ActionResponse {
        normalize(self.post("/add_student", student).await)
    }

    async fn list_students(&self) -> Result<Vec<StudentRow>, GatewayError> {
        self.get("/get_students", &[]).await
    }

    async fn delete_student(&self, id: i64) -> ActionResponse {
        normalize(self.delete(&format!("/delete_student/{id}")).await)
    }

    async fn add_teacher(&self, teacher: &NewTeacher) -> ActionResponse {
        normalize(self.post("/add_teacher", teacher).await)
    }

    async fn list_teachers(&self) -> Result<Vec<TeacherRow>, GatewayError> {
        self.get("/get_teachers", &[]).await
    }

    async fn delete_teacher(&self, id: i64) -> ActionResponse {
        normalize(self.delete(&format!("/delete_teacher/{id}")).await)
    }

    async fn search_student(&self, request: &SearchStudentRequest) -> SearchStudentResponse {
        normalize(self.post("/search_student", request).await)
    }

    async fn save_result(&self, result: &ResultPayload) -> ActionResponse {
        normalize(self.post("/save_result", result).await)
    }

    async fn list_results(&self, filter: &ResultFilter) -> Result<Vec<ResultRow>, GatewayError> {
        self.get("/get_results", &filter.query()).await
    }

    async fn delete_result(&self, id: i64) -> DeleteResultResponse {
        normalize(self.delete(&format!("/delete_result/{id}")).await)
    }

    async fn student_results(&self, student_id: &str) -> StudentResultsResponse {
        let path = format!("/student_results/{}", encode_segment(student_id));
        normalize(self.get(&path, &[]).await)
    }

    async fn statistics(&self) -> StatisticsResponse {
        normalize(self.get("/api/statistics", &[]).await)
    }
}

/// Builds a URL from an explicit base URL and the provided path.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Percent-encodes a single path segment.
fn encode_segment(segment: &str) -> String {
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return segment.to_string();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(segment);
    }
    url.path().trim_start_matches('/').to_string()
}

/// Maps transport errors with timeout detection.
fn map_request_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Network(err.to_string())
    }
}

/// Trims and truncates a response body for error messages.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "empty body".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
