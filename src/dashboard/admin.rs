//! Admin dashboard: student and teacher registers.
//!
//! Every mutation is followed by a fresh fetch of the affected table; no rows
//! are patched locally.

use crate::gateway::{
    types::{ActionResponse, NewStudent, NewTeacher, StudentRow, TeacherRow},
    Gateway, GatewayError,
};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{info_span, Instrument};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Age must be a whole number, got '{0}'")]
    InvalidAge(String),
}

fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FormError::Required(field));
    }
    Ok(value.to_string())
}

/// Raw input of the "add student" form.
#[derive(Clone, Debug, Default)]
pub struct StudentForm {
    pub sid: String,
    pub name: String,
    pub surname: String,
    pub class: String,
    pub phone: String,
    pub attendance: String,
    pub age: String,
    pub sex: String,
}

impl StudentForm {
    /// # Errors
    /// Returns `FormError` when `sid` or `name` is blank or `age` is not an integer.
    pub fn validate(&self) -> Result<NewStudent, FormError> {
        let sid = required(&self.sid, "Student ID")?;
        let name = required(&self.name, "Name")?;
        let age = match self.age.trim() {
            "" => None,
            raw => Some(
                raw.parse::<u32>()
                    .map_err(|_| FormError::InvalidAge(raw.to_string()))?,
            ),
        };
        Ok(NewStudent {
            sid,
            name,
            surname: self.surname.trim().to_string(),
            class: self.class.trim().to_string(),
            phone: self.phone.trim().to_string(),
            attendance: self.attendance.trim().to_string(),
            age,
            sex: self.sex.trim().to_string(),
        })
    }
}

/// Raw input of the "add teacher" form.
#[derive(Debug)]
pub struct TeacherForm {
    pub teacher_id: String,
    pub name: String,
    pub surname: String,
    pub class: String,
    pub phone: String,
    pub password: SecretString,
    pub role: String,
}

impl TeacherForm {
    /// # Errors
    /// Returns `FormError::Required` when id, name or password is blank.
    pub fn validate(&self) -> Result<NewTeacher, FormError> {
        let teacher_id = required(&self.teacher_id, "Teacher ID")?;
        let name = required(&self.name, "Name")?;
        if self.password.expose_secret().trim().is_empty() {
            return Err(FormError::Required("Password"));
        }
        let role = match self.role.trim() {
            "" => "teacher".to_string(),
            role => role.to_string(),
        };
        Ok(NewTeacher {
            teacher_id,
            name,
            surname: self.surname.trim().to_string(),
            class: self.class.trim().to_string(),
            phone: self.phone.trim().to_string(),
            password: SecretString::from(self.password.expose_secret().to_string()),
            role,
        })
    }
}

/// Server answer to a mutation plus the table fetched right after it.
#[derive(Debug)]
pub struct Mutation<T> {
    pub outcome: ActionResponse,
    pub table: Result<Vec<T>, GatewayError>,
}

pub struct AdminDashboard<G> {
    gateway: G,
}

impl<G: Gateway> AdminDashboard<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// # Errors
    /// Returns the transport failure; the table has no envelope to fall back on.
    pub async fn list_students(&self) -> Result<Vec<StudentRow>, GatewayError> {
        self.gateway
            .list_students()
            .instrument(info_span!("admin.list_students"))
            .await
    }

    /// # Errors
    /// Returns `FormError` before any request when the form is invalid.
    pub async fn add_student(
        &self,
        form: &StudentForm,
    ) -> Result<Mutation<StudentRow>, FormError> {
        let student = form.validate()?;
        let outcome = self
            .gateway
            .add_student(&student)
            .instrument(info_span!("admin.add_student", sid = %student.sid))
            .await;
        Ok(Mutation {
            outcome,
            table: self.list_students().await,
        })
    }

    pub async fn delete_student(&self, id: i64) -> Mutation<StudentRow> {
        let outcome = self
            .gateway
            .delete_student(id)
            .instrument(info_span!("admin.delete_student", id))
            .await;
        Mutation {
            outcome,
            table: self.list_students().await,
        }
    }

    /// # Errors
    /// Returns the transport failure.
    pub async fn list_teachers(&self) -> Result<Vec<TeacherRow>, GatewayError> {
        self.gateway
            .list_teachers()
            .instrument(info_span!("admin.list_teachers"))
            .await
    }

    /// # Errors
    /// Returns `FormError` before any request when the form is invalid.
    pub async fn add_teacher(
        &self,
        form: &TeacherForm,
    ) -> Result<Mutation<TeacherRow>, FormError> {
        let teacher = form.validate()?;
        let outcome = self
            .gateway
            .add_teacher(&teacher)
            .instrument(info_span!("admin.add_teacher", teacher_id = %teacher.teacher_id))
            .await;
        Ok(Mutation {
            outcome,
            table: self.list_teachers().await,
        })
    }

    pub async fn delete_teacher(&self, id: i64) -> Mutation<TeacherRow> {
        let outcome = self
            .gateway
            .delete_teacher(id)
            .instrument(info_span!("admin.delete_teacher", id))
            .await;
        Mutation {
            outcome,
            table: self.list_teachers().await,
        }
    }
}
