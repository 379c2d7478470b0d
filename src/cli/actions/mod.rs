pub mod admin;
pub mod login;
pub mod results;
pub mod student;

mod run;

use super::globals::GlobalArgs;

#[derive(Debug)]
pub enum Action {
    Student(student::Args),
    Login(login::Args),
    Admin(admin::Args),
    Results(results::Args),
    Grade(results::GradeArgs),
    Stats(GlobalArgs),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
