use crate::cli::actions::{admin, login, results, student, Action};
use anyhow::Result;

/// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Student(args) => student::execute(args).await,
        Action::Login(args) => login::execute(args).await,
        Action::Admin(args) => admin::execute(args).await,
        Action::Results(args) => results::execute(args).await,
        Action::Grade(args) => results::grade(&args),
        Action::Stats(globals) => results::stats(&globals).await,
    }
}
