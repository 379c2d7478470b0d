//! Admin and teacher sign-in forms.

use crate::gateway::Gateway;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use thiserror::Error;
use tracing::{info, info_span, Instrument};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Portal {
    Admin,
    Teacher,
}

impl Portal {
    fn missing_credentials(self) -> &'static str {
        match self {
            Portal::Admin => "Enter Admin ID and Password",
            Portal::Teacher => "Please enter both Teacher ID and password",
        }
    }
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Portal::Admin => f.write_str("admin"),
            Portal::Teacher => f.write_str("teacher"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("{0}")]
    MissingCredentials(&'static str),
    #[error("{0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIn {
    /// Id actually sent, after trimming.
    pub id: String,
    pub redirect: String,
    pub name: Option<String>,
    pub role: Option<String>,
}

/// Validates the form, calls the portal login endpoint and maps the envelope.
///
/// # Errors
/// `MissingCredentials` when either field is blank after trimming, otherwise
/// `Rejected` with the server (or normalized transport) message.
pub async fn sign_in<G: Gateway>(
    gateway: &G,
    portal: Portal,
    id: &str,
    password: &SecretString,
) -> Result<SignedIn, LoginError> {
    let id = id.trim();
    let password = SecretString::from(password.expose_secret().trim().to_string());
    if id.is_empty() || password.expose_secret().is_empty() {
        return Err(LoginError::MissingCredentials(portal.missing_credentials()));
    }

    let span = info_span!("portal.login", %portal);
    let response = match portal {
        Portal::Admin => gateway.admin_login(id, &password).instrument(span).await,
        Portal::Teacher => gateway.teacher_login(id, &password).instrument(span).await,
    };

    if !response.success {
        return Err(LoginError::Rejected(
            response
                .message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| "Login failed".to_string()),
        ));
    }

    let redirect = response.redirect.unwrap_or_else(|| match portal {
        Portal::Admin => "/admin/dashboard".to_string(),
        Portal::Teacher => "/teacher/teacher_dashboard.html".to_string(),
    });
    info!("{portal} login succeeded");
    Ok(SignedIn {
        id: id.to_string(),
        redirect,
        name: response.name,
        role: response.role,
    })
}
