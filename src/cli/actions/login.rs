use crate::{
    cli::{
        globals::GlobalArgs,
        prefs::{self, Prefs},
        terminal::Terminal,
    },
    dashboard::{sign_in, Portal, SignedIn},
    gateway::Gateway,
};
use anyhow::{bail, Result};
use secrecy::SecretString;
use std::{
    io::{BufRead, Write},
    path::PathBuf,
};
use tracing::warn;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub portal: Portal,
    pub id: Option<String>,
    pub password: Option<SecretString>,
    pub remember: bool,
    pub prefs: Option<PathBuf>,
}

/// # Errors
/// Returns an error if the gateway cannot be built, the terminal fails or
/// the login is rejected.
pub async fn execute(args: Args) -> Result<()> {
    let gateway = args.globals.gateway()?;
    let mut terminal = Terminal::stdio();
    run(&gateway, args, &mut terminal).await?;
    Ok(())
}

/// Prompts for missing credentials, signs in and updates remembered ids.
///
/// # Errors
/// Returns an error if the terminal fails or the login is rejected.
pub async fn run<G, R, W>(
    gateway: &G,
    args: Args,
    terminal: &mut Terminal<R, W>,
) -> Result<SignedIn>
where
    G: Gateway,
    R: BufRead,
    W: Write,
{
    let prefs_path = args.prefs.clone().unwrap_or_else(prefs::default_path);
    let mut stored = if args.portal == Portal::Teacher {
        Prefs::load(&prefs_path).unwrap_or_else(|err| {
            warn!("ignoring preferences: {err:#}");
            Prefs::default()
        })
    } else {
        Prefs::default()
    };

    let (label, default) = match args.portal {
        Portal::Admin => ("Admin ID", None),
        Portal::Teacher => ("Teacher ID", stored.remembered_teacher().map(str::to_string)),
    };
    let id = match args.id {
        Some(id) => id,
        None => terminal.require(label, default.as_deref())?,
    };
    let password = match args.password {
        Some(password) => password,
        None => match terminal.prompt_secret("Password")? {
            Some(password) => password,
            None => bail!("no input for Password"),
        },
    };

    let signed_in = match sign_in(gateway, args.portal, &id, &password).await {
        Ok(signed_in) => signed_in,
        Err(err) => {
            terminal.say(&format!("error: {err}"))?;
            bail!(err);
        }
    };

    if args.portal == Portal::Teacher && args.remember {
        stored.remember_teacher(&signed_in.id);
        if let Err(err) = stored.save(&prefs_path) {
            warn!("could not remember teacher id: {err:#}");
        }
    }

    match &signed_in.name {
        Some(name) => terminal.say(&format!("Welcome, {name}!"))?,
        None => terminal.say("Login successful!")?,
    }
    terminal.say(&format!("Continue at {}", signed_in.redirect))?;
    Ok(signed_in)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::gateway::{
        testing::{Call, ScriptedGateway},
        types::LoginResponse,
    };
    use std::io::Cursor;

    fn args(portal: Portal, prefs: PathBuf) -> Args {
        Args {
            globals: GlobalArgs::new("http://127.0.0.1:5000".to_string(), 10),
            portal,
            id: None,
            password: None,
            remember: false,
            prefs: Some(prefs),
        }
    }

    fn success() -> LoginResponse {
        LoginResponse {
            success: true,
            redirect: Some("/teacher/teacher_dashboard.html".to_string()),
            name: Some("Rudo".to_string()),
            ..LoginResponse::default()
        }
    }

    #[tokio::test]
    async fn teacher_remember_me_round_trip() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("prefs.json");
        let gateway = ScriptedGateway::new().with_login(success()).with_login(success());

        let mut first = args(Portal::Teacher, path.clone());
        first.remember = true;
        let mut terminal = Terminal::new(Cursor::new(b"T7\npw\n".to_vec()), Vec::new());
        run(&gateway, first, &mut terminal).await?;
        assert_eq!(Prefs::load(&path)?.remembered_teacher(), Some("T7"));

        // Blank id line takes the remembered id.
        let mut terminal = Terminal::new(Cursor::new(b"\npw\n".to_vec()), Vec::new());
        let signed_in = run(&gateway, args(Portal::Teacher, path), &mut terminal).await?;
        assert_eq!(signed_in.id, "T7");
        let out = String::from_utf8(terminal.into_output())?;
        assert!(out.contains("Teacher ID [T7]: "));
        assert!(out.contains("Welcome, Rudo!"));

        assert_eq!(
            gateway.calls(),
            vec![
                Call::TeacherLogin {
                    teacher_id: "T7".to_string(),
                    password: "pw".to_string()
                };
                2
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn admin_rejection_is_an_error() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let gateway = ScriptedGateway::new().with_login(LoginResponse {
            success: false,
            message: Some("Admin ID not found".to_string()),
            ..LoginResponse::default()
        });

        let mut login = args(Portal::Admin, dir.path().join("prefs.json"));
        login.id = Some("root".to_string());
        login.password = Some(SecretString::from("pw".to_string()));
        let mut terminal = Terminal::new(Cursor::new(Vec::new()), Vec::new());

        let err = run(&gateway, login, &mut terminal).await.unwrap_err();
        assert_eq!(err.to_string(), "Admin ID not found");
        assert!(!dir.path().join("prefs.json").exists());
        Ok(())
    }
}
