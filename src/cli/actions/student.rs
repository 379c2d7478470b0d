use crate::{
    cli::{globals::GlobalArgs, terminal::Terminal},
    gateway::Gateway,
    wizard::{Controller, Outcome, Step},
};
use anyhow::{bail, Result};
use secrecy::{ExposeSecret, SecretString};
use std::io::{BufRead, Write};
use tracing::debug;

pub const CMD_BACK: &str = ":back";
pub const CMD_FORGOT: &str = ":forgot";
pub const CMD_QUIT: &str = ":quit";

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub student_id: Option<String>,
    pub password: Option<SecretString>,
}

/// Runs the wizard on stdin/stdout.
///
/// # Errors
/// Returns an error if the gateway cannot be built, the terminal fails, or
/// the wizard ends without a successful login.
pub async fn execute(args: Args) -> Result<()> {
    let gateway = args.globals.gateway()?;
    let (redirect, _) = run(gateway, args.student_id, args.password, Terminal::stdio()).await?;
    match redirect {
        Some(target) => {
            debug!("student dashboard: {target}");
            Ok(())
        }
        None => bail!("student login not completed"),
    }
}

fn copy(secret: &SecretString) -> SecretString {
    SecretString::from(secret.expose_secret().to_string())
}

/// Drives the wizard until login succeeds, input ends or the user quits.
/// Preset values are used once; later attempts are prompted.
///
/// # Errors
/// Returns an error if the terminal cannot be read or written.
pub async fn run<G, R, W>(
    gateway: G,
    mut student_id: Option<String>,
    mut password: Option<SecretString>,
    terminal: Terminal<R, W>,
) -> Result<(Option<String>, Terminal<R, W>)>
where
    G: Gateway,
    R: BufRead,
    W: Write,
{
    let mut controller = Controller::new(gateway, terminal);
    let mut redirect = None;

    while !controller.session().is_finished() {
        match controller.session().step() {
            Step::Identify => {
                let input = match student_id.take() {
                    Some(id) => id,
                    None => {
                        let prefill = controller.session().student_id().to_string();
                        match controller.view_mut().prompt("Student ID", Some(&prefill))? {
                            Some(line) => line,
                            None => break,
                        }
                    }
                };
                if input.trim() == CMD_QUIT {
                    break;
                }
                controller.identify(&input).await;
            }
            Step::SetPassword => {
                let (new_password, confirmation) = if let Some(preset) = password.as_ref() {
                    (copy(preset), copy(preset))
                } else {
                    let terminal = controller.view_mut();
                    terminal.say(&format!("Type {CMD_BACK} to change the Student ID."))?;
                    let Some(new_password) = terminal.prompt_secret("New password")? else {
                        break;
                    };
                    match new_password.expose_secret().trim() {
                        CMD_BACK => {
                            controller.back()?;
                            continue;
                        }
                        CMD_QUIT => break,
                        _ => {}
                    }
                    let Some(confirmation) =
                        controller.view_mut().prompt_secret("Confirm password")?
                    else {
                        break;
                    };
                    (new_password, confirmation)
                };

                controller.password_changed(&new_password, &confirmation);
                controller
                    .create_password(&new_password, &confirmation)
                    .await;
                if controller.session().step() == Step::SetPassword {
                    // Rejected presets fall back to prompting.
                    password = None;
                }
            }
            Step::Authenticate => {
                let secret = match password.take() {
                    Some(preset) => preset,
                    None => {
                        let label = if controller.session().can_go_back() {
                            format!("Password ({CMD_FORGOT}, {CMD_BACK})")
                        } else {
                            format!("Password ({CMD_FORGOT})")
                        };
                        match controller.view_mut().prompt_secret(&label)? {
                            Some(secret) => secret,
                            None => break,
                        }
                    }
                };
                match secret.expose_secret().trim() {
                    CMD_FORGOT => controller.forgot_password(),
                    CMD_QUIT => break,
                    CMD_BACK => {
                        if let Err(err) = controller.back() {
                            controller.view_mut().say(&format!("error: {err}"))?;
                        }
                    }
                    _ => {
                        if let Some(Outcome::Completed { redirect: target }) =
                            controller.login(&secret).await
                        {
                            redirect = Some(target);
                        }
                    }
                }
            }
        }
    }

    let (_, _, terminal) = controller.into_parts();
    Ok((redirect, terminal))
}
