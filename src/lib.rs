//! # Schoolgate (School Portal Client)
//!
//! `schoolgate` is the client side of a school management portal. It drives the
//! student enrollment/login wizard, the admin and teacher sign-in forms, and the
//! admin and teacher dashboards against the portal's JSON API.
//!
//! ## Student Wizard
//!
//! A three step flow: **Identify** (verify the student id), **Set Password**
//! (first visit only) and **Authenticate**. The state machine in [`wizard`] is
//! pure; it hands out request tickets and applies responses. The controller
//! wires it to an [`gateway::Gateway`] and a [`wizard::WizardView`] renderer.
//!
//! - **Skip:** A student who already has a password goes straight from Identify
//!   to Authenticate.
//! - **Ordering:** Every request carries a sequence number. A response older than
//!   the last accepted one is discarded, so overlapping submissions can never
//!   roll the session back.
//!
//! ## Gateway
//!
//! All outbound calls return a structured envelope, even when the transport
//! fails. A connection error or an unreadable body becomes
//! `{success: false, valid: false, message: "Network error..."}` so callers have a
//! single failure path.
//!
//! ## Dashboards
//!
//! Flat CRUD handlers: mutate, then re-fetch the table. The teacher dashboard
//! also owns grade banding and the "student verified" gate for result entry.

pub mod cli;
pub mod dashboard;
pub mod gateway;
pub mod wizard;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
