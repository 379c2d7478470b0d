pub mod actions;
pub mod commands;
pub mod dispatch;
pub mod globals;
pub mod prefs;
pub mod telemetry;
pub mod terminal;

mod start;
pub use self::start::start;
