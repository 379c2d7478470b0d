pub mod logging;
pub mod portal;
pub mod results;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    value_parser, Arg, ColorChoice, Command,
};

pub const ARG_URL: &str = "url";
pub const ARG_TIMEOUT: &str = "timeout";

pub const DEFAULT_URL: &str = "http://127.0.0.1:5000";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("schoolgate")
        .about("School portal client")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_URL)
                .short('u')
                .long("url")
                .help("Portal base URL")
                .default_value(DEFAULT_URL)
                .env("SCHOOLGATE_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .short('t')
                .long("timeout")
                .help("Request timeout in seconds, 0 disables it")
                .default_value("10")
                .env("SCHOOLGATE_TIMEOUT")
                .global(true)
                .value_parser(value_parser!(u64)),
        )
        .subcommand(portal::student())
        .subcommand(portal::admin())
        .subcommand(portal::teacher())
        .subcommand(portal::students())
        .subcommand(portal::teachers())
        .subcommand(results::results())
        .subcommand(results::grade())
        .subcommand(results::stats());

    logging::with_args(command)
}
