//! # Console Output Policy
//!
//! Decides whether status lines carry color and emoji markers. The policy
//! combines the `--color` flag with the conventional environment switches;
//! the flag wins over the environment, the environment wins over terminal
//! detection.
//!
//! Recognized switches in auto mode:
//! - `NO_COLOR` set (even empty) disables markers (<https://no-color.org/>)
//! - `CLICOLOR=0` disables, `CLICOLOR_FORCE` set and nonzero forces them on
//! - `TERM=dumb` disables
//! - otherwise the terminal decides (`console` crate detection)

use std::env;

/// The three states of the `--color` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    Always,
    Never,
    #[default]
    Auto,
}

impl ColorMode {
    /// Parse the raw flag value; anything unrecognized falls back to auto.
    pub fn parse(flag: &str) -> ColorMode {
        match flag.to_lowercase().as_str() {
            "always" => ColorMode::Always,
            "never" => ColorMode::Never,
            _ => ColorMode::Auto,
        }
    }
}

/// Resolved output policy for one command run.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    use_color: bool,
}

impl OutputConfig {
    pub fn new(mode: ColorMode) -> OutputConfig {
        let use_color = match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => terminal_wants_color(),
        };
        OutputConfig { use_color }
    }

    /// Resolve directly from the raw `--color` flag value.
    pub fn from_flag(flag: &str) -> OutputConfig {
        OutputConfig::new(ColorMode::parse(flag))
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// The emoji marker when color is on, the bracketed fallback otherwise.
    ///
    /// Status lines spell both forms:
    /// `config.marker("📦", "[INDEX]")`.
    pub fn marker<'a>(&self, symbol: &'a str, fallback: &'a str) -> &'a str {
        if self.use_color {
            symbol
        } else {
            fallback
        }
    }
}

impl Default for OutputConfig {
    fn default() -> OutputConfig {
        OutputConfig::new(ColorMode::Auto)
    }
}

fn terminal_wants_color() -> bool {
    // NO_COLOR disables by its mere presence.
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
        return false;
    }
    if env::var("CLICOLOR_FORCE").is_ok_and(|v| !v.is_empty() && v != "0") {
        return true;
    }
    if env::var("TERM").is_ok_and(|v| v == "dumb") {
        return false;
    }
    console::Term::stdout().features().colors_supported()
}
