//! # Completions Command Implementation
//!
//! Generates shell completion scripts with `clap_complete`. The script is
//! written to stdout so it can be redirected to wherever the shell expects
//! completions:
//!
//! ```bash
//! distro-build completions bash > ~/.local/share/bash-completion/completions/distro-build
//! distro-build completions zsh > ~/.zfunc/_distro-build
//! distro-build completions fish > ~/.config/fish/completions/distro-build.fish
//! ```

use std::io;

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use crate::cli::Cli;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the `completions` command.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    generate(args.shell, &mut cmd, "distro-build", &mut io::stdout());
    Ok(())
}
