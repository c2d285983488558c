//! CLI subcommands that don't need the full server: shell completions and
//! configuration validation.

use clap::{Args, Command, ValueEnum};
use clap_complete::{Shell, generate};
use error::Result;
use server::{OtpFlowConfig, SmtpConfig};

use crate::config;

/// Arguments for the completions subcommand.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: ShellArg,
}

/// Supported shells.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ShellArg {
    Bash,
    Zsh,
    Fish,
    Elvish,
    Powershell,
}

impl From<ShellArg> for Shell {
    fn from(shell: ShellArg) -> Self {
        match shell {
            ShellArg::Bash => Shell::Bash,
            ShellArg::Zsh => Shell::Zsh,
            ShellArg::Fish => Shell::Fish,
            ShellArg::Elvish => Shell::Elvish,
            ShellArg::Powershell => Shell::PowerShell,
        }
    }
}

/// Write shell completions to stdout.
pub fn generate_completions(args: &CompletionsArgs, command: &mut Command) {
    let name = command.get_name().to_string();
    generate(Shell::from(args.shell), command, name, &mut std::io::stdout());
}

/// Check that every piece of configuration the server needs can be built.
///
/// # Errors
///
/// Returns the first configuration error encountered, so `janus validate`
/// fails loudly in a misconfigured environment.
pub fn validate() -> Result<()> {
    config::DatabaseConfig::from_env()?;
    config::token_config_from_env()?;
    config::sealing_key_from_env()?;
    SmtpConfig::from_env()?;
    OtpFlowConfig::reset_from_env()?;
    OtpFlowConfig::verification_from_env()?;

    println!("Configuration OK");
    Ok(())
}
