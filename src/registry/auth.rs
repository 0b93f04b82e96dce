//! Identity token acquisition
//!
//! The registry token exchange needs a Google identity token. By default it is
//! printed by `gcloud auth print-access-token`; any command with the same
//! contract (token on stdout, nothing on stderr) can be substituted.

use crate::error::{PrunerError, Result};
use crate::logging::Logger;
use async_trait::async_trait;
use tokio::process::Command;

/// Source of the identity token presented to the registry token endpoint
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn identity_token(&self) -> Result<String>;
}

/// Runs an external command and reads the token from its stdout
#[derive(Debug, Clone)]
pub struct CommandCredentialSource {
    program: String,
    args: Vec<String>,
    output: Logger,
}

impl CommandCredentialSource {
    pub fn new(command: &[String], output: Logger) -> Result<Self> {
        let (program, args) = command.split_first().ok_or_else(|| {
            PrunerError::Configuration("Token command cannot be empty".to_string())
        })?;

        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            output,
        })
    }

    fn display_command(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl CredentialSource for CommandCredentialSource {
    async fn identity_token(&self) -> Result<String> {
        let command = self.display_command();
        self.output
            .verbose(&format!("Requesting identity token via `{}`", command));

        let result = Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
            .map_err(|e| PrunerError::Credential(format!("Failed to run `{}`: {}", command, e)))?;

        // Any diagnostic output is treated as failure, even with a zero exit status.
        let stderr = String::from_utf8_lossy(&result.stderr);
        if !stderr.trim().is_empty() {
            return Err(PrunerError::Credential(format!(
                "`{}` reported: {}",
                command,
                stderr.trim()
            )));
        }

        if !result.status.success() {
            return Err(PrunerError::Credential(format!(
                "`{}` exited with {}",
                command, result.status
            )));
        }

        let token = String::from_utf8(result.stdout)?.trim_end().to_string();
        if token.is_empty() {
            return Err(PrunerError::Credential(format!(
                "`{}` printed an empty token",
                command
            )));
        }

        self.output
            .detail(&format!("Identity token obtained (length: {} chars)", token.len()));
        Ok(token)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str) -> CommandCredentialSource {
        CommandCredentialSource {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            output: Logger::new(false),
        }
    }

    #[tokio::test]
    async fn reads_token_and_strips_newline() {
        let token = shell("echo ya29.token").identity_token().await.unwrap();
        assert_eq!(token, "ya29.token");
    }

    #[tokio::test]
    async fn stderr_output_is_fatal_even_on_success() {
        let err = shell("echo 'WARNING: update available' >&2; echo ya29.token")
            .identity_token()
            .await
            .unwrap_err();
        assert!(matches!(err, PrunerError::Credential(ref msg) if msg.contains("update available")));
    }

    #[tokio::test]
    async fn non_zero_exit_and_empty_token_are_fatal() {
        assert!(shell("exit 3").identity_token().await.is_err());
        assert!(shell("true").identity_token().await.is_err());
    }

    #[tokio::test]
    async fn missing_program_is_a_credential_error() {
        let source = CommandCredentialSource::new(
            &["definitely-not-a-real-binary-4242".to_string()],
            Logger::new(false),
        )
        .unwrap();
        assert!(matches!(
            source.identity_token().await,
            Err(PrunerError::Credential(_))
        ));
    }

    #[test]
    fn empty_command_is_rejected() {
        assert!(CommandCredentialSource::new(&[], Logger::new(false)).is_err());
    }
}
