use thiserror::Error;

/// Process exit code used when no chip is available.
pub const EXIT_CODE_NO_FREE_CHIP: i32 = 2;

#[derive(Debug, Error)]
pub enum ChipstatError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error(
        "`{0}` command not found, load the Slurm environment (e.g. the slurm-singularity module) first"
    )]
    MissingTool(String),
    #[error("There is no free chip available")]
    NoFreeChip,
    #[error("User `{user}` is not part of reservation `{reservation}`")]
    UserNotInReservation { user: String, reservation: String },
}

impl ChipstatError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ChipstatError::NoFreeChip => EXIT_CODE_NO_FREE_CHIP,
            _ => 1,
        }
    }
}

/// Exit code for an error returned from a command.
pub fn exit_code_of(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<ChipstatError>()
        .map(|e| e.exit_code())
        .unwrap_or(1)
}

impl From<serde_json::error::Error> for ChipstatError {
    fn from(e: serde_json::error::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

impl From<serde_yaml::Error> for ChipstatError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::DeserializationError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{ChipstatError, EXIT_CODE_NO_FREE_CHIP, exit_code_of};

    #[test]
    fn test_exit_code_no_free_chip() {
        let error: anyhow::Error = ChipstatError::NoFreeChip.into();
        assert_eq!(exit_code_of(&error), EXIT_CODE_NO_FREE_CHIP);
    }

    #[test]
    fn test_exit_code_generic() {
        let error = anyhow::anyhow!("scontrol failed");
        assert_eq!(exit_code_of(&error), 1);

        let error: anyhow::Error = ChipstatError::UserNotInReservation {
            user: "alice".to_string(),
            reservation: "maintenance".to_string(),
        }
        .into();
        assert_eq!(exit_code_of(&error), 1);
    }

    #[test]
    fn test_missing_tool_message() {
        let error = ChipstatError::MissingTool("sacct".to_string());
        assert!(error.to_string().starts_with("`sacct` command not found"));
    }
}
