use ctxpack_utils::error::{ConfigError, CtxpackError};

use super::Config;

impl Config {
    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns a configuration error if an artifact name is not a plain
    /// file name, two artifacts share a name, or an exclusion addition is
    /// invalid.
    pub fn validate(&self) -> Result<(), CtxpackError> {
        let artifacts = [
            ("output_file", &self.output_file),
            ("names_file", &self.names_file),
            ("replay_output_file", &self.replay_output_file),
        ];

        for (key, name) in artifacts {
            validate_artifact_name(key, name)?;
        }

        for (i, (key, name)) in artifacts.iter().enumerate() {
            if let Some((other, _)) = artifacts[i + 1..].iter().find(|(_, n)| n == name) {
                return Err(CtxpackError::Config(ConfigError::InvalidValue {
                    key: (*key).to_string(),
                    value: format!("'{name}' is also used for {other}"),
                }));
            }
        }

        self.exclusions.validate()
    }
}

/// An artifact name must be a single file name inside the root
fn validate_artifact_name(key: &str, name: &str) -> Result<(), CtxpackError> {
    let problem = if name.trim().is_empty() {
        Some("must not be empty")
    } else if name.contains('/') || name.contains('\\') {
        Some("must be a file name without path separators")
    } else if name == "." || name == ".." {
        Some("must name a file")
    } else {
        None
    };

    match problem {
        Some(reason) => Err(CtxpackError::Config(ConfigError::InvalidValue {
            key: key.to_string(),
            value: format!("'{name}' {reason}"),
        })),
        None => Ok(()),
    }
}
