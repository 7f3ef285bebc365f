//! Launch parameters for STDIO MCP servers and their catalog fingerprint.

use super::ToolRegistryDomainError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Process launch settings for an MCP server hosted over STDIO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchSpec {
    command: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    env: BTreeMap<String, String>,
}

impl LaunchSpec {
    /// Creates a launch specification for `command` with no arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError::EmptyLaunchCommand`] when `command`
    /// is empty after trimming.
    pub fn new(command: impl Into<String>) -> Result<Self, ToolRegistryDomainError> {
        let normalized_command = command.into().trim().to_owned();
        if normalized_command.is_empty() {
            return Err(ToolRegistryDomainError::EmptyLaunchCommand);
        }

        Ok(Self {
            command: normalized_command,
            args: Vec::new(),
            env: BTreeMap::new(),
        })
    }

    /// Replaces command-line arguments.
    #[must_use]
    pub fn with_args<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = values.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces process environment variables.
    #[must_use]
    pub fn with_env(mut self, values: impl IntoIterator<Item = (String, String)>) -> Self {
        self.env = values.into_iter().collect();
        self
    }

    /// Returns the executable command.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Returns command-line arguments.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns environment variables.
    #[must_use]
    pub const fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Returns the catalog cache key for these launch parameters.
    ///
    /// The environment does not take part in the key.
    #[must_use]
    pub fn fingerprint(&self) -> CatalogFingerprint {
        CatalogFingerprint::from_launch(&self.command, &self.args)
    }
}

/// Deterministic cache key derived from a server's command and arguments.
///
/// Two servers launched identically share one fingerprint regardless of the
/// identifiers they were registered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogFingerprint(String);

impl CatalogFingerprint {
    /// Hashes `command:arg1:arg2...` into a lowercase hex SHA-256 digest.
    #[must_use]
    pub fn from_launch(command: &str, args: &[String]) -> Self {
        let mut material = String::from(command);
        material.push(':');
        material.push_str(&args.join(":"));
        Self(format!("{:x}", Sha256::digest(material.as_bytes())))
    }

    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalogFingerprint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
