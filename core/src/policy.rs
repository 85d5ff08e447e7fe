use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::Result;

/// Read/write policy for mediated filesystem access. Defaults are the most
/// restrictive settings; configuration can only open access up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AccessPolicy {
    #[serde(default)]
    pub read_anywhere: bool,
    #[serde(default)]
    pub read_dotfiles: bool,
    #[serde(default)]
    pub write_anywhere: bool,
    #[serde(default)]
    pub write_dotfiles: bool,
    /// File-name suffixes that may never be written, compared
    /// case-insensitively in order.
    #[serde(default)]
    pub prohibited_write_extensions: Vec<String>,
}

/// Overrides that force a policy to be stricter than the ambient
/// configuration. Strictness rewrites policy values only; it never changes
/// how a validator judges paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// Use the configured policy as-is.
    #[default]
    Ambient,
    /// Force write locations and write dotfiles to the most restrictive
    /// settings; reads keep the configured policy.
    RestrictedWrite,
    /// Force all four policy booleans to the most restrictive settings.
    Restricted,
}

impl Strictness {
    pub fn apply(self, policy: &AccessPolicy) -> AccessPolicy {
        let mut effective = policy.clone();
        match self {
            Strictness::Ambient => {}
            Strictness::RestrictedWrite => {
                effective.write_anywhere = false;
                effective.write_dotfiles = false;
            }
            Strictness::Restricted => {
                effective.read_anywhere = false;
                effective.read_dotfiles = false;
                effective.write_anywhere = false;
                effective.write_dotfiles = false;
            }
        }
        effective
    }
}

/// Engine-run parameters consumed from configuration, resolved once before
/// first use and fixed for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Anchor for relative paths. Must be absolute.
    pub working_directory: PathBuf,
    /// Primary output location, when configured. Relative values are
    /// anchored at the working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<PathBuf>,
    /// Location tried when the primary output location is unusable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_fallback_directory: Option<PathBuf>,
    #[serde(default)]
    pub access: AccessPolicy,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        const MAX_EXTENSIONS: usize = 1024;

        if !self.working_directory.is_absolute() {
            return Err(Error::InvalidConfig(format!(
                "working_directory must be absolute, got \"{}\"",
                self.working_directory.display()
            )));
        }

        let extensions = &self.access.prohibited_write_extensions;
        if extensions.len() > MAX_EXTENSIONS {
            return Err(Error::InvalidConfig(format!(
                "access.prohibited_write_extensions has too many entries (max {MAX_EXTENSIONS})"
            )));
        }
        for (idx, ext) in extensions.iter().enumerate() {
            if ext.is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "access.prohibited_write_extensions[{idx}] must be non-empty"
                )));
            }
            if ext.contains('/') || ext.contains('\\') {
                return Err(Error::InvalidConfig(format!(
                    "access.prohibited_write_extensions[{idx}] must not contain path separators"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> EngineConfig {
        EngineConfig {
            working_directory: PathBuf::from("/work"),
            output_directory: None,
            output_fallback_directory: None,
            access: AccessPolicy::default(),
        }
    }

    #[test]
    fn default_policy_is_fully_restrictive() {
        let policy = AccessPolicy::default();
        assert!(!policy.read_anywhere);
        assert!(!policy.read_dotfiles);
        assert!(!policy.write_anywhere);
        assert!(!policy.write_dotfiles);
        assert!(policy.prohibited_write_extensions.is_empty());
    }

    #[test]
    fn strictness_restricted_forces_all_booleans_false() {
        let open = AccessPolicy {
            read_anywhere: true,
            read_dotfiles: true,
            write_anywhere: true,
            write_dotfiles: true,
            prohibited_write_extensions: vec![".bat".to_string()],
        };

        let effective = Strictness::Restricted.apply(&open);
        assert!(!effective.read_anywhere);
        assert!(!effective.read_dotfiles);
        assert!(!effective.write_anywhere);
        assert!(!effective.write_dotfiles);
        assert_eq!(effective.prohibited_write_extensions, vec![".bat"]);
    }

    #[test]
    fn strictness_restricted_write_keeps_read_policy() {
        let open = AccessPolicy {
            read_anywhere: true,
            read_dotfiles: true,
            write_anywhere: true,
            write_dotfiles: true,
            prohibited_write_extensions: Vec::new(),
        };

        let effective = Strictness::RestrictedWrite.apply(&open);
        assert!(effective.read_anywhere);
        assert!(effective.read_dotfiles);
        assert!(!effective.write_anywhere);
        assert!(!effective.write_dotfiles);
    }

    #[test]
    fn validate_rejects_relative_working_directory() {
        let config = EngineConfig {
            working_directory: PathBuf::from("work"),
            ..base_config()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn validate_rejects_empty_extension() {
        let mut config = base_config();
        config.access.prohibited_write_extensions = vec![String::new()];
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn validate_rejects_extension_with_separator() {
        let mut config = base_config();
        config.access.prohibited_write_extensions = vec!["a/b".to_string()];
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"working_directory": "/work"}"#).expect("config");
        assert_eq!(config.working_directory, PathBuf::from("/work"));
        assert!(config.output_directory.is_none());
        assert!(config.output_fallback_directory.is_none());
        assert!(!config.access.read_anywhere);
    }
}
