//! Secret references.
//!
//! The API key in `config.toml` is normally a reference rather than the key
//! itself:
//!
//! - `pass::path/in/store` - first line of `pass show path/in/store`
//! - `env::VAR_NAME` - the value of `$VAR_NAME`
//! - anything else - the literal value
//!
//! References are resolved when the client starts and again whenever the
//! holiday service asks for a fresh key.

use std::fmt;

/// A parsed secret reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretRef {
    /// An entry in the `pass` password store.
    Pass(String),
    /// An environment variable.
    Env(String),
    /// A literal value.
    Plain(String),
}

impl SecretRef {
    /// Parses a configuration value.
    pub fn parse(value: &str) -> Self {
        if let Some(path) = value.strip_prefix("pass::") {
            Self::Pass(path.to_string())
        } else if let Some(var) = value.strip_prefix("env::") {
            Self::Env(var.to_string())
        } else {
            Self::Plain(value.to_string())
        }
    }

    /// Resolves the reference to the secret value.
    pub fn resolve(&self) -> Result<String, String> {
        match self {
            Self::Pass(path) => resolve_pass(path),
            Self::Env(var) => {
                std::env::var(var).map_err(|_| format!("environment variable `{}` is not set", var))
            }
            Self::Plain(value) => Ok(value.clone()),
        }
    }

    /// Returns true for a literal value.
    pub fn is_plain(&self) -> bool {
        matches!(self, Self::Plain(_))
    }
}

/// Shows where the secret comes from without revealing a literal value.
impl fmt::Display for SecretRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass(path) => write!(f, "pass::{}", path),
            Self::Env(var) => write!(f, "env::{}", var),
            Self::Plain(_) => f.write_str("<inline value>"),
        }
    }
}

/// Resolves a configuration value that may be a secret reference.
pub fn resolve(value: &str) -> Result<String, String> {
    SecretRef::parse(value).resolve()
}

/// Runs `pass show <path>` and returns the first line of stdout.
fn resolve_pass(path: &str) -> Result<String, String> {
    let output = std::process::Command::new("pass")
        .arg("show")
        .arg(path)
        .output()
        .map_err(|e| format!("failed to run `pass show {}`: {}", path, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "`pass show {}` failed (exit {}): {}",
            path,
            output.status,
            stderr.trim()
        ));
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(str::to_string)
        .ok_or_else(|| format!("`pass show {}` produced no output", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_prefixes() {
        assert_eq!(
            SecretRef::parse("pass::rapidapi/holidays"),
            SecretRef::Pass("rapidapi/holidays".to_string())
        );
        assert_eq!(
            SecretRef::parse("env::RAPIDAPI_KEY"),
            SecretRef::Env("RAPIDAPI_KEY".to_string())
        );
        assert!(SecretRef::parse("abc123").is_plain());
        assert!(SecretRef::parse("").is_plain());
    }

    #[test]
    fn display_hides_literal_values() {
        assert_eq!(SecretRef::parse("abc123").to_string(), "<inline value>");
        assert_eq!(SecretRef::parse("env::KEY").to_string(), "env::KEY");
        assert_eq!(SecretRef::parse("pass::a/b").to_string(), "pass::a/b");
    }

    #[test]
    fn plain_text_passthrough() {
        assert_eq!(resolve("hello").unwrap(), "hello");
        assert_eq!(resolve("").unwrap(), "");
    }

    #[test]
    fn env_prefix_resolves() {
        unsafe {
            std::env::set_var("_FAMCAL_TEST_SECRET", "my-secret-value");
        }
        assert_eq!(resolve("env::_FAMCAL_TEST_SECRET").unwrap(), "my-secret-value");
        unsafe {
            std::env::remove_var("_FAMCAL_TEST_SECRET");
        }
    }

    #[test]
    fn env_prefix_missing_var_errors() {
        let err = resolve("env::_FAMCAL_NONEXISTENT_VAR_12345").unwrap_err();
        assert!(err.contains("not set"));
    }

    #[test]
    fn pass_prefix_unknown_entry_errors() {
        // Fails whether or not `pass` is installed.
        assert!(resolve("pass::nonexistent/famcal/entry/12345").is_err());
    }
}
