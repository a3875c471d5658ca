//! Configuration loading and directory seeding.
//!
//! A config file can replace the built-in accounts, preload tests for
//! teachers, and switch on directory edits for administrators.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::account::{Account, Credentials, Role};
use crate::directory::Directory;
use crate::error::ConfigError;
use crate::model::{Question, Test};
use crate::session::SessionConfig;

/// Top-level examgate configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamgateConfig {
    /// Let administrators actually add and remove accounts.
    #[serde(default)]
    pub admin_edits_directory: bool,
    /// Accounts to register at startup. Empty means the built-in seed accounts.
    #[serde(default)]
    pub accounts: Vec<AccountSeed>,
}

/// One account to register at startup.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccountSeed {
    pub username: String,
    pub password: String,
    pub role: String,
    /// Tests owned by this account; teachers only.
    #[serde(default)]
    pub tests: Vec<TestSeed>,
}

impl std::fmt::Debug for AccountSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountSeed")
            .field("username", &self.username)
            .field("password", &"***")
            .field("role", &self.role)
            .field("tests", &self.tests)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSeed {
    pub name: String,
    #[serde(default)]
    pub questions: Vec<QuestionSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionSeed {
    pub prompt: String,
    pub answer: String,
}

impl ExamgateConfig {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            admin_edits_directory: self.admin_edits_directory,
        }
    }

    /// Build the startup directory from the configured accounts.
    pub fn build_directory(&self) -> Result<Directory, ConfigError> {
        if self.accounts.is_empty() {
            return Ok(Directory::seeded());
        }

        let mut directory = Directory::new();
        for seed in &self.accounts {
            let role: Role = seed.role.parse()?;
            let mut account = Account::with_role(
                role,
                Credentials::new(seed.username.clone(), seed.password.clone()),
            );

            if !seed.tests.is_empty() {
                let teacher =
                    account
                        .as_teacher_mut()
                        .ok_or_else(|| ConfigError::TestsOnNonTeacher {
                            username: seed.username.clone(),
                            role: role.to_string(),
                        })?;
                for test_seed in &seed.tests {
                    let mut test = Test::new(test_seed.name.clone());
                    for q in &test_seed.questions {
                        test.add_question(Question::new(q.prompt.clone(), q.answer.clone()));
                    }
                    teacher.push_test(test);
                }
            }

            directory.insert(account);
        }
        Ok(directory)
    }
}

/// A warning from config validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The account the warning is about (if applicable).
    pub username: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Check a config for issues that do not stop a session from starting.
pub fn validate_config(config: &ExamgateConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let warn = |username: &str, message: String| ValidationWarning {
        username: Some(username.to_string()),
        message,
    };

    let mut seen = HashSet::new();
    for seed in &config.accounts {
        if !seen.insert(seed.username.as_str()) {
            warnings.push(warn(
                &seed.username,
                format!("duplicate username: {}", seed.username),
            ));
        }
    }

    for seed in &config.accounts {
        if seed.username.trim().is_empty() || seed.password.trim().is_empty() {
            warnings.push(warn(&seed.username, "username or password is empty".into()));
        }

        match seed.role.parse::<Role>() {
            Err(e) => warnings.push(warn(&seed.username, e.to_string())),
            Ok(role) if role != Role::Teacher && !seed.tests.is_empty() => {
                warnings.push(warn(&seed.username, format!("{role} accounts cannot own tests")));
            }
            Ok(_) => {}
        }

        let mut test_names = HashSet::new();
        for test in &seed.tests {
            if !test_names.insert(test.name.as_str()) {
                warnings.push(warn(
                    &seed.username,
                    format!("duplicate test name: {}", test.name),
                ));
            }
            if test.questions.is_empty() {
                warnings.push(warn(
                    &seed.username,
                    format!("test '{}' has no questions", test.name),
                ));
            }
        }
    }

    if !config.accounts.is_empty()
        && !config
            .accounts
            .iter()
            .any(|a| matches!(a.role.parse::<Role>(), Ok(Role::Administrator)))
    {
        warnings.push(ValidationWarning {
            username: None,
            message: "no administrator account; the session can only end with end of input"
                .into(),
        });
    }

    warnings
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied as-is and never scanned again. An unset
/// variable resolves to the empty string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        match std::env::var(var_name) {
            Ok(value) => result.push_str(&value),
            Err(_) => tracing::warn!("environment variable {var_name} is not set"),
        }
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a TOML string into a config (useful for testing).
pub fn parse_config_str(content: &str, source_path: &Path) -> Result<ExamgateConfig> {
    toml::from_str::<ExamgateConfig>(content)
        .with_context(|| format!("failed to parse config: {}", source_path.display()))
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `examgate.toml` in the current directory
/// 2. `~/.config/examgate/config.toml`
///
/// Environment variable override: `EXAMGATE_ADMIN_EDITS_DIRECTORY`.
pub fn load_config_from(path: Option<&Path>) -> Result<ExamgateConfig> {
    let mut config = if let Some(p) = path {
        if !p.exists() {
            anyhow::bail!("config file not found: {}", p.display());
        }
        read_config_file(p)?
    } else {
        let local = PathBuf::from("examgate.toml");
        if local.exists() {
            read_config_file(&local)?
        } else {
            match dirs_path().map(|home| home.join("config.toml")) {
                Some(global) if global.exists() => load_global_config(&global),
                _ => ExamgateConfig::default(),
            }
        }
    };

    if let Ok(value) = std::env::var("EXAMGATE_ADMIN_EDITS_DIRECTORY") {
        match parse_flag(&value) {
            Some(flag) => config.admin_edits_directory = flag,
            None => tracing::warn!("ignoring EXAMGATE_ADMIN_EDITS_DIRECTORY={value}"),
        }
    }

    for account in &mut config.accounts {
        account.password = resolve_env_vars(&account.password);
    }

    Ok(config)
}

fn read_config_file(path: &Path) -> Result<ExamgateConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config = parse_config_str(&content, path)?;
    tracing::info!("loaded config from {}", path.display());
    Ok(config)
}

/// The per-user config is optional; a broken one is skipped, not fatal.
fn load_global_config(path: &Path) -> ExamgateConfig {
    match read_config_file(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("skipping {}: {e:#}", path.display());
            ExamgateConfig::default()
        }
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("examgate"))
}
