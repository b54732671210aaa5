use std::env;
use std::path::Path;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// How a provider's availability is decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCheck {
    /// Available when the variable is set to a non-blank value.
    EnvVar(String),
    /// Available when an executable with this name is on `PATH`.
    Command(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSpec {
    pub id: String,
    pub name: String,
    pub check: ProviderCheck,
}

impl ProviderSpec {
    pub fn new(id: &str, name: &str, check: ProviderCheck) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            check,
        }
    }

    pub fn evaluate(&self) -> ProviderStatus {
        let reason = match &self.check {
            ProviderCheck::EnvVar(var) => {
                let set = env::var(var).map(|v| !v.trim().is_empty()).unwrap_or(false);
                (!set).then(|| format!("{var} is not set"))
            }
            ProviderCheck::Command(bin) => {
                (!command_on_path(bin)).then(|| format!("{bin} not found on PATH"))
            }
        };
        ProviderStatus {
            id: self.id.clone(),
            name: self.name.clone(),
            available: reason.is_none(),
            reason,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderStatus {
    pub id: String,
    pub name: String,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

pub fn default_providers() -> Vec<ProviderSpec> {
    vec![
        ProviderSpec::new("anthropic", "Anthropic API", ProviderCheck::EnvVar("ANTHROPIC_API_KEY".into())),
        ProviderSpec::new("openai", "OpenAI API", ProviderCheck::EnvVar("OPENAI_API_KEY".into())),
        ProviderSpec::new("claude-cli", "Claude Code CLI", ProviderCheck::Command("claude".into())),
        ProviderSpec::new("codex-cli", "Codex CLI", ProviderCheck::Command("codex".into())),
    ]
}

fn command_on_path(bin: &str) -> bool {
    let Some(paths) = env::var_os("PATH") else {
        return false;
    };
    env::split_paths(&paths).any(|dir| {
        let candidate = dir.join(bin);
        if is_executable(&candidate) {
            return true;
        }
        cfg!(windows) && is_executable(&candidate.with_extension("exe"))
    })
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderListMode {
    /// Serve the cached evaluation while it is fresh.
    Routine,
    /// Re-evaluate every provider and replace the cache.
    Refresh,
}

struct CachedEvaluation {
    at: Instant,
    statuses: Vec<ProviderStatus>,
}

pub struct ProviderRegistry {
    specs: Vec<ProviderSpec>,
    ttl: Duration,
    cache: RwLock<Option<CachedEvaluation>>,
}

impl ProviderRegistry {
    pub fn new(specs: Vec<ProviderSpec>, ttl: Duration) -> Self {
        Self {
            specs,
            ttl,
            cache: RwLock::new(None),
        }
    }

    pub async fn list(&self, mode: ProviderListMode) -> Vec<ProviderStatus> {
        if mode == ProviderListMode::Routine {
            if let Some(cached) = self.cache.read().await.as_ref() {
                if cached.at.elapsed() < self.ttl {
                    return cached.statuses.clone();
                }
            }
        }

        let statuses: Vec<ProviderStatus> = self.specs.iter().map(ProviderSpec::evaluate).collect();
        let unavailable = statuses.iter().filter(|s| !s.available).count();
        tracing::debug!(?mode, providers = statuses.len(), unavailable, "evaluated providers");

        *self.cache.write().await = Some(CachedEvaluation {
            at: Instant::now(),
            statuses: statuses.clone(),
        });
        statuses
    }
}
