//! Units of probing work and their execution.

use crate::http::client::{Probe, TransportError};
use crate::scanner::classify::{classify_plugin, LoginClassifier, LoginVerdict, PluginVerdict};
use crate::scanner::fingerprint;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// A unit of probing work. Constructed fully up front, immutable once
/// enqueued; consumed by exactly one worker, which emits the outcome as a
/// single log record.
#[derive(Debug, Clone)]
pub struct Task {
    base_url: Url,
    script_path: String,
    kind: TaskKind,
}

#[derive(Debug, Clone)]
pub enum TaskKind {
    Fingerprint,
    PluginCheck { plugin: String },
    Login { username: String, password: String },
}

impl Task {
    pub fn fingerprint(base_url: Url, script_path: &str) -> Self {
        Self {
            base_url,
            script_path: script_path.to_string(),
            kind: TaskKind::Fingerprint,
        }
    }

    pub fn plugin_check(base_url: Url, script_path: &str, plugin: &str) -> Self {
        Self {
            base_url,
            script_path: script_path.to_string(),
            kind: TaskKind::PluginCheck {
                plugin: plugin.to_string(),
            },
        }
    }

    pub fn login(base_url: Url, script_path: &str, username: &str, password: &str) -> Self {
        Self {
            base_url,
            script_path: script_path.to_string(),
            kind: TaskKind::Login {
                username: username.to_string(),
                password: password.to_string(),
            },
        }
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn login_url(&self) -> Url {
        // the join is validated at Config construction time
        self.base_url
            .join(&self.script_path)
            .unwrap_or_else(|_| self.base_url.clone())
    }

    fn plugin_url(&self, plugin: &str) -> Url {
        self.base_url
            .join(&format!("wp-content/plugins/{plugin}/"))
            .unwrap_or_else(|_| self.base_url.clone())
    }
}

/// Classified result of executing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    LoginSuccess { username: String, password: String },
    LoginFailure { username: String, password: String },
    /// No signature matched; counted as a failure.
    LoginAmbiguous { username: String },
    LockedOut,
    PluginDetected { plugin: String },
    PluginAbsent { plugin: String },
    Version(String),
    VersionUnknown,
    /// The exchange itself failed; the task is inconclusive.
    Transport(TransportError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Stop(StopReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A protective mechanism answered; further attempts are useless.
    ProtectionActive,
    /// A valid credential was found and the run is configured to stop.
    CredentialFound,
}

impl Outcome {
    pub fn control(&self, stop_on_success: bool) -> Control {
        match self {
            Outcome::LockedOut => Control::Stop(StopReason::ProtectionActive),
            Outcome::LoginSuccess { .. } if stop_on_success => {
                Control::Stop(StopReason::CredentialFound)
            }
            _ => Control::Continue,
        }
    }
}

/// Form fields wp-login.php expects.
pub fn login_form(username: &str, password: &str) -> Vec<(String, String)> {
    vec![
        ("log".to_string(), username.to_string()),
        ("pwd".to_string(), password.to_string()),
        ("wp-submit".to_string(), "Log In".to_string()),
        ("testcookie".to_string(), "1".to_string()),
    ]
}

/// Executes tasks against the probe client and classifies what comes
/// back. Shared by every worker in the pool.
pub struct TaskRunner {
    probe: Arc<dyn Probe>,
    classifier: Arc<dyn LoginClassifier>,
    stop_on_success: bool,
}

impl TaskRunner {
    pub fn new(
        probe: Arc<dyn Probe>,
        classifier: Arc<dyn LoginClassifier>,
        stop_on_success: bool,
    ) -> Self {
        Self {
            probe,
            classifier,
            stop_on_success,
        }
    }

    pub async fn run(&self, task: &Task) -> Control {
        let outcome = self.execute(task).await;
        log_outcome(&outcome);
        outcome.control(self.stop_on_success)
    }

    pub async fn execute(&self, task: &Task) -> Outcome {
        match task.kind() {
            TaskKind::Fingerprint => match self.probe.get(task.base_url()).await {
                Ok(response) => match fingerprint::extract_version(&response) {
                    Some(version) => Outcome::Version(version),
                    None => Outcome::VersionUnknown,
                },
                Err(err) => Outcome::Transport(err),
            },
            TaskKind::PluginCheck { plugin } => {
                match self.probe.get(&task.plugin_url(plugin)).await {
                    Ok(response) => match classify_plugin(&response) {
                        PluginVerdict::Detected => Outcome::PluginDetected {
                            plugin: plugin.clone(),
                        },
                        PluginVerdict::NotDetected | PluginVerdict::Ambiguous => {
                            Outcome::PluginAbsent {
                                plugin: plugin.clone(),
                            }
                        }
                    },
                    Err(err) => Outcome::Transport(err),
                }
            }
            TaskKind::Login { username, password } => {
                let fields = login_form(username, password);
                match self.probe.post_form(&task.login_url(), &fields).await {
                    Ok(response) => match self.classifier.classify(&response) {
                        LoginVerdict::Success => Outcome::LoginSuccess {
                            username: username.clone(),
                            password: password.clone(),
                        },
                        LoginVerdict::Failure => Outcome::LoginFailure {
                            username: username.clone(),
                            password: password.clone(),
                        },
                        LoginVerdict::LockedOut => Outcome::LockedOut,
                        LoginVerdict::Ambiguous => Outcome::LoginAmbiguous {
                            username: username.clone(),
                        },
                    },
                    Err(err) => Outcome::Transport(err),
                }
            }
        }
    }
}

fn log_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::LoginSuccess { username, password } => {
            info!("valid credentials: {}:{}", username, password);
        }
        Outcome::LoginFailure { username, password } => {
            debug!("login failed: {}:{}", username, password);
        }
        Outcome::LoginAmbiguous { username } => {
            warn!(
                "unrecognized login response for {}, counting as failure",
                username
            );
        }
        Outcome::LockedOut => {
            warn!("lockout signature in login response");
        }
        Outcome::PluginDetected { plugin } => {
            info!("plugin found: {}", plugin);
        }
        Outcome::PluginAbsent { plugin } => {
            debug!("plugin not found: {}", plugin);
        }
        Outcome::Version(version) => {
            info!("WordPress version: {}", version);
        }
        Outcome::VersionUnknown => {
            info!("WordPress version could not be determined");
        }
        Outcome::Transport(err) => {
            warn!("task inconclusive: {}", err);
        }
    }
}
