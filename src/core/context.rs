//! Immutable run configuration, built once from the CLI.

use crate::cli::args::Cli;
use crate::wordlist::keywords::KeywordFilter;
use anyhow::Context as _;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Tokens that pollute keyword extraction on most pages: protocol and
/// markup noise that survives tag stripping.
const IGNORE_WORDS: &[&str] = &[
    "http", "https", "href", "with", "this", "that", "from", "your", "have",
];

pub struct Config {
    pub base_url: Url,
    pub script_path: String,
    pub username: String,
    pub wordlist: PathBuf,
    pub workers: usize,
    pub proxy: Option<String>,
    pub rate: u32,
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub keywords: bool,
    pub fingerprint: bool,
    pub enumerate_only: bool,
    pub gap_tolerance: u32,
    pub max_transport_errors: u32,
    pub plugin_list: Option<PathBuf>,
    pub stop_on_success: bool,
    pub min_keyword_length: usize,
    pub min_keyword_frequency: usize,
    pub ignore_words: HashSet<String>,
}

impl Config {
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let mut target = cli.url;
        if !target.ends_with('/') {
            target.push('/');
        }
        let base_url = Url::parse(&target).context("invalid target URL")?;
        base_url
            .join(&cli.script_path)
            .context("invalid login script path")?;

        Ok(Self {
            base_url,
            script_path: cli.script_path,
            username: cli.username,
            wordlist: cli.wordlist,
            workers: cli.threads,
            proxy: cli.proxy,
            rate: cli.rate,
            timeout: Duration::from_secs(cli.timeout),
            poll_interval: Duration::from_secs(cli.poll_interval),
            keywords: !cli.no_keywords,
            fingerprint: !cli.no_fingerprint,
            enumerate_only: cli.enumerate_users,
            gap_tolerance: cli.gap_tolerance,
            max_transport_errors: cli.max_transport_errors,
            plugin_list: cli.plugin_list,
            stop_on_success: cli.stop_on_success,
            min_keyword_length: cli.min_keyword_length,
            min_keyword_frequency: cli.min_keyword_frequency,
            ignore_words: IGNORE_WORDS.iter().map(|w| w.to_string()).collect(),
        })
    }

    pub fn login_url(&self) -> Url {
        // validated in from_cli
        self.base_url
            .join(&self.script_path)
            .unwrap_or_else(|_| self.base_url.clone())
    }

    pub fn keyword_filter(&self) -> KeywordFilter {
        KeywordFilter {
            min_length: self.min_keyword_length,
            min_frequency: self.min_keyword_frequency,
            ignore: self.ignore_words.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn base_url_gains_a_trailing_slash() {
        let cli = Cli::parse_from(["sledge", "http://target.test/blog"]);
        let config = Config::from_cli(cli).unwrap();
        assert_eq!(config.base_url.as_str(), "http://target.test/blog/");
        assert_eq!(
            config.login_url().as_str(),
            "http://target.test/blog/wp-login.php"
        );
    }

    #[test]
    fn invalid_url_is_rejected() {
        let cli = Cli::parse_from(["sledge", "not a url"]);
        assert!(Config::from_cli(cli).is_err());
    }
}
