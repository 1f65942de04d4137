pub mod keywords;
pub mod loader;

use crate::core::context::Config;
use crate::http::client::Probe;
use crate::wordlist::keywords::{domain_token, extract_keywords};
use tracing::{debug, error};

/// Assemble the password candidate list: the configured username first,
/// then file words, then the low-cost guesses (domain token, keywords
/// from the target's content, discovered usernames). Duplicates are
/// tolerated and simply retested.
pub async fn assemble(config: &Config, probe: &dyn Probe, usernames: &[String]) -> Vec<String> {
    let mut words = vec![config.username.clone()];

    match loader::load_lines(&config.wordlist) {
        Ok(mut file_words) => {
            debug!(
                "{} words loaded from {}",
                file_words.len(),
                config.wordlist.display()
            );
            words.append(&mut file_words);
        }
        Err(err) => error!(
            "can't open {}, the wordlist will not be used: {}",
            config.wordlist.display(),
            err
        ),
    }

    if config.keywords {
        if let Some(token) = config.base_url.host_str().and_then(domain_token) {
            words.push(token);
        }

        match probe.get(&config.base_url).await {
            Ok(response) => {
                let found = extract_keywords(&response.body, &config.keyword_filter());
                debug!("{} keywords extracted from target content", found.len());
                words.extend(found);
            }
            // augmentation is best-effort; a dead homepage contributes nothing
            Err(err) => debug!("keyword fetch failed, continuing without: {}", err),
        }
    }

    words.extend(usernames.iter().cloned());
    words
}
