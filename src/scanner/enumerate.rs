//! Username discovery through WordPress author archives.
//!
//! `?author=N` resolves to the author archive of user ID N on stock
//! installs, either as a redirect carrying the slug in `Location` or as a
//! rendered page carrying it in the body class list. IDs may be sparse
//! (deleted users), so the scan keeps going through short gaps and only
//! stops after a long run of misses.

use crate::http::client::Probe;
use crate::http::response::HttpResponse;
use regex::Regex;
use tracing::{debug, warn};
use url::Url;

pub struct UserEnumerator {
    base_url: Url,
    start_id: u32,
    gap_tolerance: u32,
    max_transport_errors: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumerationEnd {
    /// The ID space past the last hit was exhausted; the normal stop.
    Exhausted,
    /// Too many consecutive transport errors; results are partial.
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationReport {
    /// Discovered usernames in hit order, unique by construction.
    pub usernames: Vec<String>,
    pub end: EnumerationEnd,
}

impl UserEnumerator {
    pub fn new(
        base_url: Url,
        start_id: u32,
        gap_tolerance: u32,
        max_transport_errors: u32,
    ) -> Self {
        Self {
            base_url,
            start_id,
            gap_tolerance,
            max_transport_errors,
        }
    }

    /// Scan user IDs upward from the start ID until consecutive misses
    /// exceed the gap tolerance. Transport errors count as misses; a run
    /// of them longer than the configured limit aborts the scan with
    /// whatever was found so far.
    pub async fn run(&self, probe: &dyn Probe) -> EnumerationReport {
        let mut usernames: Vec<String> = Vec::new();
        let mut misses = 0u32;
        let mut transport_errors = 0u32;
        let mut id = self.start_id;

        while misses <= self.gap_tolerance {
            match probe.get(&self.author_url(id)).await {
                Ok(response) => {
                    transport_errors = 0;
                    match resolve_username(&response) {
                        Some(name) => {
                            debug!("user id {} resolves to {}", id, name);
                            misses = 0;
                            if !usernames.contains(&name) {
                                usernames.push(name);
                            }
                        }
                        None => misses += 1,
                    }
                }
                Err(err) => {
                    debug!("probe for user id {} failed: {}", id, err);
                    transport_errors += 1;
                    misses += 1;
                    if transport_errors > self.max_transport_errors {
                        warn!(
                            "user enumeration aborted after {} consecutive transport errors",
                            transport_errors
                        );
                        return EnumerationReport {
                            usernames,
                            end: EnumerationEnd::Aborted,
                        };
                    }
                }
            }
            id += 1;
        }

        EnumerationReport {
            usernames,
            end: EnumerationEnd::Exhausted,
        }
    }

    fn author_url(&self, id: u32) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(Some(&format!("author={id}")));
        url
    }
}

/// A hit redirects to the author archive or renders it with the author
/// slug in the body class list (`author author-<slug>`).
fn resolve_username(response: &HttpResponse) -> Option<String> {
    if response.is_redirect() {
        let location = response.header("location")?;
        let re = Regex::new(r"/author/([^/?#]+)").unwrap();
        return re
            .captures(location)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string());
    }

    let re = Regex::new(r"author author-([A-Za-z][A-Za-z0-9_.-]*)").unwrap();
    re.captures(&response.body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
