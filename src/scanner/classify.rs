//! Response classification for login attempts and plugin probes.
//!
//! WordPress login heuristics are target-specific (themes and security
//! plugins rewrite the form), so the login verdict sits behind the
//! [`LoginClassifier`] trait with the stock signatures in
//! [`SignatureClassifier`]. Deployments with customized login flows can
//! supply their own markers through [`ClassifierConfig`].

use crate::http::response::HttpResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginVerdict {
    Success,
    Failure,
    /// An anti-bruteforce mechanism answered instead of the login form.
    LockedOut,
    /// No known signature matched; callers treat this as Failure.
    Ambiguous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserVerdict {
    Known,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginVerdict {
    Detected,
    NotDetected,
    /// Unexpected status; callers treat this as NotDetected.
    Ambiguous,
}

pub trait LoginClassifier: Send + Sync {
    /// Classify a login-form response. Transport errors are handled
    /// before classification and never reach this method.
    fn classify(&self, response: &HttpResponse) -> LoginVerdict;

    /// Whether the response indicates the attempted username exists at
    /// all, regardless of the password being right.
    fn classify_user(&self, response: &HttpResponse) -> UserVerdict;
}

/// Signatures the stock classifier matches against. All body markers are
/// compared case-insensitively.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Substring of the redirect `Location` that confirms a login.
    pub success_location: String,
    /// Session cookie name set on successful authentication.
    pub session_cookie: String,
    /// Body markers of a rejected login.
    pub failure_markers: Vec<String>,
    /// Body markers of an active lockout/protection mechanism.
    pub lockout_markers: Vec<String>,
    /// Body markers telling a nonexistent username apart from a bad
    /// password.
    pub unknown_user_markers: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            success_location: "wp-admin".to_string(),
            session_cookie: "wordpress_logged_in".to_string(),
            failure_markers: vec!["login_error".to_string()],
            lockout_markers: vec![
                "login lockdown".to_string(),
                "too many failed login attempts".to_string(),
                "has been locked".to_string(),
            ],
            unknown_user_markers: vec![
                "invalid username".to_string(),
                "invalid_username".to_string(),
            ],
        }
    }
}

pub struct SignatureClassifier {
    config: ClassifierConfig,
}

impl SignatureClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }
}

impl Default for SignatureClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl LoginClassifier for SignatureClassifier {
    fn classify(&self, response: &HttpResponse) -> LoginVerdict {
        let body = response.body.to_lowercase();

        if self.config.lockout_markers.iter().any(|m| body.contains(m)) {
            return LoginVerdict::LockedOut;
        }

        if response.is_redirect() {
            if let Some(location) = response.header("location") {
                if location.contains(&self.config.success_location) {
                    return LoginVerdict::Success;
                }
            }
        }

        if let Some(cookies) = response.header("set-cookie") {
            if cookies.contains(&self.config.session_cookie) {
                return LoginVerdict::Success;
            }
        }

        if self.config.failure_markers.iter().any(|m| body.contains(m)) {
            return LoginVerdict::Failure;
        }

        LoginVerdict::Ambiguous
    }

    fn classify_user(&self, response: &HttpResponse) -> UserVerdict {
        let body = response.body.to_lowercase();

        if self
            .config
            .unknown_user_markers
            .iter()
            .any(|m| body.contains(m))
        {
            UserVerdict::Unknown
        } else {
            UserVerdict::Known
        }
    }
}

/// Well-known plugin paths answer with anything but 404 when the plugin
/// is installed; hardened hosts deny the directory listing with 403
/// without hiding presence.
pub fn classify_plugin(response: &HttpResponse) -> PluginVerdict {
    match response.status {
        404 => PluginVerdict::NotDetected,
        200 | 301 | 302 | 401 | 403 => PluginVerdict::Detected,
        _ => PluginVerdict::Ambiguous,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: body.to_string(),
        }
    }

    fn response_with_header(status: u16, name: &str, value: &str) -> HttpResponse {
        let mut headers = HashMap::new();
        headers.insert(name.to_string(), value.to_string());
        HttpResponse {
            status,
            headers,
            body: String::new(),
        }
    }

    #[test]
    fn redirect_to_admin_is_success() {
        let classifier = SignatureClassifier::default();
        let resp = response_with_header(302, "location", "http://target.test/wp-admin/");
        assert_eq!(classifier.classify(&resp), LoginVerdict::Success);
    }

    #[test]
    fn session_cookie_is_success() {
        let classifier = SignatureClassifier::default();
        let resp = response_with_header(
            200,
            "set-cookie",
            "wordpress_logged_in_abc=admin%7C123; path=/",
        );
        assert_eq!(classifier.classify(&resp), LoginVerdict::Success);
    }

    #[test]
    fn login_error_div_is_failure() {
        let classifier = SignatureClassifier::default();
        let resp = response(
            200,
            r#"<div id="login_error">The password you entered is incorrect.</div>"#,
        );
        assert_eq!(classifier.classify(&resp), LoginVerdict::Failure);
    }

    #[test]
    fn lockout_signature_wins_over_everything() {
        let classifier = SignatureClassifier::default();
        let resp = response(
            200,
            r#"<div id="login_error">Too many failed login attempts.</div>"#,
        );
        assert_eq!(classifier.classify(&resp), LoginVerdict::LockedOut);
    }

    #[test]
    fn unmatched_response_is_ambiguous() {
        let classifier = SignatureClassifier::default();
        let resp = response(200, "<html><body>welcome</body></html>");
        assert_eq!(classifier.classify(&resp), LoginVerdict::Ambiguous);
    }

    #[test]
    fn classification_is_deterministic() {
        let classifier = SignatureClassifier::default();
        let resp = response(200, r#"<div id="login_error">nope</div>"#);
        let first = classifier.classify(&resp);
        for _ in 0..10 {
            assert_eq!(classifier.classify(&resp), first);
        }
    }

    #[test]
    fn invalid_username_marker_means_unknown_user() {
        let classifier = SignatureClassifier::default();
        let resp = response(
            200,
            r#"<div id="login_error"><strong>Error:</strong> Invalid username.</div>"#,
        );
        assert_eq!(classifier.classify_user(&resp), UserVerdict::Unknown);
    }

    #[test]
    fn wrong_password_still_means_known_user() {
        let classifier = SignatureClassifier::default();
        let resp = response(
            200,
            r#"<div id="login_error">The password you entered for admin is incorrect.</div>"#,
        );
        assert_eq!(classifier.classify_user(&resp), UserVerdict::Known);
    }

    #[test]
    fn plugin_statuses() {
        assert_eq!(
            classify_plugin(&response(404, "not found")),
            PluginVerdict::NotDetected
        );
        assert_eq!(classify_plugin(&response(200, "")), PluginVerdict::Detected);
        assert_eq!(classify_plugin(&response(403, "")), PluginVerdict::Detected);
        assert_eq!(classify_plugin(&response(301, "")), PluginVerdict::Detected);
        assert_eq!(
            classify_plugin(&response(500, "")),
            PluginVerdict::Ambiguous
        );
    }
}
