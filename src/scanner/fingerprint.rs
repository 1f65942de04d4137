use crate::http::response::HttpResponse;
use regex::Regex;

/// Pull a WordPress version out of the homepage response. The meta
/// generator tag is checked first, then a feed-style `<generator>`
/// element, then the X-Generator header some hosts emit.
pub fn extract_version(response: &HttpResponse) -> Option<String> {
    let meta_re = Regex::new(
        r#"(?i)<meta\s+name=["']generator["']\s+content=["']WordPress\s*([\d]+\.[\d]+(?:\.[\d]+)?)["']"#,
    )
    .unwrap();
    if let Some(caps) = meta_re.captures(&response.body) {
        return caps.get(1).map(|m| m.as_str().to_string());
    }

    let feed_re = Regex::new(
        r#"(?i)<generator>[^<]*wordpress[^<]*\?v=([\d]+\.[\d]+(?:\.[\d]+)?)[^<]*</generator>"#,
    )
    .unwrap();
    if let Some(caps) = feed_re.captures(&response.body) {
        return caps.get(1).map(|m| m.as_str().to_string());
    }

    if let Some(generator) = response.header("x-generator") {
        let header_re =
            Regex::new(r"(?i)wordpress\s*([\d]+\.[\d]+(?:\.[\d]+)?)").unwrap();
        if let Some(caps) = header_re.captures(generator) {
            return caps.get(1).map(|m| m.as_str().to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn page(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: HashMap::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn meta_generator_tag() {
        let resp = page(r#"<head><meta name="generator" content="WordPress 6.4.2" /></head>"#);
        assert_eq!(extract_version(&resp), Some("6.4.2".to_string()));
    }

    #[test]
    fn feed_generator_element() {
        let resp = page("<generator>https://wordpress.org/?v=5.8</generator>");
        assert_eq!(extract_version(&resp), Some("5.8".to_string()));
    }

    #[test]
    fn x_generator_header() {
        let mut headers = HashMap::new();
        headers.insert("x-generator".to_string(), "WordPress 6.1.1".to_string());
        let resp = HttpResponse {
            status: 200,
            headers,
            body: String::new(),
        };
        assert_eq!(extract_version(&resp), Some("6.1.1".to_string()));
    }

    #[test]
    fn no_marker_no_version() {
        let resp = page("<html><body>a plain site</body></html>");
        assert_eq!(extract_version(&resp), None);
    }
}
