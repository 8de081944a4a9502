// Lexical and structural feature extraction for URL classification
// Values must match what the trained scaler saw, so parsing deliberately does
// no normalization: no host lowercasing, no percent decoding, no IDNA

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::net::Ipv6Addr;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use crate::models::features::{FeatureVector, COUNTED_CHARS};
use crate::services::allowlist::{AllowlistSnapshot, DomainAllowlist};

// =============================================================================
// STATIC PATTERNS
// =============================================================================

lazy_static! {
    static ref IP_ADDRESS_PATTERN: Regex =
        Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").expect("Invalid IP address regex");
    static ref DIGIT_RUN_PATTERN: Regex = Regex::new(r"\d+").expect("Invalid digit run regex");
    static ref LETTER_RUN_PATTERN: Regex =
        Regex::new(r"[a-zA-Z]+").expect("Invalid letter run regex");
    static ref LETTER_CLASS: Regex = Regex::new(r"\p{L}").expect("Invalid letter class regex");
    // Decimal digits plus the superscript, subscript and enclosed digit forms
    static ref DIGIT_CLASS: Regex = Regex::new(concat!(
        r"[\p{Nd}\x{B2}-\x{B3}\x{B9}\x{1369}-\x{1371}\x{19DA}\x{2070}\x{2074}-\x{2079}",
        r"\x{2080}-\x{2089}\x{2460}-\x{2468}\x{2474}-\x{247C}\x{2488}-\x{2490}\x{24EA}",
        r"\x{24F5}-\x{24FD}\x{24FF}\x{2776}-\x{277E}\x{2780}-\x{2788}\x{278A}-\x{2792}",
        r"\x{10A40}-\x{10A43}\x{10E60}-\x{10E68}\x{11052}-\x{1105A}\x{1F100}-\x{1F10A}]"
    ))
    .expect("Invalid digit class regex");
    static ref IPV_FUTURE_PATTERN: Regex =
        Regex::new(r"^v[a-fA-F0-9]+\..+$").expect("Invalid IPvFuture regex");
}

const SUSPICIOUS_TLDS: [&str; 8] = [
    "xyz", "top", "club", "online", "site", "fun", "loan", "work",
];

const COMMON_TLDS: [&str; 9] = ["com", "org", "net", "edu", "gov", "int", "mil", "io", "co"];

const SUSPICIOUS_WORDS: [&str; 11] = [
    "secure",
    "account",
    "banking",
    "login",
    "signin",
    "verify",
    "paypal",
    "password",
    "credential",
    "confirm",
    "update",
];

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractionError {
    #[error("Invalid IPv6 URL: {0}")]
    InvalidIpv6(String),

    #[error("Invalid bracketed host: {0}")]
    InvalidBracketedHost(String),
}

// =============================================================================
// URL SPLITTING
// =============================================================================

/// Generic-syntax components of a URL, exactly as they appear in the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlParts<'a> {
    pub scheme: &'a str,
    pub netloc: &'a str,
    pub path: &'a str,
    pub params: &'a str,
    pub query: &'a str,
    pub fragment: &'a str,
}

/// Split a URL into scheme, network location, path, params, query and
/// fragment without any normalization.
///
/// Tabs and newlines are dropped and leading control characters or spaces
/// are ignored before splitting, so the returned slices borrow from the
/// cleaned copy held in `buffer`.
pub fn split_url<'a>(url: &str, buffer: &'a mut String) -> Result<UrlParts<'a>, ExtractionError> {
    buffer.clear();
    buffer.extend(
        url.trim_start_matches(|c: char| c <= ' ')
            .chars()
            .filter(|c| !matches!(c, '\t' | '\r' | '\n')),
    );
    let mut rest: &'a str = buffer.as_str();
    let mut parts = UrlParts::default();

    if let Some(colon) = rest.find(':') {
        let candidate = &rest[..colon];
        let valid_scheme = colon > 0
            && candidate.starts_with(|c: char| c.is_ascii_alphabetic())
            && candidate
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if valid_scheme {
            parts.scheme = candidate;
            rest = &rest[colon + 1..];
        }
    }

    if let Some(after_slashes) = rest.strip_prefix("//") {
        let end = after_slashes
            .find(|c: char| matches!(c, '/' | '?' | '#'))
            .unwrap_or(after_slashes.len());
        parts.netloc = &after_slashes[..end];
        rest = &after_slashes[end..];
        check_netloc(parts.netloc)?;
    }

    if let Some((before, fragment)) = rest.split_once('#') {
        parts.fragment = fragment;
        rest = before;
    }

    if let Some((before, query)) = rest.split_once('?') {
        parts.query = query;
        rest = before;
    }

    // Only the last path segment may carry ;params
    let (path, params) = split_params(rest);
    parts.path = path;
    parts.params = params;

    Ok(parts)
}

fn split_params(path: &str) -> (&str, &str) {
    // With a `/`, the split point is the first `;` of the last segment
    let split_at = match path.rfind('/') {
        Some(last_segment_start) => path[last_segment_start..]
            .find(';')
            .map(|i| last_segment_start + i),
        None => path.find(';'),
    };
    match split_at {
        Some(i) => (&path[..i], &path[i + 1..]),
        None => (path, ""),
    }
}

fn check_netloc(netloc: &str) -> Result<(), ExtractionError> {
    let has_open = netloc.contains('[');
    let has_close = netloc.contains(']');
    if has_open != has_close {
        return Err(ExtractionError::InvalidIpv6(netloc.to_string()));
    }
    if !has_open {
        return Ok(());
    }

    // The first bracketed run is validated wherever it sits, userinfo included
    let bracketed = netloc.split_once('[').map_or("", |(_, rest)| rest);
    let host = bracketed.split_once(']').map_or(bracketed, |(host, _)| host);

    let valid_host = if host.starts_with('v') {
        IPV_FUTURE_PATTERN.is_match(host)
    } else {
        host.parse::<Ipv6Addr>().is_ok()
    };
    if valid_host {
        Ok(())
    } else {
        Err(ExtractionError::InvalidBracketedHost(host.to_string()))
    }
}

/// Lowercased network location without port and without a leading `www.`.
/// Used only for allowlist lookups; unparseable input yields an empty string.
pub fn normalize_domain(url: &str) -> String {
    let mut buffer = String::new();
    let netloc = match split_url(url, &mut buffer) {
        Ok(parts) => parts.netloc.to_lowercase(),
        Err(_) => return String::new(),
    };

    let host = netloc.split(':').next().unwrap_or_default();
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

/// Prepend `http://` unless the URL already starts with an http(s) scheme.
pub fn with_default_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

// =============================================================================
// FEATURE EXTRACTOR
// =============================================================================

/// Result of one extraction. `features` always holds the full schema; when
/// `degraded` is set, columns that were not reached before the failure are 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub features: FeatureVector,
    pub degraded: Option<ExtractionError>,
}

#[derive(Clone)]
pub struct FeatureExtractor {
    allowlist: Arc<DomainAllowlist>,
}

impl FeatureExtractor {
    pub fn new(allowlist: Arc<DomainAllowlist>) -> Self {
        Self { allowlist }
    }

    pub fn allowlist(&self) -> &Arc<DomainAllowlist> {
        &self.allowlist
    }

    /// Extract the feature vector for a URL. Never fails.
    pub fn extract(&self, url: &str) -> FeatureVector {
        self.extract_detailed(url).features
    }

    /// Extract features for a raw JSON value; anything but a string yields
    /// the zero-filled schema.
    pub fn extract_value(&self, value: &serde_json::Value) -> FeatureVector {
        match value.as_str() {
            Some(url) => self.extract(url),
            None => FeatureVector::zeroed(),
        }
    }

    /// Extract features and report whether the computation was cut short.
    pub fn extract_detailed(&self, url: &str) -> Extraction {
        let mut features = FeatureVector::zeroed();
        if url.is_empty() {
            return Extraction {
                features,
                degraded: None,
            };
        }

        let url = with_default_scheme(url);
        let snapshot = self.allowlist.snapshot();

        let degraded = match compute_features(&url, &snapshot, &mut features) {
            Ok(()) => None,
            Err(e) => {
                warn!("Error extracting features for URL '{}': {}", url, e);
                Some(e)
            },
        };

        Extraction { features, degraded }
    }
}

/// Fill `features` in schema order, stopping at the first failure.
fn compute_features(
    url: &str,
    allowlist: &AllowlistSnapshot,
    features: &mut FeatureVector,
) -> Result<(), ExtractionError> {
    let url_len = url.chars().count();
    features.url_length = url_len as f64;

    let mut buffer = String::new();
    let parts = split_url(url, &mut buffer)?;
    let domain = parts.netloc;

    // Domain features
    features.domain_length = domain.chars().count() as f64;
    let normalized_domain = normalize_domain(url);
    let is_common = allowlist.contains(&normalized_domain)
        || allowlist.contains(&format!("www.{}", normalized_domain));
    features.is_common_domain = flag(is_common);

    let domain_parts = domain.split('.').count();
    let subdomain_count = domain_parts.saturating_sub(2);
    features.subdomain_count = subdomain_count as f64;

    // Path features
    features.path_length = parts.path.chars().count() as f64;
    features.path_depth = parts.path.matches('/').count() as f64;

    // Query and fragment features
    features.has_query = flag(!parts.query.is_empty());
    features.query_length = parts.query.chars().count() as f64;
    features.query_params_count = if parts.query.is_empty() {
        0.0
    } else {
        (parts.query.matches('&').count() + 1) as f64
    };
    features.has_fragment = flag(!parts.fragment.is_empty());

    for ch in COUNTED_CHARS {
        features.set_char_count(ch, url.matches(ch).count() as f64);
    }

    // Other suspicious patterns
    features.has_ip_address = flag(IP_ADDRESS_PATTERN.is_match(url));
    let domain_lower = domain.to_lowercase();
    features.has_suspicious_tld = flag(
        SUSPICIOUS_TLDS
            .iter()
            .any(|tld| domain_lower.ends_with(&format!(".{}", tld))),
    );
    features.has_multiple_dots = flag(url.contains(".."));
    features.has_multiple_subdomains = flag(subdomain_count > 2);

    // Statistical features
    features.digit_ratio = class_ratio(&DIGIT_CLASS, url, url_len);
    features.letter_ratio = class_ratio(&LETTER_CLASS, url, url_len);
    features.uppercase_ratio = char_ratio(url, url_len, char::is_uppercase);
    features.lowercase_ratio = char_ratio(url, url_len, char::is_lowercase);
    features.entropy = shannon_entropy(url);

    let tld = if domain.contains('.') {
        domain.rsplit('.').next().unwrap_or_default()
    } else {
        ""
    };
    features.tld_length = tld.chars().count() as f64;
    features.is_common_tld = flag(COMMON_TLDS.contains(&tld.to_lowercase().as_str()));

    let url_lower = url.to_lowercase();
    features.suspicious_words_count = SUSPICIOUS_WORDS
        .iter()
        .filter(|word| url_lower.contains(*word))
        .count() as f64;

    features.max_consecutive_digits = longest_match(&DIGIT_RUN_PATTERN, url) as f64;
    features.max_consecutive_letters = longest_match(&LETTER_RUN_PATTERN, url) as f64;

    Ok(())
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Share of characters matched by a single-character class.
fn class_ratio(class: &Regex, text: &str, len: usize) -> f64 {
    if len == 0 {
        return 0.0;
    }
    class.find_iter(text).count() as f64 / len as f64
}

fn char_ratio(text: &str, len: usize, class: fn(char) -> bool) -> f64 {
    if len == 0 {
        return 0.0;
    }
    text.chars().filter(|&c| class(c)).count() as f64 / len as f64
}

/// Shannon entropy in bits, summed over characters in first-occurrence order.
pub fn shannon_entropy(text: &str) -> f64 {
    let mut order: Vec<char> = Vec::new();
    let mut counts: HashMap<char, usize> = HashMap::new();
    let mut len = 0usize;

    for ch in text.chars() {
        len += 1;
        let count = counts.entry(ch).or_insert(0);
        if *count == 0 {
            order.push(ch);
        }
        *count += 1;
    }

    if len == 0 {
        return 0.0;
    }

    let mut entropy = 0.0;
    for ch in order {
        let probability = counts[&ch] as f64 / len as f64;
        entropy -= probability * probability.log2();
    }
    entropy
}

fn longest_match(pattern: &Regex, text: &str) -> usize {
    pattern
        .find_iter(text)
        .map(|m| m.as_str().chars().count())
        .max()
        .unwrap_or(0)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::features::FEATURE_NAMES;

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::new(Arc::new(DomainAllowlist::with_domains([
            "example.com",
            "wikipedia.org",
        ])))
    }

    fn split(url: &str) -> (String, String, String, String, String, String) {
        let mut buffer = String::new();
        let p = split_url(url, &mut buffer).unwrap();
        (
            p.scheme.to_string(),
            p.netloc.to_string(),
            p.path.to_string(),
            p.params.to_string(),
            p.query.to_string(),
            p.fragment.to_string(),
        )
    }

    #[test]
    fn test_split_url_components() {
        let (scheme, netloc, path, params, query, fragment) =
            split("https://user@Host.Example:8080/a/b;p=1?x=1&y=2#frag");
        assert_eq!(scheme, "https");
        assert_eq!(netloc, "user@Host.Example:8080");
        assert_eq!(path, "/a/b");
        assert_eq!(params, "p=1");
        assert_eq!(query, "x=1&y=2");
        assert_eq!(fragment, "frag");
    }

    #[test]
    fn test_split_url_params_only_in_last_segment() {
        let (_, _, path, params, _, _) = split("http://h/a;x/b");
        assert_eq!(path, "/a;x/b");
        assert_eq!(params, "");
    }

    #[test]
    fn test_split_url_params_split_after_last_slash() {
        let (_, _, path, params, _, _) = split("http://h/a;x/b;y");
        assert_eq!(path, "/a;x/b");
        assert_eq!(params, "y");

        // Without any slash the first `;` starts the params
        let (_, netloc, path, params, _, _) = split("http:a;b");
        assert_eq!(netloc, "");
        assert_eq!(path, "a");
        assert_eq!(params, "b");

        let f = extractor().extract("http://h/a;x/b;y");
        assert_eq!(f.path_length, 6.0);
        assert_eq!(f.path_depth, 2.0);
    }

    #[test]
    fn test_split_url_query_inside_fragment_stays_in_fragment() {
        let (_, netloc, path, _, query, fragment) = split("http://h#frag?not-query");
        assert_eq!(netloc, "h");
        assert_eq!(path, "");
        assert_eq!(query, "");
        assert_eq!(fragment, "frag?not-query");
    }

    #[test]
    fn test_split_url_rejects_unbalanced_brackets() {
        let mut buffer = String::new();
        assert!(matches!(
            split_url("http://[::1/path", &mut buffer),
            Err(ExtractionError::InvalidIpv6(_))
        ));
        assert!(split_url("http://[::1]:8080/path", &mut buffer).is_ok());
        assert!(matches!(
            split_url("http://[not-an-ip]/", &mut buffer),
            Err(ExtractionError::InvalidBracketedHost(_))
        ));
    }

    #[test]
    fn test_normalize_domain() {
        assert_eq!(normalize_domain("http://WWW.Example.com:8080/x"), "example.com");
        assert_eq!(normalize_domain("https://sub.example.com"), "sub.example.com");
        assert_eq!(normalize_domain("http://[::1"), "");
    }

    #[test]
    fn test_empty_url_is_all_zero() {
        let extraction = extractor().extract_detailed("");
        assert!(extraction.degraded.is_none());
        assert!(extraction.features.to_row().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_non_string_value_is_all_zero() {
        let extractor = extractor();
        for value in [
            serde_json::json!(42),
            serde_json::json!(null),
            serde_json::json!(["http://a.com"]),
        ] {
            assert_eq!(extractor.extract_value(&value), FeatureVector::zeroed());
        }
    }

    #[test]
    fn test_schema_is_complete_for_any_input() {
        let extractor = extractor();
        for url in ["", "a", "http://[bad", "ftp://x", "https://example.com/?q#f"] {
            let features = extractor.extract(url);
            let names: Vec<_> = features.iter().map(|(name, _)| name).collect();
            assert_eq!(names, FEATURE_NAMES.to_vec());
        }
    }

    #[test]
    fn test_basic_features() {
        let f = extractor().extract("https://www.example.com/path/to/page?a=1&b=2#top");

        assert_eq!(f.url_length, 48.0);
        assert_eq!(f.domain_length, 15.0);
        assert_eq!(f.is_common_domain, 1.0);
        assert_eq!(f.subdomain_count, 1.0);
        assert_eq!(f.path_length, 13.0);
        assert_eq!(f.path_depth, 3.0);
        assert_eq!(f.has_query, 1.0);
        assert_eq!(f.query_length, 7.0);
        assert_eq!(f.query_params_count, 2.0);
        assert_eq!(f.has_fragment, 1.0);
        assert_eq!(f.count_slash, 5.0);
        assert_eq!(f.count_dot, 2.0);
        assert_eq!(f.count_equals, 2.0);
        assert_eq!(f.count_ampersand, 1.0);
        assert_eq!(f.count_hash, 1.0);
        assert_eq!(f.count_question, 1.0);
        assert_eq!(f.count_colon, 1.0);
        assert_eq!(f.tld_length, 3.0);
        assert_eq!(f.is_common_tld, 1.0);
        assert_eq!(f.has_ip_address, 0.0);
        assert_eq!(f.has_suspicious_tld, 0.0);
        assert_eq!(f.max_consecutive_digits, 1.0);
        assert_eq!(f.max_consecutive_letters, 7.0);
    }

    #[test]
    fn test_missing_scheme_is_prefixed() {
        let extractor = extractor();
        let bare = extractor.extract("example.com/login");
        let prefixed = extractor.extract("http://example.com/login");
        assert_eq!(bare, prefixed);
        assert_eq!(bare.url_length, 24.0);
    }

    #[test]
    fn test_ip_address_detected() {
        let f = extractor().extract("http://192.168.1.1/login");
        assert_eq!(f.has_ip_address, 1.0);
        assert_eq!(f.max_consecutive_digits, 3.0);
        assert_eq!(f.suspicious_words_count, 1.0);
    }

    #[test]
    fn test_suspicious_tld() {
        assert_eq!(extractor().extract("http://example.xyz").has_suspicious_tld, 1.0);
        assert_eq!(extractor().extract("http://EXAMPLE.TOP/").has_suspicious_tld, 1.0);
        // Port stays part of the network location
        assert_eq!(
            extractor().extract("http://example.xyz:8080").has_suspicious_tld,
            0.0
        );
        // Needs a dot before the suffix
        assert_eq!(extractor().extract("http://xyz").has_suspicious_tld, 0.0);
    }

    #[test]
    fn test_multiple_subdomains() {
        let f = extractor().extract("http://sub1.sub2.sub3.example.com");
        assert_eq!(f.subdomain_count, 3.0);
        assert_eq!(f.has_multiple_subdomains, 1.0);

        let f = extractor().extract("http://a.example.com");
        assert_eq!(f.subdomain_count, 1.0);
        assert_eq!(f.has_multiple_subdomains, 0.0);

        let f = extractor().extract("http://localhost");
        assert_eq!(f.subdomain_count, 0.0);
        assert_eq!(f.tld_length, 0.0);
    }

    #[test]
    fn test_suspicious_words() {
        let f = extractor().extract("http://secure-paypal-login.com/verify");
        assert!(f.suspicious_words_count >= 3.0);
        assert_eq!(f.suspicious_words_count, 4.0);

        // Case-insensitive substring match
        let f = extractor().extract("http://example.com/AccountUpdate");
        assert_eq!(f.suspicious_words_count, 2.0);
    }

    #[test]
    fn test_multiple_dots() {
        assert_eq!(extractor().extract("http://a..b.com").has_multiple_dots, 1.0);
        assert_eq!(extractor().extract("http://a.b.com").has_multiple_dots, 0.0);
    }

    #[test]
    fn test_allowlist_bare_and_www() {
        let extractor = extractor();
        assert_eq!(extractor.extract("http://example.com").is_common_domain, 1.0);
        assert_eq!(extractor.extract("http://www.example.com").is_common_domain, 1.0);
        assert_eq!(extractor.extract("wikipedia.org").is_common_domain, 1.0);
        assert_eq!(extractor.extract("http://github.com:443/x").is_common_domain, 1.0);
        assert_eq!(extractor.extract("http://evil-example.com").is_common_domain, 0.0);
    }

    #[test]
    fn test_ratios_in_unit_interval() {
        let extractor = extractor();
        for url in [
            "http://AbC123.example.com/%20?q=ÄÖ",
            "x",
            "http://192.168.0.1:8080/__",
            "https://пример.рф/путь",
        ] {
            let f = extractor.extract(url);
            for value in [f.digit_ratio, f.letter_ratio, f.uppercase_ratio, f.lowercase_ratio] {
                assert!((0.0..=1.0).contains(&value), "{} -> {}", url, value);
            }
        }
    }

    #[test]
    fn test_ratio_values() {
        // "http://AB12" -> 11 chars, 2 digits, 6 letters, 2 upper, 4 lower
        let f = extractor().extract("http://AB12");
        assert_eq!(f.digit_ratio, 2.0 / 11.0);
        assert_eq!(f.letter_ratio, 6.0 / 11.0);
        assert_eq!(f.uppercase_ratio, 2.0 / 11.0);
        assert_eq!(f.lowercase_ratio, 4.0 / 11.0);
    }

    #[test]
    fn test_ratio_character_classes() {
        // Letter-number and fraction forms are neither letters nor digits,
        // and a combining vowel sign is not a letter
        let f = extractor().extract("http://a\u{216B}\u{BD}\u{93E}");
        assert_eq!(f.digit_ratio, 0.0);
        assert_eq!(f.letter_ratio, 5.0 / 11.0);

        // Superscript, circled and Arabic-Indic digits all count as digits
        let f = extractor().extract("http://a\u{B2}\u{2460}\u{663}");
        assert_eq!(f.digit_ratio, 3.0 / 11.0);
        assert_eq!(f.letter_ratio, 5.0 / 11.0);
    }

    #[test]
    fn test_entropy() {
        assert_eq!(shannon_entropy(""), 0.0);
        assert_eq!(shannon_entropy("aaaaaaaa"), 0.0);
        assert_eq!(shannon_entropy("ab"), 1.0);
        assert_eq!(shannon_entropy("abcd"), 2.0);
        assert!((shannon_entropy("aab") - 0.9182958340544896).abs() < 1e-12);
    }

    #[test]
    fn test_degraded_extraction_keeps_schema() {
        let extraction = extractor().extract_detailed("http://[::1/login");
        assert!(matches!(
            extraction.degraded,
            Some(ExtractionError::InvalidIpv6(_))
        ));
        // url_length is computed before parsing; everything after stays 0
        assert_eq!(extraction.features.url_length, 17.0);
        assert_eq!(extraction.features.domain_length, 0.0);
        assert_eq!(extraction.features.count_slash, 0.0);
        assert_eq!(extraction.features.entropy, 0.0);
    }

    #[test]
    fn test_bracket_check_covers_userinfo() {
        let extraction = extractor().extract_detailed("http://a[b]@example.com");
        assert!(matches!(
            extraction.degraded,
            Some(ExtractionError::InvalidBracketedHost(ref host)) if host == "b"
        ));
        assert_eq!(extraction.features.domain_length, 0.0);

        // Text before a valid bracketed address is tolerated
        let mut buffer = String::new();
        let parts = split_url("http://x[::1]/", &mut buffer).unwrap();
        assert_eq!(parts.netloc, "x[::1]");
        assert_eq!(parts.path, "/");
    }

    #[test]
    fn test_char_counts_over_full_url() {
        let f = extractor().extract("http://a-b_c.com/~x+y;z%20@w");
        assert_eq!(f.count_hyphen, 1.0);
        assert_eq!(f.count_underscore, 1.0);
        assert_eq!(f.count_tilde, 1.0);
        assert_eq!(f.count_plus, 1.0);
        assert_eq!(f.count_semicolon, 1.0);
        assert_eq!(f.count_percent, 1.0);
        assert_eq!(f.count_at, 1.0);
        assert_eq!(f.count_colon, 1.0);
    }
}
