// URL feature schema shared by extraction and scoring
// Column order is the order the scaler and classifier were trained with

use serde::Serialize;

/// Declares the schema once so the struct fields, the column names and the
/// row projection cannot drift apart.
macro_rules! feature_schema {
    ($( $(#[$meta:meta])* $field:ident => $name:literal ),+ $(,)?) => {
        /// Ordered, fixed-schema feature record for a single URL.
        ///
        /// Every field is an `f64` so that a record maps directly onto one
        /// scaler input row. Counts and flags hold whole numbers.
        #[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
        pub struct FeatureVector {
            $(
                $(#[$meta])*
                #[serde(rename = $name)]
                pub $field: f64,
            )+
        }

        /// Column names in training order.
        pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [$($name),+];

        impl FeatureVector {
            /// Project the record into a scaler input row (training order).
            pub fn to_row(&self) -> [f64; FEATURE_COUNT] {
                [$(self.$field),+]
            }

            /// Look up a single column by its schema name.
            pub fn get(&self, name: &str) -> Option<f64> {
                match name {
                    $($name => Some(self.$field),)+
                    _ => None,
                }
            }
        }
    };
}

/// Number of columns in the schema: 24 base features plus 14 character counts.
pub const FEATURE_COUNT: usize = 38;

/// Characters whose raw occurrence counts are part of the schema, in order.
pub const COUNTED_CHARS: [char; 14] = [
    '@', '-', '_', '=', '&', ';', ':', '/', '?', '.', '%', '~', '#', '+',
];

feature_schema! {
    url_length => "url_length",
    domain_length => "domain_length",
    /// 1 when the host (or its `www.` form) is on the safe-domain allowlist
    is_common_domain => "is_common_domain",
    subdomain_count => "subdomain_count",
    path_length => "path_length",
    path_depth => "path_depth",
    has_query => "has_query",
    query_length => "query_length",
    query_params_count => "query_params_count",
    has_fragment => "has_fragment",
    has_ip_address => "has_ip_address",
    has_suspicious_tld => "has_suspicious_tld",
    has_multiple_dots => "has_multiple_dots",
    has_multiple_subdomains => "has_multiple_subdomains",
    digit_ratio => "digit_ratio",
    letter_ratio => "letter_ratio",
    uppercase_ratio => "uppercase_ratio",
    lowercase_ratio => "lowercase_ratio",
    /// Shannon entropy of the character distribution, in bits
    entropy => "entropy",
    tld_length => "tld_length",
    is_common_tld => "is_common_tld",
    suspicious_words_count => "suspicious_words_count",
    max_consecutive_digits => "max_consecutive_digits",
    max_consecutive_letters => "max_consecutive_letters",
    count_at => "count_@",
    count_hyphen => "count_-",
    count_underscore => "count__",
    count_equals => "count_=",
    count_ampersand => "count_&",
    count_semicolon => "count_;",
    count_colon => "count_:",
    count_slash => "count_/",
    count_question => "count_?",
    count_dot => "count_.",
    count_percent => "count_%",
    count_tilde => "count_~",
    count_hash => "count_#",
    count_plus => "count_+",
}

impl FeatureVector {
    /// The all-zero record returned for empty or unusable input.
    pub fn zeroed() -> Self {
        Self::default()
    }

    /// Iterate `(name, value)` pairs in training order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_NAMES.into_iter().zip(self.to_row())
    }

    /// Store the occurrence count for one of [`COUNTED_CHARS`].
    pub(crate) fn set_char_count(&mut self, ch: char, count: f64) {
        let slot = match ch {
            '@' => &mut self.count_at,
            '-' => &mut self.count_hyphen,
            '_' => &mut self.count_underscore,
            '=' => &mut self.count_equals,
            '&' => &mut self.count_ampersand,
            ';' => &mut self.count_semicolon,
            ':' => &mut self.count_colon,
            '/' => &mut self.count_slash,
            '?' => &mut self.count_question,
            '.' => &mut self.count_dot,
            '%' => &mut self.count_percent,
            '~' => &mut self.count_tilde,
            '#' => &mut self.count_hash,
            '+' => &mut self.count_plus,
            _ => return,
        };
        *slot = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_schema_has_38_unique_columns() {
        let unique: HashSet<_> = FEATURE_NAMES.iter().collect();
        assert_eq!(unique.len(), FEATURE_COUNT);
        assert_eq!(FEATURE_NAMES[0], "url_length");
        assert_eq!(FEATURE_NAMES[23], "max_consecutive_letters");
        assert_eq!(FEATURE_NAMES[24], "count_@");
        assert_eq!(FEATURE_NAMES[37], "count_+");
    }

    #[test]
    fn test_char_count_columns_follow_counted_chars() {
        for (i, ch) in COUNTED_CHARS.iter().enumerate() {
            assert_eq!(FEATURE_NAMES[24 + i], format!("count_{}", ch));
        }
    }

    #[test]
    fn test_set_char_count_and_get() {
        let mut features = FeatureVector::zeroed();
        features.set_char_count('/', 3.0);
        features.set_char_count('x', 9.0);
        assert_eq!(features.get("count_/"), Some(3.0));
        assert_eq!(features.to_row()[31], 3.0);
        assert_eq!(features.get("count_x"), None);
    }

    #[test]
    fn test_serializes_with_schema_names_in_order() {
        let features = FeatureVector {
            url_length: 10.0,
            ..FeatureVector::zeroed()
        };
        let json = serde_json::to_value(features).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), FEATURE_COUNT);
        assert_eq!(object["url_length"], 10.0);
        assert!(object.contains_key("count__"));
    }
}
