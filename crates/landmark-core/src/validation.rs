//! Field normalization and format patterns used by the request schemas.

use std::sync::LazyLock;

use regex::Regex;

/// Conventional `local@domain.tld` address. Word characters are ASCII only.
pub static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?-u:\w)+([.-]?(?-u:\w)+)*@(?-u:\w)+([.-]?(?-u:\w)+)*(\.(?-u:\w){2,3})+$")
        .expect("email pattern compiles")
});

/// 10 to 15 ASCII digits.
pub static MOBILE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10,15}$").expect("mobile pattern compiles"));

/// Trim a submitted value; blank values count as absent.
pub fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Trim and lower-case an email address.
pub fn normalize_email(value: Option<&str>) -> Option<String> {
    normalize(value).map(|s| s.to_lowercase())
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}
