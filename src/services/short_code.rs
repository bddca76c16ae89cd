use regex::Regex;
use std::sync::LazyLock;

/// Length of every issued short code.
pub const SHORT_CODE_LENGTH: usize = 6;

/// Character set for generating short codes (lowercase letters and digits).
const ALPHABET_CHARS: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm',
    'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];

static CODE_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]{6}$").expect("short code pattern is a valid regex")
});

/// Generate a random short code.
///
/// Codes are drawn uniformly from `[a-z0-9]`, so there are 36^6 possible
/// values. Uniqueness is not checked here; callers retry on a collision.
pub fn generate_code() -> String {
    nanoid::nanoid!(SHORT_CODE_LENGTH, ALPHABET_CHARS)
}

/// Whether `code` could have been produced by [`generate_code`].
pub fn is_well_formed_code(code: &str) -> bool {
    CODE_FORMAT.is_match(code)
}
