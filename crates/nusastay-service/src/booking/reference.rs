//! Human-readable booking reference generation.

use chrono::Utc;
use rand::RngExt;

const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SUFFIX_LEN: usize = 4;

/// Generates references of the form `NS-<base36 millis>-<random>`.
///
/// The timestamp segment makes references roughly sortable by creation
/// time; the random suffix disambiguates same-millisecond creations. A
/// unique index on the column catches the residual collision, surfaced to
/// the caller as a conflict.
#[derive(Debug, Clone)]
pub struct ReferenceGenerator {
    prefix: String,
}

impl ReferenceGenerator {
    /// Create a generator with the given reference prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Generate a new booking reference.
    pub fn generate(&self) -> String {
        let stamp = to_base36(Utc::now().timestamp_millis().max(0) as u64);
        let mut rng = rand::rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        format!("{}-{}-{}", self.prefix, stamp, suffix)
    }
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
