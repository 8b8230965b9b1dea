//! Game code generation.
//!
//! Codes are 10 characters from Crockford's Base32 alphabet, so they read
//! unambiguously when spoken or typed.

use rand::Rng;

const CROCKFORD: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ"; // no I, L, O, U

pub const GAME_CODE_LEN: usize = 10;

/// Generate a fresh game code.
///
/// ```
/// use matchday::utils::game_code::generate_game_code;
///
/// let code = generate_game_code();
/// assert_eq!(code.len(), 10);
/// ```
pub fn generate_game_code() -> String {
    let mut rng = rand::rng();
    (0..GAME_CODE_LEN)
        .map(|_| CROCKFORD[rng.random_range(0..CROCKFORD.len())] as char)
        .collect()
}

/// Canonical lookup form of a caller-supplied code (trimmed, upper-cased).
pub fn normalize_game_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}
