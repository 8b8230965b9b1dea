//! Unique fixture values backed by ULIDs, so tests sharing a database
//! never collide on unique columns.

use ulid::Ulid;

/// `{prefix}-{ulid}`
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("team");
/// let b = unique_str("team");
/// assert_ne!(a, b);
/// assert!(a.starts_with("team-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Upper-cased team code with a ULID suffix, e.g. `RED-01J9...`.
///
/// ```
/// use backend_test_support::unique_helpers::unique_team_code;
///
/// let code = unique_team_code("red");
/// assert!(code.starts_with("RED-"));
/// assert_eq!(code, code.to_uppercase());
/// ```
pub fn unique_team_code(prefix: &str) -> String {
    format!("{}-{}", prefix.to_uppercase(), Ulid::new())
}
