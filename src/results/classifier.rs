/// Column-name substrings that flag a field for cautious display.
const SENSITIVE_MARKERS: [&str; 9] = [
    "password", "pass", "pwd", "hash", "email", "user", "admin", "token", "secret",
];

/// Case-insensitive substring match against the marker set. A heuristic for
/// rendering only: unlisted sensitive names pass, and benign names that
/// happen to contain a marker match.
pub fn is_sensitive(column: &str) -> bool {
    let lowered = column.to_lowercase();
    SENSITIVE_MARKERS.iter().any(|marker| lowered.contains(marker))
}
