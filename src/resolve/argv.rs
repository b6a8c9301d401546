//! Candidate command extraction from raw argv.

/// Leading tokens up to the first flag (`-x`, `--x`).
pub fn leading_positionals<S: AsRef<str>>(argv: &[S]) -> Vec<&str> {
    argv.iter()
        .map(AsRef::as_ref)
        .take_while(|token| !token.starts_with('-'))
        .collect()
}

/// Longest space-joined prefix of `words` accepted by `is_known`.
///
/// Words are dropped from the end one at a time, so `resource show myId`
/// resolves to `resource show` before `resource` is tried.
pub fn longest_known_prefix(words: &[&str], is_known: impl Fn(&str) -> bool) -> Option<String> {
    (1..=words.len())
        .rev()
        .map(|len| words[..len].join(" "))
        .find(|candidate| is_known(candidate))
}
