//! Defensive extraction of structured fragments from free-form model output.
//!
//! The model is instructed to answer with a bare value, but replies routinely
//! arrive wrapped in prose, quotes or code fences. Every function here has the
//! same contract: extract the expected fragment, or report absence with `None`.
//! Callers map absence to their documented fallback (fail-closed for relevance,
//! deterministic fallback for ranking, abort for term derivation).

/// Finds the first standalone `true`/`false` token in the reply.
pub fn first_bool(text: &str) -> Option<bool> {
    for token in text.split(|c: char| !c.is_ascii_alphanumeric()) {
        if token.eq_ignore_ascii_case("true") {
            return Some(true);
        }
        if token.eq_ignore_ascii_case("false") {
            return Some(false);
        }
    }
    None
}

/// Finds which of `candidates` the reply names, by earliest occurrence.
/// Returns `None` when the reply mentions none of them.
pub fn find_candidate_id(text: &str, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|id| text.find(*id).map(|pos| (pos, *id)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, id)| id.to_string())
}

/// Extracts the first non-empty line, stripping surrounding quotes and code
/// fences. Used for single-value replies such as the normalized search term.
pub fn first_line(text: &str) -> Option<String> {
    text.lines()
        .map(|line| line.trim().trim_matches('`').trim_matches('"').trim_matches('\'').trim())
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
