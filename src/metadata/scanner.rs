// @module: Brace-matching extraction of JSON object literals from script text

/// Scanner state while walking an object literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Outside any string literal
    Code,
    /// Inside a double-quoted string
    InString,
    /// Right after a backslash inside a string
    Escape,
}

/// Cut the balanced `{...}` object starting at byte offset `open`.
///
/// Braces inside double-quoted strings (including escaped quotes) are not
/// counted. Runs in a single pass over the input; returns `None` when `open`
/// is not a `{` or the object is never closed.
pub fn balanced_object_at(text: &str, open: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'{') {
        return None;
    }

    let mut state = ScanState::Code;
    let mut depth: usize = 0;

    for (offset, &byte) in bytes[open..].iter().enumerate() {
        state = match (state, byte) {
            (ScanState::Code, b'{') => {
                depth += 1;
                ScanState::Code
            }
            (ScanState::Code, b'}') => {
                depth -= 1;
                if depth == 0 {
                    // '}' is ASCII, so open + offset + 1 is a char boundary
                    return Some(&text[open..open + offset + 1]);
                }
                ScanState::Code
            }
            (ScanState::Code, b'"') => ScanState::InString,
            (ScanState::Code, _) => ScanState::Code,
            (ScanState::InString, b'\\') => ScanState::Escape,
            (ScanState::InString, b'"') => ScanState::Code,
            (ScanState::InString, _) => ScanState::InString,
            (ScanState::Escape, _) => ScanState::InString,
        };
    }

    None
}

/// Every balanced object that follows an occurrence of `marker`.
///
/// For each occurrence the first `{` after it opens the candidate; occurrences
/// without a closed object are skipped.
pub fn objects_after<'a>(text: &'a str, marker: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    text.match_indices(marker).filter_map(move |(idx, _)| {
        let after = idx + marker.len();
        let open = after + text[after..].find('{')?;
        balanced_object_at(text, open)
    })
}
