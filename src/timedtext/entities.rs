use quick_xml::escape::resolve_html5_entity;

// @module: HTML fragment decoding for cue text

/// Longest entity name worth looking up (`&CounterClockwiseContourIntegral;`)
const MAX_ENTITY_LEN: usize = 32;

/// Turns a fragment of HTML into plain text
pub trait EntityDecoder: Send + Sync {
    /// Decode `text`, returning plain text
    fn decode(&self, text: &str) -> String;
}

/// Default decoder: drops markup tags, then resolves named and numeric
/// character references. Unknown references are left as written.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlEntityDecoder;

impl EntityDecoder for HtmlEntityDecoder {
    fn decode(&self, text: &str) -> String {
        decode_html_fragment(text)
    }
}

/// Plain text of an HTML fragment, as a browser would render it
pub fn decode_html_fragment(text: &str) -> String {
    resolve_references(&strip_tags(text))
}

/// Remove `<tag ...>`, `</tag>`, `<!-- ... -->` and `<?...>` constructs.
///
/// A `<` not followed by a tag-start character is text, and so is a tag that
/// never closes.
fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        let candidate = &rest[lt..];
        let opens_tag = candidate[1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'));

        let end = if !opens_tag {
            None
        } else if candidate.starts_with("<!--") {
            candidate.find("-->").map(|i| i + 3)
        } else {
            candidate.find('>').map(|i| i + 1)
        };

        match end {
            Some(len) => rest = &candidate[len..],
            None => {
                out.push('<');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Resolve `&name;`, `&#NNN;` and `&#xHHH;` references
fn resolve_references(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp + 1..];

        let resolved = candidate
            .char_indices()
            .take(MAX_ENTITY_LEN + 1)
            .find(|&(_, c)| c == ';')
            .and_then(|(semi, _)| resolve_entity(&candidate[..semi]).map(|r| (r, semi)));

        match resolved {
            Some((replacement, semi)) => {
                out.push_str(&replacement);
                rest = &candidate[semi + 1..];
            }
            None => {
                out.push('&');
                rest = candidate;
            }
        }
    }

    out.push_str(rest);
    out
}

fn resolve_entity(name: &str) -> Option<String> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        let ch = char::from_u32(code)
            .filter(|&c| c != '\0')
            .unwrap_or('\u{FFFD}');
        return Some(ch.to_string());
    }

    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    resolve_html5_entity(name).map(str::to_string)
}
