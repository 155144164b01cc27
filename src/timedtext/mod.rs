/*!
 * Parser for timed-text XML payloads.
 *
 * Two dialects are recognised and detected automatically:
 * - flat cues: `<text start="1.0" dur="2.5">...</text>`, times in seconds
 * - paragraphs: `<p t="1000" d="2500">...</p>`, times in milliseconds
 *
 * The flat dialect wins whenever it yields at least one cue; the paragraph
 * dialect is only consulted otherwise. Cue text is run through an
 * `EntityDecoder` and trimmed, and empty cues are dropped. Source order is
 * preserved.
 */

use log::{debug, error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ParseError;
use crate::metadata::json_path::preview;
use crate::subtitle_processor::Cue;

pub mod dom;
pub mod entities;

pub use entities::{EntityDecoder, HtmlEntityDecoder};

use dom::Element;

// @const: Leading decimal number, the way attribute values are read leniently
static LEADING_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").unwrap()
});

/// Tag of the inline wrapper the paragraph dialect sometimes nests text in
const SPAN_TAG: &str = "s";

/// Which XML schema a payload used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `<text start dur>` in seconds
    FlatCue,
    /// `<p t d>` in milliseconds
    Paragraph,
}

/// Result of scanning one dialect
struct DialectScan {
    cues: Vec<Cue>,
    /// Elements whose timing attributes were usable, text or not
    timed_elements: usize,
}

/// Timed-text parser with a pluggable HTML decoder
#[derive(Debug, Clone, Default)]
pub struct TimedTextParser<D: EntityDecoder = HtmlEntityDecoder> {
    decoder: D,
}

impl TimedTextParser<HtmlEntityDecoder> {
    /// Parser using the default HTML decoder
    pub fn new() -> Self {
        Self {
            decoder: HtmlEntityDecoder,
        }
    }
}

impl<D: EntityDecoder> TimedTextParser<D> {
    /// Parser using a custom decoder
    pub fn with_decoder(decoder: D) -> Self {
        Self { decoder }
    }

    /// Parse a payload into cues.
    ///
    /// `Ok(vec![])` means timed elements were present but every one of them
    /// had empty text; `Err` means the XML was malformed or no dialect matched.
    pub fn parse(&self, xml: &str) -> Result<Vec<Cue>, ParseError> {
        self.parse_with_dialect(xml).map(|(cues, _)| cues)
    }

    /// Like `parse`, also reporting which dialect produced the cues
    pub fn parse_with_dialect(&self, xml: &str) -> Result<(Vec<Cue>, Dialect), ParseError> {
        let root = dom::parse_document(xml).inspect_err(|e| {
            error!("Subtitle XML could not be parsed: {}", e);
            debug!("Raw payload: {}", preview(xml, 500));
        })?;

        let flat = self.scan_flat_cues(&root);
        if !flat.cues.is_empty() {
            info!("Parsed {} cue(s) from <text> elements", flat.cues.len());
            return Ok((flat.cues, Dialect::FlatCue));
        }

        debug!("No usable <text> cues, trying <p> elements");
        let paragraphs = self.scan_paragraphs(&root);
        if !paragraphs.cues.is_empty() {
            info!("Parsed {} cue(s) from <p> elements", paragraphs.cues.len());
            return Ok((paragraphs.cues, Dialect::Paragraph));
        }

        if paragraphs.timed_elements > 0 {
            warn!("All {} <p> cue(s) were empty", paragraphs.timed_elements);
            return Ok((Vec::new(), Dialect::Paragraph));
        }
        if flat.timed_elements > 0 {
            warn!("All {} <text> cue(s) were empty", flat.timed_elements);
            return Ok((Vec::new(), Dialect::FlatCue));
        }

        warn!("Neither <text> nor <p> subtitle entries found in payload");
        Err(ParseError::NoRecognizedCues)
    }

    fn scan_flat_cues(&self, root: &Element) -> DialectScan {
        let mut scan = DialectScan {
            cues: Vec::new(),
            timed_elements: 0,
        };

        for node in root.elements_named("text") {
            let (Some(start), Some(duration)) = (
                node.attribute("start").and_then(parse_number),
                node.attribute("dur").and_then(parse_number),
            ) else {
                continue;
            };
            scan.timed_elements += 1;

            if let Some(cue) = self.make_cue(start, duration, &node.text_content()) {
                scan.cues.push(cue);
            }
        }

        scan
    }

    fn scan_paragraphs(&self, root: &Element) -> DialectScan {
        let mut scan = DialectScan {
            cues: Vec::new(),
            timed_elements: 0,
        };

        for node in root.elements_named("p") {
            let (Some(start_ms), Some(duration_ms)) = (
                node.attribute("t").and_then(parse_number),
                node.attribute("d").and_then(parse_number),
            ) else {
                continue;
            };
            scan.timed_elements += 1;

            if let Some(cue) = self.make_cue(start_ms / 1000.0, duration_ms / 1000.0, &paragraph_text(node)) {
                scan.cues.push(cue);
            }
        }

        scan
    }

    fn make_cue(&self, start: f64, duration: f64, raw_text: &str) -> Option<Cue> {
        let text = self.decoder.decode(raw_text);
        let text = text.trim();
        (!text.is_empty()).then(|| Cue::new(start, start + duration, text))
    }
}

/// Parse a payload with the default decoder
pub fn parse_timed_text(xml: &str) -> Result<Vec<Cue>, ParseError> {
    TimedTextParser::new().parse(xml)
}

/// Text of a `<p>`: a lone `<s>` child supplies it, otherwise all text does
fn paragraph_text(node: &Element) -> String {
    match node.children.as_slice() {
        [dom::Node::Element(span)] if span.name.eq_ignore_ascii_case(SPAN_TAG) => span.text_content(),
        _ => node.text_content(),
    }
}

/// Read the leading number of an attribute value; non-finite values are rejected
fn parse_number(raw: &str) -> Option<f64> {
    LEADING_NUMBER_REGEX
        .find(raw.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|value| value.is_finite())
}
