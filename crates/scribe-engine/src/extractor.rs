//! Line classifier for WebDriver protocol logs.
//!
//! Recognizers run in a fixed priority order and the first match wins, so a
//! line yields at most one event:
//! 1. locator (`"value": "//..."`)
//! 2. element reference (`"ELEMENT"` or the W3C element key)
//! 3. click (`/element/<id>/click`)
//! 4. value target (`/element/<id>/value`)
//! 5. typed text (`"text": "..."`)
//!
//! Clicks and value targets are taken from request lines only. The driver
//! logs each command twice (`--> POST ...` and `<-- POST ... 200`), and the
//! response echo must not count as a second interaction.

use regex::Regex;
use scribe_common::ExtractedEvent;
use std::sync::LazyLock;

/// W3C WebDriver element reference key.
pub const W3C_ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";
/// Pre-W3C (JSONWP) element reference key.
pub const LEGACY_ELEMENT_KEY: &str = "ELEMENT";
/// Marker the Appium HTTP logger puts in front of response lines.
pub const RESPONSE_MARKER: &str = "<--";

static LOCATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""value"\s*:\s*"(//(?:[^"\\]|\\.)*)""#).unwrap());
static ELEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#""(?:{}|{})"\s*:\s*"((?:[^"\\]|\\.)+)""#,
        W3C_ELEMENT_KEY, LEGACY_ELEMENT_KEY
    ))
    .unwrap()
});
static CLICK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"/element/([^/\s"?]+)/click"#).unwrap());
static VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"/element/([^/\s"?]+)/value"#).unwrap());
static TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""text"\s*:\s*"((?:[^"\\]|\\.)+)""#).unwrap());

type Recognizer = fn(&str) -> Option<ExtractedEvent>;

const RECOGNIZERS: [Recognizer; 5] = [
    locator_discovered,
    element_bound,
    interaction_click,
    interaction_value_target,
    interaction_text,
];

/// Classify one log line. Lines that match nothing yield `None`.
pub fn extract(line: &str) -> Option<ExtractedEvent> {
    RECOGNIZERS.iter().find_map(|recognize| recognize(line))
}

fn locator_discovered(line: &str) -> Option<ExtractedEvent> {
    let caps = LOCATOR_RE.captures(line)?;
    Some(ExtractedEvent::LocatorDiscovered(unescape(&caps[1])))
}

fn element_bound(line: &str) -> Option<ExtractedEvent> {
    let caps = ELEMENT_RE.captures(line)?;
    Some(ExtractedEvent::ElementBound(unescape(&caps[1])))
}

fn interaction_click(line: &str) -> Option<ExtractedEvent> {
    if is_response(line) {
        return None;
    }
    let caps = CLICK_RE.captures(line)?;
    Some(ExtractedEvent::InteractionClick(caps[1].to_string()))
}

fn interaction_value_target(line: &str) -> Option<ExtractedEvent> {
    if is_response(line) {
        return None;
    }
    let caps = VALUE_RE.captures(line)?;
    Some(ExtractedEvent::InteractionValueTarget(caps[1].to_string()))
}

fn interaction_text(line: &str) -> Option<ExtractedEvent> {
    let caps = TEXT_RE.captures(line)?;
    Some(ExtractedEvent::InteractionText(unescape(&caps[1])))
}

fn is_response(line: &str) -> bool {
    line.contains(RESPONSE_MARKER)
}

/// Decode JSON string escapes in a captured literal body. Malformed escapes
/// keep the raw text.
fn unescape(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_string();
    }
    serde_json::from_str::<String>(&format!("\"{}\"", raw)).unwrap_or_else(|_| raw.to_string())
}
