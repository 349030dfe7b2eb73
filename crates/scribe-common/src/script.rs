//! Parser for the plain-text step scripts the recorder produces.
//!
//! The replay side understands a slightly larger vocabulary than the recorder
//! emits (navigation and visibility checks are written by hand), so the parser
//! accepts all of it. Blank lines and `#` comments are skipped.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

static NAVIGATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Navigate to (.+)$").unwrap());
static VERIFY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Verify (.+) is visible$").unwrap());
static TAP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Tap on (.+)$").unwrap());
// Greedy text group: "Type a in b in Field" types "a in b".
static TYPE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^Type (.+) in (.+)$").unwrap());
static WAIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Wait for (\d+)(?: seconds?)?$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ScriptStep {
    OpenBrowser,
    Navigate { url: String },
    Verify { name: String },
    Tap { name: String },
    Type { text: String, name: String },
    Wait { secs: u64 },
}

impl ScriptStep {
    /// The registry name this step depends on, if any.
    pub fn element_name(&self) -> Option<&str> {
        match self {
            ScriptStep::Verify { name } | ScriptStep::Tap { name } | ScriptStep::Type { name, .. } => {
                Some(name.as_str())
            }
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unrecognized step '{content}'")]
    Unrecognized { line: usize, content: String },
    #[error("line {line}: invalid wait duration '{value}'")]
    InvalidWait { line: usize, value: String },
}

/// A step together with the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStep {
    pub line: usize,
    pub step: ScriptStep,
}

pub fn parse_script(input: &str) -> Result<Vec<ParsedStep>, ScriptError> {
    let mut steps = Vec::new();
    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        steps.push(ParsedStep {
            line,
            step: parse_step(trimmed, line)?,
        });
    }
    Ok(steps)
}

fn parse_step(step: &str, line: usize) -> Result<ScriptStep, ScriptError> {
    if step.eq_ignore_ascii_case("Open Browser") {
        return Ok(ScriptStep::OpenBrowser);
    }
    if let Some(caps) = NAVIGATE_RE.captures(step) {
        return Ok(ScriptStep::Navigate {
            url: caps[1].trim().to_string(),
        });
    }
    if let Some(caps) = VERIFY_RE.captures(step) {
        return Ok(ScriptStep::Verify {
            name: caps[1].trim().to_string(),
        });
    }
    if let Some(caps) = TAP_RE.captures(step) {
        return Ok(ScriptStep::Tap {
            name: caps[1].trim().to_string(),
        });
    }
    if let Some(caps) = TYPE_RE.captures(step) {
        return Ok(ScriptStep::Type {
            text: caps[1].trim().to_string(),
            name: caps[2].trim().to_string(),
        });
    }
    if let Some(caps) = WAIT_RE.captures(step) {
        let secs = caps[1].parse().map_err(|_| ScriptError::InvalidWait {
            line,
            value: caps[1].to_string(),
        })?;
        return Ok(ScriptStep::Wait { secs });
    }
    Err(ScriptError::Unrecognized {
        line,
        content: step.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recorded_script() {
        let script = "Tap on LoginButton\nWait for 2\nType hello in EmailField\nWait for 1\n";
        let steps: Vec<ScriptStep> = parse_script(script)
            .unwrap()
            .into_iter()
            .map(|p| p.step)
            .collect();
        assert_eq!(
            steps,
            vec![
                ScriptStep::Tap {
                    name: "LoginButton".into()
                },
                ScriptStep::Wait { secs: 2 },
                ScriptStep::Type {
                    text: "hello".into(),
                    name: "EmailField".into()
                },
                ScriptStep::Wait { secs: 1 },
            ]
        );
    }

    #[test]
    fn test_parse_hand_written_steps() {
        let script = "# login flow\n\nopen browser\nNavigate to https://example.com\nVerify Logo is visible\nWait for 3 seconds";
        let steps = parse_script(script).unwrap();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].step, ScriptStep::OpenBrowser);
        assert_eq!(steps[0].line, 3);
        assert_eq!(
            steps[1].step,
            ScriptStep::Navigate {
                url: "https://example.com".into()
            }
        );
        assert_eq!(steps[2].step.element_name(), Some("Logo"));
        assert_eq!(steps[3].step, ScriptStep::Wait { secs: 3 });
    }

    #[test]
    fn test_type_text_may_contain_in() {
        let steps = parse_script("Type sign in now in SearchField").unwrap();
        assert_eq!(
            steps[0].step,
            ScriptStep::Type {
                text: "sign in now".into(),
                name: "SearchField".into()
            }
        );
    }

    #[test]
    fn test_unrecognized_line_reports_position() {
        let err = parse_script("Tap on A\nSwipe left").unwrap_err();
        assert_eq!(
            err,
            ScriptError::Unrecognized {
                line: 2,
                content: "Swipe left".into()
            }
        );
    }

    #[test]
    fn test_wait_overflow_is_an_error() {
        let err = parse_script("Wait for 99999999999999999999999").unwrap_err();
        assert!(matches!(err, ScriptError::InvalidWait { line: 1, .. }));
    }
}
