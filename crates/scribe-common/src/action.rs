use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds to wait after a tap before the next step.
pub const TAP_WAIT_SECS: u32 = 2;
/// Seconds to wait after typing before the next step.
pub const TYPE_WAIT_SECS: u32 = 1;

/// One reconstructed step of user interaction.
///
/// Every record renders as exactly two script lines: the instruction itself
/// followed by a fixed `Wait for <n>` directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionRecord {
    Tap { name: String },
    Type { text: String, name: String },
}

impl ActionRecord {
    pub fn tap(name: impl Into<String>) -> Self {
        ActionRecord::Tap { name: name.into() }
    }

    pub fn type_text(text: impl Into<String>, name: impl Into<String>) -> Self {
        ActionRecord::Type {
            text: text.into(),
            name: name.into(),
        }
    }

    /// Symbolic name of the element the action targets.
    pub fn target(&self) -> &str {
        match self {
            ActionRecord::Tap { name } | ActionRecord::Type { name, .. } => name,
        }
    }

    pub fn wait_secs(&self) -> u32 {
        match self {
            ActionRecord::Tap { .. } => TAP_WAIT_SECS,
            ActionRecord::Type { .. } => TYPE_WAIT_SECS,
        }
    }

    pub fn instruction(&self) -> String {
        match self {
            ActionRecord::Tap { name } => format!("Tap on {}", name),
            ActionRecord::Type { text, name } => {
                format!("Type {} in {}", escape_controls(text), name)
            }
        }
    }

    /// The two script lines, in order.
    pub fn lines(&self) -> [String; 2] {
        [self.instruction(), format!("Wait for {}", self.wait_secs())]
    }
}

/// Render control characters as escapes so typed text never spans lines.
fn escape_controls(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.extend(c.escape_unicode()),
            c => out.push(c),
        }
    }
    out
}

impl fmt::Display for ActionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [instruction, wait] = self.lines();
        write!(f, "{}\n{}", instruction, wait)
    }
}
