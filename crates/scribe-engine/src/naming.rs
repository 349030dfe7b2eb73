//! Symbolic names for locators.
//!
//! An external [`NamingOracle`] is asked first. Its reply is only trusted when
//! it looks like an identifier; anything else, including every oracle error,
//! falls back to a deterministic name derived from the locator itself.

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, warn};

/// Accepted names are strictly shorter than this many characters.
pub const MAX_NAME_LEN: usize = 40;
pub const DYNAMIC_PREFIX: &str = "DynamicElement";

static CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^//\s*([A-Za-z_][A-Za-z0-9_.]*)").unwrap());
static NAME_ATTR_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["name", "label", "content-desc"]
        .iter()
        .map(|attr| Regex::new(&format!(r#"@{}\s*=\s*['"]([^'"]+)['"]"#, attr)).unwrap())
        .collect()
});

#[derive(Debug, Error)]
pub enum NamingError {
    #[error("naming oracle is offline")]
    Offline,
    #[error("naming request failed: {0}")]
    Request(String),
    #[error("naming request timed out")]
    Timeout,
    #[error("malformed oracle response: {0}")]
    MalformedResponse(String),
}

/// Suggests a symbolic name for a locator.
#[async_trait]
pub trait NamingOracle: Send + Sync {
    async fn suggest_name(&self, locator: &str) -> Result<String, NamingError>;
}

/// Oracle used when no credentials are configured. Always fails, so every
/// name comes from the fallback policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineOracle;

#[async_trait]
impl NamingOracle for OfflineOracle {
    async fn suggest_name(&self, _locator: &str) -> Result<String, NamingError> {
        Err(NamingError::Offline)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameSource {
    Oracle,
    Attribute,
    Synthesized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameChoice {
    pub name: String,
    pub source: NameSource,
}

/// Pick a name for `locator`. `entry_count` is the number of registry
/// entries created so far.
pub async fn choose_name(
    oracle: &dyn NamingOracle,
    locator: &str,
    entry_count: usize,
) -> NameChoice {
    match oracle.suggest_name(locator).await {
        Ok(reply) => {
            let candidate = reply.trim();
            if is_acceptable(candidate) {
                return NameChoice {
                    name: candidate.to_string(),
                    source: NameSource::Oracle,
                };
            }
            warn!("Rejected oracle name {:?} for {}", candidate, locator);
        }
        Err(NamingError::Offline) => debug!("Naming oracle offline, using fallback"),
        Err(e) => warn!("Naming oracle failed for {}: {}", locator, e),
    }
    fallback_name(locator, entry_count)
}

/// Shorter than [`MAX_NAME_LEN`], non-empty, no whitespace.
pub fn is_acceptable(name: &str) -> bool {
    !name.is_empty()
        && name.chars().count() < MAX_NAME_LEN
        && !name.chars().any(char::is_whitespace)
}

pub fn fallback_name(locator: &str, entry_count: usize) -> NameChoice {
    if let Some(name) = attribute_name(locator)
        && is_acceptable(&name)
    {
        return NameChoice {
            name,
            source: NameSource::Attribute,
        };
    }
    NameChoice {
        name: format!("{}_{}", DYNAMIC_PREFIX, entry_count + 1),
        source: NameSource::Synthesized,
    }
}

/// Name-style attribute value with whitespace removed, plus a role word for
/// the element class when the value does not already end with it.
fn attribute_name(locator: &str) -> Option<String> {
    let value = NAME_ATTR_RES
        .iter()
        .find_map(|re| re.captures(locator).map(|caps| caps[1].to_string()))?;
    let mut name: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    if name.is_empty() {
        return None;
    }
    if let Some(role) = element_class(locator).and_then(role_suffix)
        && !name.to_lowercase().ends_with(&role.to_lowercase())
    {
        name.push_str(role);
    }
    Some(name)
}

fn element_class(locator: &str) -> Option<&str> {
    CLASS_RE
        .captures(locator)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn role_suffix(class: &str) -> Option<&'static str> {
    let role = match class {
        "android.widget.TextView" => "Label",
        "android.widget.EditText" => "Field",
        _ => {
            let short = class
                .strip_prefix("XCUIElementType")
                .or_else(|| class.rsplit('.').next())
                .unwrap_or(class);
            match short {
                "Button" | "ImageButton" => "Button",
                "TextField" | "SecureTextField" | "SearchField" | "TextView" => "Field",
                "StaticText" => "Label",
                "Switch" | "Toggle" => "Switch",
                "Cell" => "Cell",
                "Image" | "ImageView" | "Icon" => "Image",
                "Link" => "Link",
                "CheckBox" => "Checkbox",
                "Picker" | "PickerWheel" | "Spinner" => "Picker",
                "Slider" | "SeekBar" => "Slider",
                "Tab" => "Tab",
                _ => return None,
            }
        }
    };
    Some(role)
}
