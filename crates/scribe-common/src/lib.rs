pub mod action;
pub mod event;
pub mod script;

pub use action::ActionRecord;
pub use event::ExtractedEvent;
pub use script::{ParsedStep, ScriptError, ScriptStep, parse_script};
