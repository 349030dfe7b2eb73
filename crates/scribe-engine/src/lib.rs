pub mod check;
pub mod config;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod naming;
pub mod reader;
pub mod registry;
pub mod runner;
pub mod writer;

pub use scribe_common::{action, event, script};

pub use engine::{CorrelationEngine, DropReason, Outcome};
pub use error::ScribeError;
pub use extractor::extract;
pub use naming::{NamingError, NamingOracle, OfflineOracle};
pub use reader::{LogLine, LogReader};
pub use registry::ElementRegistry;
pub use runner::{RunSummary, run, start};
pub use writer::{ArtifactSink, FileArtifacts};
