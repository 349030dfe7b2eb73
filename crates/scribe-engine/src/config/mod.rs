pub mod loader;
pub mod schema;

pub use loader::{ConfigError, ConfigLoader};
pub use schema::{
    CollisionPolicy, CorrelationConfig, OracleConfig, PathsConfig, ReaderConfig, ScribeConfig,
    TypeTargetPolicy,
};
