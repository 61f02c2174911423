//! The query subsystem (§4.6, §4.7): parses a query string into ordered
//! groups and dispatches it against a loaded index.

pub mod engine;
pub mod parser;

pub use engine::{QueryEngine, QueryResponse, ScoredDocument};
pub use parser::{Command, Query};
