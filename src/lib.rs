//! Splitting text into argument vectors and expanding `@file` response-file
//! references inside them.

pub mod argv;
pub mod error;
pub mod parser;
pub mod response;

pub use argv::{ArgVector, duplicate, release};
pub use error::{ConfigError, ExpandError};
pub use parser::{split, tokenize};
pub use response::{ExpandOptions, HostFs, Lookup, ResponseFileSource, expand, expand_with};
