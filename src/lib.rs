//! Wrapper around the system ping binary.
//!
//! Running ping is the easy half: [`Platform`] maps each known OS
//! variant to its flag set and argument order, and [`PingExecutor`]
//! locates the binary and captures its output. The interesting half is
//! [`parser::parse`], which extracts a consistent [`PingResult`] from
//! any of the ping output flavors in the wild using ordered heuristics
//! instead of per-OS grammars. Fields that a given flavor does not
//! print come back as `None` rather than failing the parse.

pub mod config;
pub mod error;
pub mod parser;
pub mod ping_executor;
pub mod platform;
pub mod result;

pub use error::{ParseError, PingError};
pub use parser::parse;
pub use ping_executor::{PingExecutor, ProbeReport};
pub use platform::{PingOptions, Platform};
pub use result::{PingResult, RoundTrip};
