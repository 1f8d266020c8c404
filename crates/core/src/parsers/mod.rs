pub mod trace;

pub use trace::{TraceOptions, TraceParseError, parse_trace};
