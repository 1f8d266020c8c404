//! Aggregated call graphs from k-perf method traces.
//!
//! A trace log of method enter/exit events is folded into a [`model::CallTree`]
//! by [`parsers::parse_trace`], turned into graph commands by
//! [`views::call_graph`], and serialized as Graphviz DOT by [`dot`].

pub mod dot;
pub mod model;
pub mod parsers;
pub mod render;
pub mod views;
