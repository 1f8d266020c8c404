use serde::{Deserialize, Serialize};

use crate::types::Color;

/// A single, stateless graph description instruction.
///
/// The core emits a `Vec<GraphCommand>` for a call graph. Serializers consume
/// this list sequentially — each command carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GraphCommand {
    /// Open a directed graph. Every later node inherits `node_style`.
    BeginGraph { name: String, node_style: NodeStyle },

    /// Declare a node once, keyed by its unique rendering identity.
    DeclareNode {
        id: String,
        label: String,
        fill: Color,
    },

    /// Declare a directed edge between two previously identified nodes.
    DeclareEdge {
        from: String,
        to: String,
        label: String,
    },

    /// Close the graph opened by the matching `BeginGraph`.
    EndGraph,
}

/// Default attributes applied to all nodes of a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub shape: String,
    pub style: String,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            shape: "box".to_string(),
            style: "filled".to_string(),
        }
    }
}
