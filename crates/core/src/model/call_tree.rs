use std::collections::HashMap;

use serde::Serialize;

use super::symbols::SymbolTable;

/// Method id of the synthetic root. No instrumented method can use it.
pub const ROOT_METHOD_ID: &str = "9223372036854775807";
pub const ROOT_NAME: &str = "system";

/// Index of a node inside its `CallTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// One calling context of a method.
///
/// The same `method_id` shows up as several nodes when it is reached through
/// different call chains; calls from the same chain are merged into one node.
#[derive(Debug, Clone, Serialize)]
pub struct MethodNode {
    pub method_id: String,
    /// Fully-qualified name from the symbol table, or a placeholder naming the id.
    pub name: String,
    /// Calling context. `None` only for the root.
    pub caller: Option<NodeId>,
    /// Number of enter events that produced this node under its caller.
    pub direct_calls: u64,
    /// Duration of every completed call in microseconds, in trace order.
    pub durations: Vec<u64>,
    /// Callees in first-call order.
    pub children: Vec<NodeId>,
    #[serde(skip)]
    child_index: HashMap<String, NodeId>,
}

impl MethodNode {
    fn new(method_id: String, name: String, caller: Option<NodeId>) -> Self {
        Self {
            method_id,
            name,
            caller,
            direct_calls: 0,
            durations: Vec::new(),
            children: Vec::new(),
            child_index: HashMap::new(),
        }
    }

    pub fn total_micros(&self) -> u64 {
        self.durations.iter().sum()
    }

    pub fn total_millis(&self) -> f64 {
        self.total_micros() as f64 / 1000.0
    }

    /// Last `.`-separated component of the qualified name.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// Aggregated call tree built from a trace.
///
/// Nodes live in an arena and are owned top-down by the tree; `caller` is a
/// plain index used for lineage lookups only. Node 0 is the synthetic root.
#[derive(Debug, Clone, Serialize)]
pub struct CallTree {
    nodes: Vec<MethodNode>,
}

impl CallTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![MethodNode::new(
                ROOT_METHOD_ID.to_string(),
                ROOT_NAME.to_string(),
                None,
            )],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn node(&self, id: NodeId) -> Option<&MethodNode> {
        self.nodes.get(id.0)
    }

    /// Number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no method was ever entered.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &MethodNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// The child of `id` created for calls to `method_id`, if any.
    pub fn child(&self, id: NodeId, method_id: &str) -> Option<NodeId> {
        self.node(id)?.child_index.get(method_id).copied()
    }

    /// The first top-level method. Its total time is the 100% baseline.
    pub fn main(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT).first().copied()
    }

    pub fn overall_millis(&self) -> f64 {
        self.main().map_or(0.0, |id| self.total_millis(id))
    }

    pub fn total_micros(&self, id: NodeId) -> u64 {
        self.node(id).map_or(0, MethodNode::total_micros)
    }

    pub fn total_millis(&self, id: NodeId) -> f64 {
        self.node(id).map_or(0.0, MethodNode::total_millis)
    }

    /// Share of `overall_millis` spent in `id`, in percent.
    /// A non-positive baseline yields 0.
    pub fn percentage(&self, id: NodeId, overall_millis: f64) -> f64 {
        if overall_millis.is_nan() || overall_millis <= 0.0 {
            return 0.0;
        }
        self.total_millis(id) / overall_millis * 100.0
    }

    /// Direct calls of `id` plus the direct calls of every node below it.
    pub fn recursive_calls(&self, id: NodeId) -> u64 {
        let mut total = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.node(current) {
                total += node.direct_calls;
                stack.extend_from_slice(&node.children);
            }
        }
        total
    }

    /// Rendering identity: the method id followed by the ids of every caller
    /// up to the root, joined with `from`.
    pub fn identifier(&self, id: NodeId) -> String {
        let mut parts: Vec<&str> = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.node(c)) {
            parts.push(&node.method_id);
            current = node.caller;
        }
        parts.join("from")
    }

    /// Record a call from `caller` to `method_id`, creating the callee node on
    /// first use. Returns the callee.
    pub(crate) fn enter(
        &mut self,
        caller: NodeId,
        method_id: &str,
        symbols: &SymbolTable,
    ) -> NodeId {
        let callee = match self.child(caller, method_id) {
            Some(existing) => existing,
            None => {
                let id = NodeId(self.nodes.len());
                let name = symbols.resolve(method_id).into_owned();
                self.nodes
                    .push(MethodNode::new(method_id.to_string(), name, Some(caller)));
                if let Some(parent) = self.nodes.get_mut(caller.0) {
                    parent.children.push(id);
                    parent.child_index.insert(method_id.to_string(), id);
                }
                id
            }
        };
        if let Some(node) = self.nodes.get_mut(callee.0) {
            node.direct_calls += 1;
        }
        callee
    }

    pub(crate) fn record_exit(&mut self, id: NodeId, micros: u64) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.durations.push(micros);
        }
    }
}

impl Default for CallTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols() -> SymbolTable {
        SymbolTable::from_iter([
            ("0", "game.gol.main"),
            ("1", "game.gol.GameOfLife.step"),
            ("2", "game.gol.Cell.isAlive"),
        ])
    }

    #[test]
    fn new_tree_has_only_root() {
        let tree = CallTree::new();
        assert_eq!(tree.len(), 1);
        assert!(tree.is_empty());
        assert!(tree.main().is_none());
        let root = tree.node(tree.root()).unwrap();
        assert_eq!(root.method_id, ROOT_METHOD_ID);
        assert_eq!(root.name, "system");
        assert!(root.caller.is_none());
        assert_eq!(tree.identifier(tree.root()), ROOT_METHOD_ID);
    }

    #[test]
    fn repeated_enter_reuses_child() {
        let symbols = symbols();
        let mut tree = CallTree::new();
        let main = tree.enter(NodeId::ROOT, "0", &symbols);
        let first = tree.enter(main, "1", &symbols);
        let second = tree.enter(main, "1", &symbols);
        assert_eq!(first, second);
        assert_eq!(tree.children(main), &[first]);
        assert_eq!(tree.node(first).unwrap().direct_calls, 2);
        assert_eq!(tree.child(main, "1"), Some(first));
        assert_eq!(tree.child(main, "2"), None);
    }

    #[test]
    fn identifier_walks_caller_chain() {
        let symbols = symbols();
        let mut tree = CallTree::new();
        let main = tree.enter(NodeId::ROOT, "0", &symbols);
        let step = tree.enter(main, "1", &symbols);
        let alive = tree.enter(step, "2", &symbols);
        assert_eq!(tree.identifier(main), format!("0from{ROOT_METHOD_ID}"));
        assert_eq!(
            tree.identifier(alive),
            format!("2from1from0from{ROOT_METHOD_ID}")
        );
    }

    #[test]
    fn durations_sum_to_total() {
        let symbols = symbols();
        let mut tree = CallTree::new();
        let main = tree.enter(NodeId::ROOT, "0", &symbols);
        for micros in [100, 200, 300] {
            tree.record_exit(main, micros);
        }
        assert_eq!(tree.total_micros(main), 600);
        assert!((tree.total_millis(main) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn percentage_of_baseline() {
        let symbols = symbols();
        let mut tree = CallTree::new();
        let main = tree.enter(NodeId::ROOT, "0", &symbols);
        let step = tree.enter(main, "1", &symbols);
        tree.record_exit(step, 250_000);
        tree.record_exit(main, 1_000_000);
        assert_eq!(tree.overall_millis(), 1000.0);
        assert_eq!(tree.percentage(step, 1000.0), 25.0);
        assert_eq!(tree.percentage(step, 0.0), 0.0);
    }

    #[test]
    fn recursive_calls_sum_subtree() {
        let symbols = symbols();
        let mut tree = CallTree::new();
        let x = tree.enter(NodeId::ROOT, "0", &symbols);
        tree.enter(NodeId::ROOT, "0", &symbols);
        for _ in 0..3 {
            tree.enter(x, "1", &symbols);
        }
        assert_eq!(tree.node(x).unwrap().direct_calls, 2);
        assert_eq!(tree.recursive_calls(x), 5);
    }

    #[test]
    fn simple_name_strips_qualifier() {
        let symbols = symbols();
        let mut tree = CallTree::new();
        let main = tree.enter(NodeId::ROOT, "0", &symbols);
        assert_eq!(tree.node(main).unwrap().simple_name(), "main");
        let unknown = tree.enter(main, "99", &symbols);
        assert_eq!(
            tree.node(unknown).unwrap().simple_name(),
            "method name not found in symbols file for method 99"
        );
    }
}
