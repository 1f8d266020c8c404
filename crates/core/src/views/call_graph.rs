use std::collections::HashSet;

use callgraph_protocol::{Color, GraphCommand, NodeStyle};

use crate::model::{CallTree, NodeId};

/// Fill color of a node spending 100% of the baseline time. Cooler nodes get
/// the same hue with a lower alpha.
pub const BASE_FILL: Color = Color::rgb(0xff, 0x97, 0x97);

pub const GRAPH_NAME: &str = "G";

/// Render the call graph below `root` as graph commands.
///
/// Nodes are declared once per rendering identity in depth-first order.
/// Children are visited in first-call order, and the edge to a child is
/// emitted after the child's own subtree. Percentages are relative to
/// `overall_millis`, normally the total time of the main method.
pub fn render_call_graph(tree: &CallTree, root: NodeId, overall_millis: f64) -> Vec<GraphCommand> {
    let mut commands = Vec::with_capacity(tree.len() * 2 + 2);
    commands.push(GraphCommand::BeginGraph {
        name: GRAPH_NAME.to_string(),
        node_style: NodeStyle::default(),
    });

    let mut visited = HashSet::new();
    visit(tree, root, overall_millis, &mut visited, &mut commands);

    commands.push(GraphCommand::EndGraph);
    commands
}

fn visit(
    tree: &CallTree,
    id: NodeId,
    overall_millis: f64,
    visited: &mut HashSet<String>,
    commands: &mut Vec<GraphCommand>,
) {
    let Some(node) = tree.node(id) else {
        return;
    };
    let caller_id = tree.identifier(id);

    if visited.insert(caller_id.clone()) {
        let millis = node.total_millis();
        let percentage = tree.percentage(id, overall_millis);
        commands.push(GraphCommand::DeclareNode {
            id: caller_id.clone(),
            label: node_label(node.simple_name(), millis, percentage),
            fill: fill_color(BASE_FILL, percentage),
        });
    }

    for &child in &node.children {
        visit(tree, child, overall_millis, visited, commands);

        let direct = tree.node(child).map_or(0, |c| c.direct_calls);
        let indirect = tree.recursive_calls(child).saturating_sub(direct);
        commands.push(GraphCommand::DeclareEdge {
            from: caller_id.clone(),
            to: tree.identifier(child),
            label: edge_label(direct, indirect),
        });
    }
}

/// `step (~12.35ms -- 4.2%)`
pub fn node_label(simple_name: &str, millis: f64, percentage: f64) -> String {
    format!("{simple_name} (~{millis:.2}ms -- {percentage:.1}%)")
}

/// `1,200 (+ 35 indir.)`
pub fn edge_label(direct: u64, indirect: u64) -> String {
    format!(
        "{} (+ {} indir.)",
        group_thousands(direct),
        group_thousands(indirect)
    )
}

/// `base` with an alpha channel proportional to `percentage`, clamped to
/// 0..=100 first. NaN counts as 0.
pub fn fill_color(base: Color, percentage: f64) -> Color {
    let percentage = if percentage.is_nan() {
        0.0
    } else {
        percentage.clamp(0.0, 100.0)
    };
    base.with_alpha((255.0 * percentage / 100.0) as u8)
}

/// Decimal digits grouped by `,` every three places.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
