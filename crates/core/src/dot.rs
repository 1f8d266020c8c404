//! DOT serializer: converts `GraphCommand` lists into Graphviz graph descriptions.

use callgraph_protocol::GraphCommand;

use crate::model::CallTree;
use crate::parsers::TraceParseError;
use crate::views::call_graph::render_call_graph;

/// Render a list of commands as a DOT document.
///
/// One statement per line, lines joined by `\n` without a trailing newline.
pub fn render_dot(commands: &[GraphCommand]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(commands.len());

    for cmd in commands {
        match cmd {
            GraphCommand::BeginGraph { name, node_style } => {
                lines.push(format!(
                    "digraph {} {{ node[shape={},style={}];",
                    name, node_style.shape, node_style.style,
                ));
            }
            GraphCommand::DeclareNode { id, label, fill } => {
                lines.push(format!(
                    r#""{}"[label="{}", fillcolor="{fill}"];"#,
                    escape_dot(id),
                    escape_dot(label),
                ));
            }
            GraphCommand::DeclareEdge { from, to, label } => {
                lines.push(format!(
                    r#""{}" -> "{}"[label="{}"];"#,
                    escape_dot(from),
                    escape_dot(to),
                    escape_dot(label),
                ));
            }
            GraphCommand::EndGraph => lines.push("}".to_string()),
        }
    }

    lines.join("\n")
}

/// DOT for the whole tree, rooted at the main method and normalized to its
/// total time.
pub fn call_graph_dot(tree: &CallTree) -> Result<String, TraceParseError> {
    let main = tree.main().ok_or(TraceParseError::NoMethods)?;
    let commands = render_call_graph(tree, main, tree.overall_millis());
    Ok(render_dot(&commands))
}

fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
