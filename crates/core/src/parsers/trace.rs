use thiserror::Error;

use crate::model::{CallTree, NodeId, SymbolTable};

#[derive(Debug, Error)]
pub enum TraceParseError {
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("line {line}: exit of method {found} while method {expected} is open")]
    MismatchedExit {
        line: usize,
        expected: String,
        found: String,
    },
    #[error("line {line}: exit without a matching enter")]
    UnbalancedExit { line: usize },
    #[error("{open} method(s) still open at end of trace")]
    UnclosedFrames { open: usize },
    #[error("no methods found in trace")]
    NoMethods,
}

/// How strictly enter/exit nesting is checked.
///
/// By default exits pop whatever is on top of the stack and violations are
/// only logged. `strict` turns each violation into an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraceOptions {
    pub strict: bool,
}

/// A single trace record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Record<'a> {
    Enter { method_id: &'a str },
    Exit { method_id: &'a str, micros: u64 },
}

/// `> <id>` or `< <id>;<micros>`. The line is already trimmed.
fn parse_record(line: &str) -> Option<Record<'_>> {
    if let Some(rest) = line.strip_prefix('>') {
        let method_id = rest.trim();
        if method_id.is_empty() {
            return None;
        }
        return Some(Record::Enter { method_id });
    }
    let rest = line.strip_prefix('<')?;
    let (method_id, micros) = rest.split_once(';')?;
    let method_id = method_id.trim();
    if method_id.is_empty() {
        return None;
    }
    let micros = micros.trim().parse().ok()?;
    Some(Record::Exit { method_id, micros })
}

/// Parse a k-perf trace log into an aggregated call tree.
///
/// Each line is either an enter record (`> 12`, the method on top of the
/// stack called method 12) or an exit record (`< 12;1500`, the method on top
/// of the stack returned after 1500µs). Repeated calls to the same method
/// from the same calling context are merged into a single node.
///
/// Lines matching neither form are logged and skipped.
pub fn parse_trace(
    data: &[u8],
    symbols: &SymbolTable,
    options: &TraceOptions,
) -> Result<CallTree, TraceParseError> {
    let text = std::str::from_utf8(data)?;
    let mut tree = CallTree::new();
    let mut stack: Vec<NodeId> = vec![tree.root()];
    let mut skipped = 0usize;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_record(line) {
            Some(Record::Enter { method_id }) => {
                let caller = stack.last().copied().unwrap_or(NodeId::ROOT);
                let callee = tree.enter(caller, method_id, symbols);
                stack.push(callee);
            }
            Some(Record::Exit { method_id, micros }) => {
                // The root frame stays on the stack for the whole trace.
                if stack.len() <= 1 {
                    if options.strict {
                        return Err(TraceParseError::UnbalancedExit { line: line_no });
                    }
                    tracing::warn!(
                        line = line_no,
                        "skipping exit without a matching enter: {line}"
                    );
                    skipped += 1;
                    continue;
                }
                let Some(current) = stack.pop() else {
                    continue;
                };
                let open_id = tree
                    .node(current)
                    .map(|n| n.method_id.as_str())
                    .unwrap_or_default();
                if open_id != method_id {
                    if options.strict {
                        return Err(TraceParseError::MismatchedExit {
                            line: line_no,
                            expected: open_id.to_string(),
                            found: method_id.to_string(),
                        });
                    }
                    tracing::warn!(
                        line = line_no,
                        expected = open_id,
                        found = method_id,
                        "exit does not match the open method"
                    );
                }
                tree.record_exit(current, micros);
            }
            None => {
                tracing::warn!(line = line_no, "skipping invalid line: {line}");
                skipped += 1;
            }
        }
    }

    let open = stack.len().saturating_sub(1);
    if open > 0 {
        if options.strict {
            return Err(TraceParseError::UnclosedFrames { open });
        }
        tracing::warn!(
            open,
            "trace ended with open methods; their durations are dropped"
        );
    }

    if tree.main().is_none() {
        return Err(TraceParseError::NoMethods);
    }

    tracing::debug!(nodes = tree.len(), skipped, "aggregated call tree from trace");
    Ok(tree)
}
