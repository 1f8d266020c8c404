//! Integration test: aggregate a recorded Game of Life trace and check the
//! emitted DOT document line by line.

use callgraph_core::dot::call_graph_dot;
use callgraph_core::model::{ROOT_METHOD_ID, SymbolTable};
use callgraph_core::parsers::{TraceOptions, TraceParseError, parse_trace};

fn load() -> callgraph_core::model::CallTree {
    let trace = include_bytes!("fixtures/trace_gol.txt");
    let symbols = SymbolTable::from_json(include_bytes!("fixtures/symbols_gol.txt"))
        .expect("failed to parse symbols");
    parse_trace(trace, &symbols, &TraceOptions::default()).expect("failed to parse trace")
}

#[test]
fn aggregates_game_of_life_trace() {
    let tree = load();
    let main = tree.main().expect("trace has a main method");

    assert_eq!(tree.overall_millis(), 20.0);
    assert_eq!(tree.children(tree.root()), &[main]);

    let step = tree.child(main, "1").expect("main calls step");
    let node = tree.node(step).unwrap();
    assert_eq!(node.direct_calls, 2);
    assert_eq!(node.durations, vec![4000, 6000]);
    assert_eq!(tree.recursive_calls(step), 7);
    assert_eq!(tree.percentage(step, tree.overall_millis()), 50.0);

    let alive = tree.child(step, "3").expect("step calls isAlive");
    assert_eq!(tree.node(alive).unwrap().direct_calls, 3);
    assert_eq!(tree.total_micros(alive), 1600);
}

#[test]
fn emits_expected_dot() {
    let dot = call_graph_dot(&load()).expect("graph for non-empty tree");
    let r = ROOT_METHOD_ID;
    let main = format!("0from{r}");
    let step = format!("1from0from{r}");
    let count = format!("2from1from0from{r}");
    let alive = format!("3from1from0from{r}");
    let unknown = format!("4from0from{r}");

    let expected = vec![
        "digraph G { node[shape=box,style=filled];".to_string(),
        format!(r##""{main}"[label="main (~20.00ms -- 100.0%)", fillcolor="#FF9797ff"];"##),
        format!(r##""{step}"[label="step (~10.00ms -- 50.0%)", fillcolor="#FF97977f"];"##),
        format!(
            r##""{count}"[label="countNeighbours (~3.00ms -- 15.0%)", fillcolor="#FF979726"];"##
        ),
        format!(r#""{step}" -> "{count}"[label="2 (+ 0 indir.)"];"#),
        format!(r##""{alive}"[label="isAlive (~1.60ms -- 8.0%)", fillcolor="#FF979714"];"##),
        format!(r#""{step}" -> "{alive}"[label="3 (+ 0 indir.)"];"#),
        format!(r#""{main}" -> "{step}"[label="2 (+ 5 indir.)"];"#),
        format!(
            r##""{unknown}"[label="method name not found in symbols file for method 4 (~2.00ms -- 10.0%)", fillcolor="#FF979719"];"##
        ),
        format!(r#""{main}" -> "{unknown}"[label="1 (+ 0 indir.)"];"#),
        "}".to_string(),
    ];

    assert_eq!(dot.lines().collect::<Vec<_>>(), expected);
}

#[test]
fn strict_mode_accepts_well_nested_trace() {
    let trace = include_bytes!("fixtures/trace_gol.txt");
    let symbols = SymbolTable::default();
    let tree = parse_trace(trace, &symbols, &TraceOptions { strict: true })
        .expect("fixture is well nested");
    assert_eq!(tree.len(), 6);
}

#[test]
fn trace_without_enters_is_rejected() {
    let result = parse_trace(b"< 0;10\nnoise\n", &SymbolTable::default(), &TraceOptions::default());
    assert!(matches!(result, Err(TraceParseError::NoMethods)));
}
