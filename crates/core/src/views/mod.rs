pub mod call_graph;
