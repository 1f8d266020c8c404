pub mod call_tree;
pub mod symbols;

pub use call_tree::{CallTree, MethodNode, NodeId, ROOT_METHOD_ID, ROOT_NAME};
pub use symbols::{SymbolError, SymbolTable};
