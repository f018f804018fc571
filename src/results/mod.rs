pub mod classifier;
pub mod table;
pub mod tree;
pub mod types;

pub use classifier::is_sensitive;
pub use table::{Column, TableView};
pub use tree::{NodeKind, ResultTree, TreeNode};
pub use types::ScanResult;
