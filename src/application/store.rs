//! Snapshot store for the current tree.

use std::sync::Arc;

use crate::domain::Tree;

/// Holds the current tree snapshot. No business logic.
///
/// Snapshots are handed out as `Arc<Tree>`; `replace` swaps in a new tree
/// without touching the old one, so earlier snapshots stay frozen views of
/// the prior state.
#[derive(Debug, Clone)]
pub struct TreeStore {
    current: Arc<Tree>,
}

impl TreeStore {
    pub fn new(tree: Tree) -> Self {
        Self {
            current: Arc::new(tree),
        }
    }

    pub fn get(&self) -> Arc<Tree> {
        Arc::clone(&self.current)
    }

    pub fn replace(&mut self, tree: Tree) {
        self.current = Arc::new(tree);
    }
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::new(Tree::sample())
    }
}
