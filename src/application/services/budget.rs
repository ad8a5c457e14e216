//! Budget editing service
//!
//! Binds the snapshot store, the pending input map and the engine into the
//! edit/read cycle of the editor: type text, press an edit button, read back
//! the recomputed tree.

use std::cell::OnceCell;
use std::sync::Arc;

use tracing::{debug, info};

use crate::application::{ApplicationResult, PendingInputs, TreeStore};
use crate::domain::{
    aggregate, apply, parse_input, AggregatedTree, EditMode, ItemId, LineItem, Tree,
};

/// Result of applying one edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The input parsed and the edit ran. An unknown id still counts: the
    /// edit is then a silent no-op.
    Applied,
    /// No pending text, or text that is not a number. Nothing changed and
    /// the pending text is kept.
    InvalidInput,
}

/// Service for editing a budget tree.
pub struct BudgetService {
    store: TreeStore,
    inputs: PendingInputs,
    view: OnceCell<Arc<AggregatedTree>>,
}

impl BudgetService {
    pub fn new(tree: Tree) -> Self {
        Self {
            store: TreeStore::new(tree),
            inputs: PendingInputs::new(),
            view: OnceCell::new(),
        }
    }

    /// Build from unvalidated rows, rejecting empty or duplicate ids.
    pub fn from_rows(rows: Vec<LineItem>) -> ApplicationResult<Self> {
        Ok(Self::new(Tree::new(rows)?))
    }

    /// Current raw tree. Internal values may be placeholders; use [`view`](Self::view) for display.
    pub fn snapshot(&self) -> Arc<Tree> {
        self.store.get()
    }

    /// Aggregated view of the current snapshot, computed once per snapshot.
    pub fn view(&self) -> Arc<AggregatedTree> {
        Arc::clone(
            self.view
                .get_or_init(|| Arc::new(aggregate(&self.store.get()))),
        )
    }

    pub fn grand_total(&self) -> f64 {
        self.view().grand_total()
    }

    pub fn set_input(&mut self, id: impl Into<ItemId>, text: impl Into<String>) {
        self.inputs.set(id, text);
    }

    pub fn pending_input(&self, id: &str) -> Option<&str> {
        self.inputs.get(id)
    }

    /// Apply the pending text for `id` with the given edit mode.
    pub fn apply(&mut self, id: &str, mode: EditMode) -> EditOutcome {
        let raw = self.inputs.get(id).unwrap_or_default().to_string();
        if parse_input(&raw).is_none() {
            debug!("{mode} {id}: invalid input {raw:?}");
            return EditOutcome::InvalidInput;
        }

        let edited = apply(&self.store.get(), id, mode, &raw);
        self.replace(edited);
        // Consumed once so the same text is not applied twice
        self.inputs.clear(id);
        info!("{mode} {id} {raw}: grand total now {}", self.grand_total());
        EditOutcome::Applied
    }

    /// Set the pending text for `id` and apply it in one step.
    pub fn apply_raw(&mut self, id: &str, mode: EditMode, raw: &str) -> EditOutcome {
        self.set_input(id, raw);
        self.apply(id, mode)
    }

    fn replace(&mut self, tree: Tree) {
        self.store.replace(tree);
        self.view = OnceCell::new();
    }
}

impl Default for BudgetService {
    fn default() -> Self {
        Self::new(Tree::sample())
    }
}
