//! Pending raw edit text per line item.

use std::collections::HashMap;

use crate::domain::ItemId;

/// Ephemeral map from line item id to the text typed for it.
///
/// Owned by the presentation side; the engine only ever sees the text as a
/// plain argument.
#[derive(Debug, Clone, Default)]
pub struct PendingInputs {
    inputs: HashMap<ItemId, String>,
}

impl PendingInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: impl Into<ItemId>, text: impl Into<String>) {
        self.inputs.insert(id.into(), text.into());
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.inputs.get(id).map(String::as_str)
    }

    pub fn take(&mut self, id: &str) -> Option<String> {
        self.inputs.remove(id)
    }

    pub fn clear(&mut self, id: &str) {
        self.inputs.remove(id);
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_text_when_taken_then_entry_is_gone() {
        let mut inputs = PendingInputs::new();
        inputs.set("phones", "12");
        inputs.set("phones", "15");

        assert_eq!(inputs.get("phones"), Some("15"));
        assert_eq!(inputs.take("phones").as_deref(), Some("15"));
        assert!(inputs.is_empty());
    }
}
