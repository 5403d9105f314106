//! LIFO log of cart mutations.

use crate::error::{Result, StoreError};
use crate::types::CartAction;

/// Stack of undo records, newest on top.
///
/// Popping or peeking an empty ledger is a caller bug and fails with
/// [`StoreError::InvalidState`]; check [`is_empty`](Self::is_empty) first.
#[derive(Debug, Default, Clone)]
pub struct UndoLedger {
    actions: Vec<CartAction>,
}

impl UndoLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: CartAction) {
        self.actions.push(action);
    }

    /// Remove and return the newest action
    pub fn pop(&mut self) -> Result<CartAction> {
        self.actions
            .pop()
            .ok_or(StoreError::InvalidState("undo ledger is empty"))
    }

    /// Newest action without removing it
    pub fn peek(&self) -> Result<&CartAction> {
        self.actions
            .last()
            .ok_or(StoreError::InvalidState("undo ledger is empty"))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Discard every record
    pub fn clear(&mut self) {
        self.actions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ActionKind;

    #[test]
    fn test_lifo_order() {
        let mut ledger = UndoLedger::new();
        ledger.push(CartAction::new(ActionKind::Add, "P1", 0, 5));
        ledger.push(CartAction::new(ActionKind::Update, "P1", 5, 2));

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.peek().unwrap().kind, ActionKind::Update);
        assert_eq!(ledger.pop().unwrap().kind, ActionKind::Update);
        assert_eq!(ledger.pop().unwrap().kind, ActionKind::Add);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_empty_ledger_is_invalid_state() {
        let mut ledger = UndoLedger::new();

        assert!(matches!(ledger.pop(), Err(StoreError::InvalidState(_))));
        assert!(matches!(ledger.peek(), Err(StoreError::InvalidState(_))));
    }

    #[test]
    fn test_clear() {
        let mut ledger = UndoLedger::new();
        ledger.push(CartAction::new(ActionKind::Remove, "P1", 3, 0));
        ledger.clear();

        assert!(ledger.is_empty());
    }
}
