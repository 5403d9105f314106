//! Undo records for cart mutations.

use serde::Serialize;

/// Kind of cart mutation an action records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ActionKind {
    Add,
    Remove,
    Update,
}

/// Immutable snapshot of one cart mutation.
///
/// `previous_quantity` is what undo restores; 0 for an `Add` means the
/// product was not in the cart before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartAction {
    pub kind: ActionKind,
    pub product_id: String,
    pub previous_quantity: u32,
    pub new_quantity: u32,
}

impl CartAction {
    pub fn new(
        kind: ActionKind,
        product_id: impl Into<String>,
        previous_quantity: u32,
        new_quantity: u32,
    ) -> Self {
        Self {
            kind,
            product_id: product_id.into(),
            previous_quantity,
            new_quantity,
        }
    }
}
