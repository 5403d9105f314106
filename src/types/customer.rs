//! Customer profile.

use serde::Serialize;

/// A customer, keyed in the [`CustomerIndex`](crate::customers::CustomerIndex) by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    /// Ordering key of the customer index
    pub id: u64,
    pub name: String,
    pub email: String,

    /// Completed purchases, used to pick customers worth promoting
    pub purchase_count: u32,
}

impl Customer {
    pub fn new(id: u64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            purchase_count: 0,
        }
    }

    /// Count one more completed purchase
    pub fn record_purchase(&mut self) {
        self.purchase_count = self.purchase_count.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_purchase() {
        let mut customer = Customer::new(7, "Ada", "ada@example.com");
        assert_eq!(customer.purchase_count, 0);

        customer.record_purchase();
        customer.record_purchase();
        assert_eq!(customer.purchase_count, 2);

        customer.purchase_count = u32::MAX;
        customer.record_purchase();
        assert_eq!(customer.purchase_count, u32::MAX);
    }
}
