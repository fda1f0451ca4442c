// Explicit session value. The legacy system held the logged-in customer
// and selected account as ambient mutable fields; here the session layer
// owns one of these and passes it to each operation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub customer_id: i64,

    /// Account the customer is currently operating on, if any.
    pub account_number: Option<String>,
}

impl Session {
    pub fn new(customer_id: i64) -> Self {
        Session {
            customer_id,
            account_number: None,
        }
    }

    pub fn select_account(&mut self, account_number: String) {
        self.account_number = Some(account_number);
    }

    pub fn clear_account(&mut self) {
        self.account_number = None;
    }

    pub fn selected_account(&self) -> Option<&str> {
        self.account_number.as_deref()
    }
}
