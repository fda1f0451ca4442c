// Customer entity - identity record created once at registration.
// The PIN never appears here: the store keeps only a salted digest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Positive integer assigned by the store, unique and immutable.
    pub customer_id: i64,

    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,

    /// Unique across all customers.
    pub email: String,

    pub phone_number: String,
    pub address: String,

    /// DD/MM/YYYY, as collected at registration.
    pub date_of_birth: String,

    pub created_at: DateTime<Utc>,
}

impl Customer {
    /// "First [Middle] Last", skipping an absent middle name.
    pub fn full_name(&self) -> String {
        match &self.middle_name {
            Some(middle) if !middle.is_empty() => {
                format!("{} {} {}", self.first_name, middle, self.last_name)
            }
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

/// Registration input. `pin` is the plaintext the customer chose; the
/// ledger hashes it before it reaches the store.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub date_of_birth: String,
    pub pin: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_with_middle() {
        let customer = Customer {
            customer_id: 1,
            first_name: "Ama".to_string(),
            middle_name: Some("Serwaa".to_string()),
            last_name: "Mensah".to_string(),
            email: "ama@example.com".to_string(),
            phone_number: "0244123456".to_string(),
            address: "Kumasi".to_string(),
            date_of_birth: "01/02/1990".to_string(),
            created_at: Utc::now(),
        };
        assert_eq!(customer.full_name(), "Ama Serwaa Mensah");
    }

    #[test]
    fn test_full_name_without_middle() {
        let customer = Customer {
            customer_id: 2,
            first_name: "Kofi".to_string(),
            middle_name: None,
            last_name: "Owusu".to_string(),
            email: "kofi@example.com".to_string(),
            phone_number: "0244000000".to_string(),
            address: "Accra".to_string(),
            date_of_birth: "15/06/1985".to_string(),
            created_at: Utc::now(),
        };
        assert_eq!(customer.full_name(), "Kofi Owusu");

        let empty_middle = Customer {
            middle_name: Some(String::new()),
            ..customer
        };
        assert_eq!(empty_middle.full_name(), "Kofi Owusu");
    }
}
