// Registration input format checks. These run before any row is inserted;
// uniqueness is the store's job, shape is ours.

use chrono::NaiveDate;

/// Minimal email shape check: one '@', non-empty local part, domain with a
/// dot and no leading/trailing dot.
pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.splitn(2, '@');
    let (local, domain) = match (parts.next(), parts.next()) {
        (Some(local), Some(domain)) => (local, domain),
        _ => return false,
    };

    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if !local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c))
    {
        return false;
    }
    if domain.starts_with('.') || domain.ends_with('.') || !domain.contains('.') {
        return false;
    }
    domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

/// 10 to 15 digits, nothing else.
pub fn is_valid_phone(phone: &str) -> bool {
    (10..=15).contains(&phone.len()) && phone.chars().all(|c| c.is_ascii_digit())
}

/// Exactly four digits.
pub fn is_valid_pin(pin: &str) -> bool {
    pin.len() == 4 && pin.chars().all(|c| c.is_ascii_digit())
}

/// DD/MM/YYYY and an actual calendar date.
pub fn is_valid_date_of_birth(dob: &str) -> bool {
    NaiveDate::parse_from_str(dob, "%d/%m/%Y").is_ok()
}
