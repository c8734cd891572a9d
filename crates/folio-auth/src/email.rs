use lazy_static::lazy_static;
use regex::Regex;

use crate::{AuthError, Result};

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)+$")
            .unwrap();
}

/// Trim, lowercase and validate an email address
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    if email.len() > 254 || !EMAIL_RE.is_match(&email) {
        return Err(AuthError::InvalidEmail(email));
    }
    Ok(email)
}
