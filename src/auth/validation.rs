use lazy_static::lazy_static;
use regex::Regex;

use crate::config::RegistrationPolicy;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Lengths are counted in chars, so multi-byte logins are not penalised.
pub(crate) fn meets_policy(login: &str, password: &str, policy: &RegistrationPolicy) -> bool {
    login.chars().count() >= policy.min_login_length
        && password.chars().count() >= policy.min_password_length
}
