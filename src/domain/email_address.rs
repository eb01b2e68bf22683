use std::fmt;
use std::str::FromStr;

use regex::Regex;

const INVALID_MESSAGE: &str = "Please enter a valid email address.";

/// A user supplied email-address
#[derive(Debug, PartialEq, Clone)]
pub struct EmailAddress(String);

impl FromStr for EmailAddress {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        lazy_static::lazy_static! {
            static ref EMAIL_REGEX: Regex = Regex::new(
                r"(?i-u)^[a-z0-9_'+\-.]*[a-z0-9_+\-]@([a-z0-9][a-z0-9\-]*\.)+[a-z]{2,}$"
            )
            .unwrap();
        }

        // The regex crate has no look-around, so dot placement is checked by hand
        if value.starts_with('.') || value.contains("..") || !EMAIL_REGEX.is_match(value) {
            return Err(INVALID_MESSAGE.into());
        }

        // Normalize
        Ok(Self(value.to_lowercase()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
