use std::fmt;
use std::str::FromStr;

use super::min_length;

pub const MIN_LEN: usize = 2;

/// Name of the person sending a contact message
#[derive(Debug, PartialEq, Clone)]
pub struct ContactName(String);

impl AsRef<str> for ContactName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ContactName {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        min_length::parse(value, "Name", MIN_LEN).map(Self)
    }
}

impl fmt::Display for ContactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
