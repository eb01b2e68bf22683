use std::str::FromStr;

use super::min_length;

pub const MIN_LEN: usize = 5;

/// Subject line of a contact message
#[derive(Debug, PartialEq, Clone)]
pub struct MessageSubject(String);

impl AsRef<str> for MessageSubject {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for MessageSubject {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        min_length::parse(value, "Subject", MIN_LEN).map(Self)
    }
}
