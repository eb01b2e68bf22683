use std::str::FromStr;

use super::min_length;

pub const MIN_LEN: usize = 10;

/// Free-text body of a contact message
#[derive(Debug, PartialEq, Clone)]
pub struct MessageBody(String);

impl AsRef<str> for MessageBody {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for MessageBody {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        min_length::parse(value, "Message", MIN_LEN).map(Self)
    }
}
