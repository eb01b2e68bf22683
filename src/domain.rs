mod min_length;
mod contact_name;
mod email_address;
mod message_body;
mod message_subject;

pub use contact_name::ContactName;
pub use email_address::EmailAddress;
pub use message_body::MessageBody;
pub use message_subject::MessageSubject;
