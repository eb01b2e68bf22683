/// Contact form submission endpoint
pub mod contact;
