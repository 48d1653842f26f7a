pub mod account;
pub mod message;

pub use account::{AccountService, RegistrationError};
pub use message::{MessageError, MessageService};
