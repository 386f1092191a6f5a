mod contact_handler;
mod errors;

pub use contact_handler::*;
pub use errors::*;
