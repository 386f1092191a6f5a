mod contact;
mod health_check;
mod helpers;

pub use contact::*;
pub use health_check::*;
pub use helpers::*;
