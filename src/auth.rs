//! Access token model and the authenticator that keeps it fresh.

pub mod secret;
pub mod token;

mod authenticator;

pub use authenticator::*;
pub use secret::*;
pub use token::*;
