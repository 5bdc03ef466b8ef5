//! Credential decoding and session persistence

pub mod session;
pub mod token;

pub use session::{Session, SessionStore};
pub use token::{Claims, decode, is_valid};
