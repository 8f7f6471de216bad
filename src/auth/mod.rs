//! Session token access.
//!
//! The token is owned by an external authentication collaborator; this
//! crate only ever reads it. The store is a shared handle so the
//! collaborator and any number of clients can hold the same cell.

pub mod token;

pub use token::TokenStore;
