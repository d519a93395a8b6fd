//! Data models for the site's member area.
//!
//! - `Identity`: the signed-in user's externally-issued identity record

pub mod identity;

pub use identity::Identity;
