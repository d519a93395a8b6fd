//! Authentication state owned by this client.
//!
//! This module provides:
//! - `AuthForm`: the combined sign-in/sign-up form controller with validation
//! - `Session`: the locally cached session record with client-side expiry
//!
//! Credential verification and session issuance live in the external
//! authentication service; see `crate::api`.

pub mod form;
pub mod session;

pub use form::{AuthForm, FieldErrors, Mode};
pub use session::{Session, SessionData};
