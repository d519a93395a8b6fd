//! HTTP client module for the site's authentication service.
//!
//! This module provides the `ApiClient` for sign-in, sign-up, sign-out,
//! identity validation, and the admin-role lookup. The service owns all
//! credential verification and authorization; rejections are surfaced with
//! their message text intact for classification (see `AuthFailure`).

pub mod client;
pub mod error;

pub use client::{ApiClient, DEFAULT_API_BASE_URL};
pub use error::{ApiError, AuthFailure};
