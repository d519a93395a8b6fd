//! The combined sign-in / sign-up form controller.
//!
//! Owns the field state, the per-field validation error map, and the
//! submitting flag. Validation runs on every submit attempt, before any
//! network call; toggling the mode clears all field and error state.

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length accepted by the backend.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Minimum full-name length when one is provided (the field is optional).
pub const MIN_FULL_NAME_LEN: usize = 2;

// ============================================================================
// Mode
// ============================================================================

/// Which operation the form submits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    SignIn,
    SignUp,
}

impl Mode {
    pub fn toggled(&self) -> Self {
        match self {
            Mode::SignIn => Mode::SignUp,
            Mode::SignUp => Mode::SignIn,
        }
    }

    /// Heading shown above the form.
    pub fn heading(&self) -> &'static str {
        match self {
            Mode::SignIn => "Sign in to your account",
            Mode::SignUp => "Create your account",
        }
    }

    /// Label on the submit control.
    pub fn submit_label(&self) -> &'static str {
        match self {
            Mode::SignIn => "Sign in",
            Mode::SignUp => "Create account",
        }
    }

    /// Label on the mode-toggle link.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Mode::SignIn => "No account? Sign up",
            Mode::SignUp => "Have an account? Sign in",
        }
    }
}

// ============================================================================
// Validation errors
// ============================================================================

/// One optional message per field; recomputed on every submit attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none() && self.full_name.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// Form state
// ============================================================================

/// Field and submission state for the auth screen.
#[derive(Debug)]
pub struct AuthForm {
    pub mode: Mode,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub errors: FieldErrors,
    pub submitting: bool,
}

impl AuthForm {
    /// New form in sign-in mode, optionally prefilled with the last used email.
    pub fn new(prefill_email: Option<String>) -> Self {
        Self {
            mode: Mode::SignIn,
            email: prefill_email.unwrap_or_default(),
            password: String::new(),
            full_name: String::new(),
            errors: FieldErrors::default(),
            submitting: false,
        }
    }

    /// Flip between sign-in and sign-up, clearing all field and error state.
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
        self.email.clear();
        self.password.clear();
        self.full_name.clear();
        self.errors.clear();
    }

    /// Validate all fields for the current mode, populating the error map.
    /// Returns true when the form may be submitted.
    pub fn validate(&mut self) -> bool {
        let mut errors = FieldErrors::default();

        if !well_formed_email(self.email.trim()) {
            errors.email = Some("Enter a valid email address".to_string());
        }

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.password = Some(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            ));
        }

        // Full name is sign-up only and optional: absence is not an error,
        // but a provided name must meet the minimum length.
        if self.mode == Mode::SignUp {
            let name = self.full_name.trim();
            if !name.is_empty() && name.chars().count() < MIN_FULL_NAME_LEN {
                errors.full_name = Some(format!(
                    "Name must be at least {} characters",
                    MIN_FULL_NAME_LEN
                ));
            }
        }

        let ok = errors.is_empty();
        self.errors = errors;
        ok
    }

    /// The full name to submit: trimmed, `None` when left blank.
    pub fn full_name_value(&self) -> Option<String> {
        let name = self.full_name.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}

// ============================================================================
// Email well-formedness
// ============================================================================

/// Structural check for a well-formed email address: exactly one `@`,
/// non-empty local part, dotted domain with non-empty labels, no whitespace.
pub fn well_formed_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let mut labels = domain.split('.');
    let has_dot = domain.contains('.');
    has_dot && labels.all(|label| !label.is_empty())
}

// ============================================================================
// Tests
// ============================================================================
