//! Client-side form validation
//!
//! Every auth form is checked here before any network call; failures are
//! reported as a field-name → message map for inline display. Field names
//! match the backend's own validation error keys so server-side field
//! errors can be merged into the same map.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Field-name → message map for inline form errors.
pub type FieldErrors = HashMap<String, String>;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern compiles"));

/// Loose email shape check - one non-space run, an @, and a dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Password complexity: at least one lowercase, one uppercase, one digit.
fn meets_complexity(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

fn check_email(errors: &mut FieldErrors, email: &str) {
    if email.trim().is_empty() {
        errors.insert("email".to_string(), "Email is required".to_string());
    } else if !is_valid_email(email) {
        errors.insert(
            "email".to_string(),
            "Please enter a valid email address".to_string(),
        );
    }
}

/// Sign-in form fields.
#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

pub fn validate_sign_in(form: &SignInForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check_email(&mut errors, &form.email);

    if form.password.is_empty() {
        errors.insert("password".to_string(), "Password is required".to_string());
    }

    errors
}

/// Sign-up form fields.
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

pub fn validate_sign_up(form: &SignUpForm) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if form.first_name.trim().is_empty() {
        errors.insert(
            "firstName".to_string(),
            "First name is required".to_string(),
        );
    }

    check_email(&mut errors, &form.email);

    if form.password.is_empty() {
        errors.insert("password".to_string(), "Password is required".to_string());
    } else if form.password.len() < 8 {
        errors.insert(
            "password".to_string(),
            "Password must be at least 8 characters".to_string(),
        );
    }

    if form.confirm_password.is_empty() {
        errors.insert(
            "confirmPassword".to_string(),
            "Please confirm your password".to_string(),
        );
    } else if form.password != form.confirm_password {
        errors.insert(
            "confirmPassword".to_string(),
            "Passwords do not match".to_string(),
        );
    }

    errors
}

/// Forgot-password (reset request) form.
pub fn validate_reset_request(email: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check_email(&mut errors, email);
    errors
}

/// Reset-code format check. Server-side validity is a separate call.
pub fn validate_reset_code(code: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if code.trim().is_empty() {
        errors.insert("code".to_string(), "Reset code is required".to_string());
    } else if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
        errors.insert(
            "code".to_string(),
            "Reset code must be 6 digits".to_string(),
        );
    }

    errors
}

/// New-password form, submitted together with the validated reset code.
#[derive(Debug, Clone, Default)]
pub struct PasswordResetForm {
    pub code: String,
    pub new_password: String,
    pub confirm_password: String,
}

pub fn validate_password_reset(form: &PasswordResetForm) -> FieldErrors {
    let mut errors = validate_reset_code(&form.code);

    if form.new_password.is_empty() {
        errors.insert(
            "newPassword".to_string(),
            "New password is required".to_string(),
        );
    } else if form.new_password.len() < 8 {
        errors.insert(
            "newPassword".to_string(),
            "Password must be at least 8 characters".to_string(),
        );
    } else if !meets_complexity(&form.new_password) {
        errors.insert(
            "newPassword".to_string(),
            "Password must contain uppercase, lowercase, and number".to_string(),
        );
    }

    if form.confirm_password.is_empty() {
        errors.insert(
            "confirmPassword".to_string(),
            "Please confirm your password".to_string(),
        );
    } else if form.new_password != form.confirm_password {
        errors.insert(
            "confirmPassword".to_string(),
            "Passwords do not match".to_string(),
        );
    }

    errors
}
