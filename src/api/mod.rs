//! Typed HTTP surface for the StyleSync backend
//!
//! - transport and error classification in [`client`]
//! - auth, password reset, wardrobe, and outfit endpoints as
//!   [`ApiClient`] methods in their own modules

pub mod auth;
mod client;
pub mod outfits;
pub mod password_reset;
pub mod wardrobe;

pub use auth::{LoginRequest, SignUpRequest};
pub use client::{ApiClient, ApiError};
pub use outfits::GenerateOutfitRequest;
pub use password_reset::{
    RequestResetResponse, ResetPasswordRequest, ResetPasswordResponse, ValidateResetCodeResponse,
};
pub use wardrobe::NewWardrobeItem;
