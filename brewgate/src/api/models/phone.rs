//! Request models for the phone verification endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::Error;

/// What the verification code is being requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Purpose {
    #[default]
    Signup,
    Login,
    FindId,
}

impl Purpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Signup => "SIGNUP",
            Purpose::Login => "LOGIN",
            Purpose::FindId => "FIND_ID",
        }
    }
}

/// `POST /phone/request` body
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PhoneCodeRequest {
    /// Recipient phone number, digits only
    #[schema(example = "01012345678", max_length = 20)]
    pub phone_number: String,
    #[serde(default)]
    pub purpose: Purpose,
    /// Existing user this request belongs to, when known
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl PhoneCodeRequest {
    pub fn validate(&self) -> Result<(), Error> {
        validate_phone_number(&self.phone_number)
    }
}

/// `POST /phone/request-find-id` body. The purpose is pinned to FIND_ID server-side.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FindIdCodeRequest {
    #[schema(example = "01012345678", max_length = 20)]
    pub phone_number: String,
}

impl FindIdCodeRequest {
    pub fn validate(&self) -> Result<(), Error> {
        validate_phone_number(&self.phone_number)
    }
}

/// `POST /phone/verify` body
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PhoneVerifyRequest {
    #[schema(example = "01012345678", max_length = 20)]
    pub phone_number: String,
    /// The six-digit code delivered to the phone
    #[schema(example = "123456", min_length = 6, max_length = 6)]
    pub verification_code: String,
    #[serde(default)]
    pub purpose: Purpose,
}

impl PhoneVerifyRequest {
    pub fn validate(&self) -> Result<(), Error> {
        validate_phone_number(&self.phone_number)?;
        validate_verification_code(&self.verification_code)
    }
}

/// Declared parameter width of `p_phone_number`
pub(crate) fn validate_phone_number(phone_number: &str) -> Result<(), Error> {
    if phone_number.is_empty() || phone_number.chars().count() > 20 {
        return Err(Error::Validation {
            message: "phone_number must be between 1 and 20 characters".to_string(),
        });
    }
    Ok(())
}

/// Declared parameter width of `p_verification_code`
pub(crate) fn validate_verification_code(code: &str) -> Result<(), Error> {
    if code.chars().count() != 6 {
        return Err(Error::Validation {
            message: "verification_code must be exactly 6 characters".to_string(),
        });
    }
    Ok(())
}
