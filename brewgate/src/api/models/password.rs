//! Request model for password reset.

use serde::Deserialize;
use utoipa::ToSchema;

use super::phone::{validate_phone_number, validate_verification_code};
use super::signup::{validate_email, validate_password};
use crate::errors::Error;

/// `POST /api/reset-password` body.
///
/// Both password fields are bound to the procedure; the match check (like the rest of
/// the password policy) is the procedure's responsibility.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    #[schema(example = "coffeeuser@example.com", max_length = 255)]
    pub email: String,
    #[schema(example = "01012345678", max_length = 20)]
    pub phone_number: String,
    #[schema(example = "123456", min_length = 6, max_length = 6)]
    pub verification_code: String,
    pub new_password: String,
    pub new_password_confirm: String,
}

impl ResetPasswordRequest {
    pub fn validate(&self) -> Result<(), Error> {
        validate_email(&self.email)?;
        validate_phone_number(&self.phone_number)?;
        validate_verification_code(&self.verification_code)?;
        validate_password(&self.new_password)?;
        validate_password(&self.new_password_confirm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_fields_required() {
        let body = json!({
            "email": "a@b.com",
            "phone_number": "01012345678",
            "verification_code": "123456",
            "new_password": "Coffee5678"
        });
        assert!(serde_json::from_value::<ResetPasswordRequest>(body).is_err());
    }

    #[test]
    fn test_valid_body() {
        let body = json!({
            "email": "a@b.com",
            "phone_number": "01012345678",
            "verification_code": "123456",
            "new_password": "Coffee5678",
            "new_password_confirm": "Coffee5678"
        });
        let request: ResetPasswordRequest = serde_json::from_value(body).unwrap();
        assert!(request.validate().is_ok());
    }
}
