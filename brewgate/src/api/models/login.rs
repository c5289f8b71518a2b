//! Request model for email login.

use serde::Deserialize;
use utoipa::ToSchema;

use super::signup::{DeviceType, validate_email, validate_password};
use crate::errors::Error;

/// `POST /api/login/email` body
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "coffeeuser@example.com", max_length = 255)]
    pub email: String,
    pub password: String,
    /// Issue a long-lived session
    #[serde(default)]
    pub auto_login: bool,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub device_type: Option<DeviceType>,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub app_version: Option<String>,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), Error> {
        validate_email(&self.email)?;
        validate_password(&self.password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_login_defaults_to_false() {
        let request: LoginRequest = serde_json::from_str(r#"{"email": "a@b.com", "password": "Coffee1234"}"#).unwrap();
        assert!(!request.auto_login);
        assert!(request.device_id.is_none());
    }

    #[test]
    fn test_missing_password_is_rejected() {
        assert!(serde_json::from_str::<LoginRequest>(r#"{"email": "a@b.com"}"#).is_err());
    }
}
