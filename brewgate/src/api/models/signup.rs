//! Request model for the signup endpoint.
//!
//! Field set mirrors `PRC_COF_USER_SIGNUP`'s seventeen input parameters; everything not
//! listed as required binds NULL (or its documented default) when absent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::phone::{validate_phone_number, validate_verification_code};
use crate::errors::Error;

/// Which subset of fields the procedure should validate. The full flow is the default;
/// the partial modes exist for per-step client-side validation calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationMode {
    EmailOnly,
    PasswordOnly,
    PhoneOnly,
    NameOnly,
    #[default]
    FullSignup,
}

impl ValidationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationMode::EmailOnly => "EMAIL_ONLY",
            ValidationMode::PasswordOnly => "PASSWORD_ONLY",
            ValidationMode::PhoneOnly => "PHONE_ONLY",
            ValidationMode::NameOnly => "NAME_ONLY",
            ValidationMode::FullSignup => "FULL_SIGNUP",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Gender {
    M,
    F,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::M => "M",
            Gender::F => "F",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    Web,
    MobileAndroid,
    MobileIos,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Web => "WEB",
            DeviceType::MobileAndroid => "MOBILE_ANDROID",
            DeviceType::MobileIos => "MOBILE_IOS",
        }
    }
}

/// `POST /signup` body
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignupRequest {
    #[serde(default)]
    pub validation_mode: ValidationMode,
    #[schema(example = "coffeeuser@example.com", max_length = 255)]
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date, example = "1990-05-01")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[schema(example = "01012345678", max_length = 20)]
    pub phone_number: String,
    #[schema(example = "123456", min_length = 6, max_length = 6)]
    pub verification_code: String,
    pub terms_agreed: bool,
    pub privacy_agreed: bool,
    #[serde(default)]
    pub marketing_agreed: bool,
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

impl SignupRequest {
    pub fn validate(&self) -> Result<(), Error> {
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        validate_phone_number(&self.phone_number)?;
        validate_verification_code(&self.verification_code)
    }
}

/// Declared parameter width of `p_email`
pub(crate) fn validate_email(email: &str) -> Result<(), Error> {
    if email.is_empty() || email.chars().count() > 255 {
        return Err(Error::Validation {
            message: "email must be between 1 and 255 characters".to_string(),
        });
    }
    Ok(())
}

/// Declared parameter width of `p_password`. Strength rules are procedure-side.
pub(crate) fn validate_password(password: &str) -> Result<(), Error> {
    if password.is_empty() || password.chars().count() > 255 {
        return Err(Error::Validation {
            message: "password must be between 1 and 255 characters".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_body() -> serde_json::Value {
        json!({
            "email": "coffeeuser@example.com",
            "password": "Coffee1234",
            "name": "Kim Coffee",
            "phone_number": "01012345678",
            "verification_code": "123456",
            "terms_agreed": true,
            "privacy_agreed": true
        })
    }

    #[test]
    fn test_optional_fields_take_documented_defaults() {
        let request: SignupRequest = serde_json::from_value(minimal_body()).unwrap();
        assert_eq!(request.validation_mode, ValidationMode::FullSignup);
        assert!(!request.marketing_agreed);
        assert!(request.birth_year.is_none());
        assert!(request.gender.is_none());
        assert!(request.device_type.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_full_body_deserializes() {
        let mut body = minimal_body();
        body["validation_mode"] = json!("EMAIL_ONLY");
        body["birth_year"] = json!(1990);
        body["birth_date"] = json!("1990-05-01");
        body["gender"] = json!("M");
        body["marketing_agreed"] = json!(true);
        body["device_type"] = json!("MOBILE_ANDROID");

        let request: SignupRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.validation_mode.as_str(), "EMAIL_ONLY");
        assert_eq!(request.birth_date, NaiveDate::from_ymd_opt(1990, 5, 1));
        assert_eq!(request.gender, Some(Gender::M));
        assert_eq!(request.device_type.map(|d| d.as_str()), Some("MOBILE_ANDROID"));
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let mut body = minimal_body();
        body.as_object_mut().unwrap().remove("terms_agreed");
        assert!(serde_json::from_value::<SignupRequest>(body).is_err());
    }

    #[test]
    fn test_email_width() {
        let mut request: SignupRequest = serde_json::from_value(minimal_body()).unwrap();
        request.email = format!("{}@example.com", "a".repeat(250));
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_password_width() {
        let mut request: SignupRequest = serde_json::from_value(minimal_body()).unwrap();
        request.password = "p".repeat(256);
        assert!(request.validate().is_err());

        request.password = String::new();
        assert!(request.validate().is_err());
    }
}
