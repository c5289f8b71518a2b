//! Typed request/response models: one module per endpoint family, plus the shared
//! response envelope. Required fields are plain typed fields; optional fields carry
//! their documented defaults.

pub mod envelope;
pub mod login;
pub mod password;
pub mod phone;
pub mod recommend;
pub mod signup;
pub mod users;

pub use envelope::Envelope;
