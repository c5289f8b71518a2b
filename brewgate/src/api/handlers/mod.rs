//! Endpoint handlers, one module per endpoint family.

pub mod health;
pub mod login;
pub mod password;
pub mod phone;
pub mod recommend;
pub mod signup;
pub mod users;
