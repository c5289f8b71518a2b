//! Models for the plain-SQL `/users` endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserCreate {
    pub name: String,
    #[schema(example = "coffeeuser@example.com", max_length = 255)]
    pub email: String,
}

/// Echo of the created row, with the generated identifier
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserCreated {
    pub id: u64,
    pub name: String,
    pub email: String,
}
