use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Author record from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: i64,
    pub fullname: String,
}
