use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Argon2id PHC string; never serialized into responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct DbCafe {
    pub id: i64,
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    pub seats: String,
    /// Amenity flags are the literal strings "Yes"/"No", not booleans.
    pub has_toilet: String,
    pub has_wifi: String,
    pub has_sockets: String,
    pub can_take_calls: String,
    pub coffee_price: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
