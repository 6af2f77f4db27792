use serde::{Deserialize, Serialize};

/// Insert payload for a new account. The raw password never reaches the db
/// layer; hashing happens in `auth` before this struct is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Full field set for creating a cafe or replacing an existing one. Edit is
/// a full-record replace, so create and update share this payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CafeUpsert {
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    pub seats: String,
    pub has_toilet: String,
    pub has_wifi: String,
    pub has_sockets: String,
    pub can_take_calls: String,
    pub coffee_price: String,
}
