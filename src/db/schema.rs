//! SQL DDL for initializing the database schema.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema includes:
/// - `user_list` table (registered accounts, one row per identity)
/// - `cafe` table (venue listings, `name` unique at the storage layer)
///
/// Email uniqueness for `user_list` is deliberately NOT a storage constraint:
/// registration performs a prior lookup instead, so concurrent registrations
/// with the same email can race.
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Registered accounts
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS user_list (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_user_list_email ON user_list(email);

-- ---------------------------------------------------------------------------
-- Cafe listings
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS cafe (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL UNIQUE,
    map_url TEXT NOT NULL,
    img_url TEXT NOT NULL,
    location TEXT NOT NULL,
    seats TEXT NOT NULL,
    has_toilet TEXT NOT NULL,
    has_wifi TEXT NOT NULL,
    has_sockets TEXT NOT NULL,
    can_take_calls TEXT NOT NULL,
    coffee_price TEXT NOT NULL,
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);
"#;
