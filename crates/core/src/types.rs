/// Store-assigned row identity (PostgreSQL BIGSERIAL).
pub type DbId = i64;

/// Lowest identity the store ever assigns. Anything below cannot exist.
pub const FIRST_ID: DbId = 1;

/// Store-assigned timestamps, always UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
