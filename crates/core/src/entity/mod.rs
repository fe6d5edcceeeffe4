mod error;
mod password;
mod types;
mod user;

pub use error::EntityError;
pub use password::{hash_password, is_password_hash, MIN_PASSWORD_LEN};
pub use types::{Entity, Property, PropertyKind, Value};
pub use user::{User, USER_PROPERTIES};
