use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;

use super::error::EntityError;
use super::password::{hash_password, is_password_hash, MIN_PASSWORD_LEN};
use super::types::{Entity, Property, PropertyKind, Value};

/// Declared properties of [`User`], matching the `users` table.
pub const USER_PROPERTIES: &[Property] = &[
    Property::new("id", "id", PropertyKind::Integer).nullable(),
    Property::new("username", "username", PropertyKind::Text),
    Property::new("password", "password", PropertyKind::Text),
    Property::new("join_time", "join_time", PropertyKind::Timestamp),
    Property::new("last_seen_time", "last_seen_time", PropertyKind::Timestamp),
];

/// A registered user.
///
/// The password is hashed on construction and the plaintext is never kept.
/// Timestamps are truncated to whole seconds, the precision of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: Option<i64>,
    username: String,
    #[serde(skip_serializing)]
    password: String,
    join_time: DateTime<Utc>,
    last_seen_time: DateTime<Utc>,
}

impl User {
    /// Creates a user from a plaintext password.
    ///
    /// # Errors
    ///
    /// Fails if the username is empty or the password is shorter than
    /// [`MIN_PASSWORD_LEN`] characters.
    pub fn new(username: impl Into<String>, password: &str) -> Result<Self, EntityError> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(EntityError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        Self::build(username.into(), hash_password(password))
    }

    /// Creates a user from a password that is already hashed.
    ///
    /// # Errors
    ///
    /// Fails if the username is empty or `password_hash` does not look like
    /// the output of [`hash_password`].
    pub fn from_hashed(
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Result<Self, EntityError> {
        let password_hash = password_hash.into();
        if !is_password_hash(&password_hash) {
            return Err(EntityError::MalformedPasswordHash);
        }
        Self::build(username.into(), password_hash)
    }

    fn build(username: String, password: String) -> Result<Self, EntityError> {
        if username.is_empty() {
            return Err(EntityError::EmptyUsername);
        }
        let now = Utc::now().trunc_subsecs(0);
        Ok(Self {
            id: None,
            username,
            password,
            join_time: now,
            last_seen_time: now,
        })
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_join_time(mut self, join_time: DateTime<Utc>) -> Self {
        self.join_time = join_time.trunc_subsecs(0);
        self
    }

    pub fn with_last_seen_time(mut self, last_seen_time: DateTime<Utc>) -> Self {
        self.last_seen_time = last_seen_time.trunc_subsecs(0);
        self
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password hash.
    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn join_time(&self) -> DateTime<Utc> {
        self.join_time
    }

    pub fn last_seen_time(&self) -> DateTime<Utc> {
        self.last_seen_time
    }
}

impl Entity for User {
    const ENTITY_TYPE: &'static str = "User";
    const TABLE: &'static str = "users";
    const PROPERTIES: &'static [Property] = USER_PROPERTIES;

    fn value_of(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(self.id.into()),
            "username" => Some(self.username.as_str().into()),
            "password" => Some(self.password.as_str().into()),
            "join_time" => Some(self.join_time.into()),
            "last_seen_time" => Some(self.last_seen_time.into()),
            _ => None,
        }
    }

    fn check_value(name: &str, value: &Value) -> Result<(), EntityError> {
        match (name, value) {
            ("username", Value::Text(username)) if username.is_empty() => {
                Err(EntityError::EmptyUsername)
            }
            ("password", Value::Text(hash)) if !is_password_hash(hash) => {
                Err(EntityError::MalformedPasswordHash)
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_password_is_hashed_on_construction() {
        let user = User::new("noahg", "ABC123!!!").unwrap();

        assert_ne!(user.password(), "ABC123!!!");
        assert_eq!(user.password(), hash_password("ABC123!!!"));
    }

    #[test]
    fn test_same_plaintext_gives_same_hash() {
        let a = User::new("alice", "iloveyou2").unwrap();
        let b = User::new("bob", "iloveyou2").unwrap();

        assert_eq!(a.password(), b.password());
    }

    #[test]
    fn test_short_password_is_rejected() {
        assert_eq!(
            User::new("noahg", "1234567"),
            Err(EntityError::PasswordTooShort { min: 8 })
        );
    }

    #[test]
    fn test_password_length_counts_characters() {
        assert!(User::new("noahg", "ñññññññ").is_err());
        assert!(User::new("noahg", "ññññññññ").is_ok());
    }

    #[test]
    fn test_empty_username_is_rejected() {
        assert_eq!(
            User::new("", "password1"),
            Err(EntityError::EmptyUsername)
        );
    }

    #[test]
    fn test_from_hashed_keeps_hash() {
        let hash = hash_password("sunshine");
        let user = User::from_hashed("noahg", hash.clone()).unwrap();

        assert_eq!(user.password(), hash);
    }

    #[test]
    fn test_from_hashed_rejects_plaintext() {
        assert_eq!(
            User::from_hashed("noahg", "sunshine"),
            Err(EntityError::MalformedPasswordHash)
        );
    }

    #[test]
    fn test_timestamps_default_to_now() {
        let before = Utc::now().trunc_subsecs(0);
        let user = User::new("noahg", "password1").unwrap();
        let after = Utc::now();

        assert!(user.join_time() >= before && user.join_time() <= after);
        assert_eq!(user.join_time(), user.last_seen_time());
        assert_eq!(user.id(), None);
    }

    #[test]
    fn test_has_properties_filters_unknown_names() {
        let found = User::has_properties(["username", "password", "bogus"]);

        assert_eq!(
            found.into_iter().collect::<Vec<_>>(),
            vec!["password".to_string(), "username".to_string()]
        );
    }

    #[test]
    fn test_to_map_has_every_column() {
        let user = User::new("noahg", "password1").unwrap().with_id(7);
        let keys: Vec<_> = user.to_map().into_iter().map(|(k, _)| k).collect();

        assert_eq!(
            keys,
            vec!["id", "username", "password", "join_time", "last_seen_time"]
        );
    }

    #[test]
    fn test_to_tuple_without_id_uses_epoch_seconds() {
        let join = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let seen = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let user = User::new("noahg", "password1")
            .unwrap()
            .with_join_time(join)
            .with_last_seen_time(seen);

        assert_eq!(
            user.to_tuple(&["id"], true),
            vec![
                Value::Text("noahg".to_string()),
                Value::Text(hash_password("password1")),
                Value::Integer(1_704_067_200),
                Value::Integer(1_704_153_600),
            ]
        );
    }

    #[test]
    fn test_serialization_omits_password() {
        let user = User::new("noahg", "password1").unwrap();
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["username"], "noahg");
        assert!(json.get("password").is_none());
    }
}
