//! Dummy data generation for bootstrapping and tests.
//!
//! Pure functions: the same `seed` always yields the same users (apart from
//! their construction timestamps).

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::entity::{EntityError, User};

/// Weak passwords handed out to dummy users.
pub const BAD_PASSWORDS: &[&str] = &[
    "123ABC!!!",
    "password1",
    "sunshine",
    "blink182",
    "iloveyou2",
    "trustno1",
];

const ADJECTIVES: &[&str] = &[
    "brave", "calm", "eager", "fuzzy", "gentle", "happy", "jolly", "lucky", "mellow", "quiet",
    "rapid", "sunny", "witty", "zesty",
];

const NOUNS: &[&str] = &[
    "badger", "comet", "falcon", "harbor", "lantern", "maple", "otter", "pepper", "river",
    "summit", "tiger", "walrus",
];

/// Generates `count` dummy users with distinct usernames.
///
/// Usernames combine a random adjective and noun with the user's index, so
/// they never collide within one batch.
///
/// # Example
///
/// ```
/// use harsh_core::seed::generate_dummy_users;
///
/// let users = generate_dummy_users(5, 42).unwrap();
/// let again = generate_dummy_users(5, 42).unwrap();
///
/// assert_eq!(users.len(), 5);
/// assert_eq!(users[0].username(), again[0].username());
/// ```
///
/// # Errors
///
/// Only fails if a generated user violates the `User` invariants.
pub fn generate_dummy_users(count: usize, seed: u64) -> Result<Vec<User>, EntityError> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..count)
        .map(|i| {
            let adjective = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
            let noun = NOUNS[rng.random_range(0..NOUNS.len())];
            let password = BAD_PASSWORDS[rng.random_range(0..BAD_PASSWORDS.len())];
            User::new(format!("{adjective}_{noun}{i}"), password)
        })
        .collect()
}
