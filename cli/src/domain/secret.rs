//! Secret generation for `randomGenerate` form fields.

use rand::Rng;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;

/// Length of every generated secret.
pub const SECRET_LENGTH: usize = 32;

/// Generate a [`SECRET_LENGTH`]-character alphanumeric token from the OS RNG.
#[must_use]
pub fn generate_secret() -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(SECRET_LENGTH)
        .map(char::from)
        .collect()
}
