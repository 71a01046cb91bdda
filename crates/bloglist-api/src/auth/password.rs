/// Password hashing and verification using Argon2id
///
/// Each hash carries its own random 16-byte salt and the cost parameters it
/// was produced with, encoded as a PHC string. Verification reads the
/// parameters back from the stored string, so changing the configured cost
/// never invalidates existing hashes.
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use bloglist_core::AuthConfig;
use thiserror::Error;

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),

    #[error("Failed to verify password: {0}")]
    VerificationFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

/// Password hashing configuration
///
/// Increasing memory or iterations slows down hashing for everyone,
/// attackers included.
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    /// Memory cost in KiB (default: 19456 = 19 MiB)
    pub memory_cost: u32,
    /// Time cost (iterations, default: 2)
    pub time_cost: u32,
    /// Parallelism (lanes, default: 1)
    pub parallelism: u32,
    /// Output length in bytes (default: 32)
    pub output_len: Option<usize>,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self::from(&AuthConfig::default())
    }
}

impl From<&AuthConfig> for PasswordConfig {
    fn from(auth: &AuthConfig) -> Self {
        Self {
            memory_cost: auth.password_memory_kib,
            time_cost: auth.password_iterations,
            parallelism: auth.password_parallelism,
            output_len: Some(32),
        }
    }
}

impl PasswordConfig {
    /// Cheapest parameters argon2 accepts, for tests
    pub fn minimal() -> Self {
        Self {
            memory_cost: Params::MIN_M_COST.max(8),
            time_cost: 1,
            parallelism: 1,
            output_len: Some(32),
        }
    }

    /// Create Argon2 parameters from this configuration
    fn to_params(&self) -> Result<Params, PasswordError> {
        Params::new(
            self.memory_cost,
            self.time_cost,
            self.parallelism,
            self.output_len,
        )
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }
}

/// Hash a password with a fresh random salt
///
/// # Example
///
/// ```no_run
/// use bloglist_api::auth::password::{hash_password_with_config, verify_password, PasswordConfig};
///
/// let hash = hash_password_with_config("sekret", &PasswordConfig::default())
///     .expect("Failed to hash password");
/// assert!(verify_password("sekret", &hash).unwrap());
/// ```
///
/// # Returns
///
/// * `Ok(String)` - PHC string format hash (algorithm, parameters, salt, hash)
/// * `Err(PasswordError)` - If the parameters are rejected or hashing fails
pub fn hash_password_with_config(
    password: &str,
    config: &PasswordConfig,
) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = config.to_params()?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

    Ok(password_hash.to_string())
}

/// Verify a plaintext password against a stored hash
///
/// # Returns
///
/// * `Ok(true)` - Password matches
/// * `Ok(false)` - Password does not match
/// * `Err(PasswordError)` - The stored hash is not a valid PHC string
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHashFormat)?;

    let argon2 = Argon2::default();
    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(password: &str) -> String {
        hash_password_with_config(password, &PasswordConfig::minimal()).unwrap()
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash("sekret");

        assert!(verify_password("sekret", &hash).expect("Verification failed"));
        assert!(!verify_password("wrong", &hash).expect("Verification failed"));
    }

    #[test]
    fn test_same_password_produces_different_hashes() {
        let hash1 = hash("salainen");
        let hash2 = hash("salainen");

        assert_ne!(hash1, hash2);
        assert!(verify_password("salainen", &hash1).unwrap());
        assert!(verify_password("salainen", &hash2).unwrap());
    }

    #[test]
    fn test_hash_does_not_contain_password() {
        let hash = hash("plaintext-password");
        assert!(!hash.contains("plaintext-password"));
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_invalid_hash_format() {
        let result = verify_password("password", "invalid-hash-format");
        assert!(matches!(result, Err(PasswordError::InvalidHashFormat)));
    }

    #[test]
    fn test_config_from_auth_settings() {
        let auth = AuthConfig {
            password_memory_kib: 4096,
            password_iterations: 3,
            password_parallelism: 2,
            ..Default::default()
        };
        let config = PasswordConfig::from(&auth);

        let hash = hash_password_with_config("tunable", &config).unwrap();

        assert!(verify_password("tunable", &hash).unwrap());
        assert!(hash.contains("m=4096"));
        assert!(hash.contains("t=3"));
        assert!(hash.contains("p=2"));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let config = PasswordConfig {
            time_cost: 0,
            ..PasswordConfig::minimal()
        };
        assert!(matches!(
            hash_password_with_config("x", &config),
            Err(PasswordError::HashingFailed(_))
        ));
    }
}
