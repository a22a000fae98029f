/**
 * Credential Hashing
 *
 * One-way salted password hashing with bcrypt. Each call to `hash` draws a
 * fresh salt, so hashing the same password twice yields different digests
 * that both verify.
 */

use bcrypt::BcryptError;

/// bcrypt hasher with a fixed work factor
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password
    ///
    /// Fails only when the underlying primitive does (invalid cost, RNG
    /// failure); callers surface that as an internal error.
    pub fn hash(&self, plaintext: &str) -> Result<String, BcryptError> {
        bcrypt::hash(plaintext, self.cost)
    }

    /// Compare a plaintext password to a stored digest
    ///
    /// A malformed digest is a mismatch, not an error.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        match bcrypt::verify(plaintext, digest) {
            Ok(valid) => valid,
            Err(e) => {
                tracing::warn!("Stored password digest could not be parsed: {}", e);
                false
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
