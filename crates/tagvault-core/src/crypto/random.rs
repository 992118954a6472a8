//! Source of cryptographically secure random bytes.

/// Error reported by a [`RandomSource`].
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Fills buffers with cryptographically secure random bytes.
///
/// Nonces and row IDs are both drawn from a `RandomSource`, so a host (or a
/// test) can swap the OS generator for something else.
pub trait RandomSource: Send + Sync {
    fn fill(&self, dest: &mut [u8]) -> Result<(), SourceError>;
}

/// The operating system's CSPRNG, via `getrandom`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<(), SourceError> {
        getrandom::getrandom(dest).map_err(|e| e.to_string().into())
    }
}
