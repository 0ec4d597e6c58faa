//! Ordered credential pool.
//!
//! The cursor only moves through [`CredentialPool::rotate`]. There is no
//! health memory: a credential that failed earlier is tried again once the
//! cursor wraps around.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use secrecy::SecretString;

use antigravity_types::error::ChatError;

/// A single API secret and its position in the pool.
///
/// The secret is wrapped in [`SecretString`]; `Debug` prints only the index.
pub struct Credential {
    index: usize,
    secret: SecretString,
}

impl Credential {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn secret(&self) -> &SecretString {
        &self.secret
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("index", &self.index)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Round-robin pool of interchangeable credentials.
///
/// An empty pool is the permanently degraded state: [`current`] always fails
/// and [`rotate`] is a no-op.
///
/// [`current`]: CredentialPool::current
/// [`rotate`]: CredentialPool::rotate
#[derive(Debug)]
pub struct CredentialPool {
    credentials: Vec<Arc<Credential>>,
    cursor: Mutex<usize>,
}

impl CredentialPool {
    pub fn new(secrets: Vec<SecretString>) -> Self {
        let credentials = secrets
            .into_iter()
            .enumerate()
            .map(|(index, secret)| Arc::new(Credential { index, secret }))
            .collect();
        Self {
            credentials,
            cursor: Mutex::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Position of the credential [`current`](Self::current) would return.
    pub fn cursor(&self) -> usize {
        *self.lock()
    }

    /// The credential under the cursor.
    pub fn current(&self) -> Result<Arc<Credential>, ChatError> {
        let cursor = self.lock();
        self.credentials
            .get(*cursor)
            .cloned()
            .ok_or(ChatError::NoCredentialsAvailable)
    }

    /// Advance the cursor by one, wrapping at the end.
    ///
    /// Returns `false` without doing anything when the pool is empty.
    pub fn rotate(&self) -> bool {
        if self.credentials.is_empty() {
            return false;
        }
        let mut cursor = self.lock();
        *cursor = (*cursor + 1) % self.credentials.len();
        tracing::info!(cursor = *cursor, pool_size = self.credentials.len(), "rotated credential");
        true
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        // The guarded value is a plain index; a poisoned lock still holds a valid one.
        self.cursor.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn pool(keys: &[&str]) -> CredentialPool {
        CredentialPool::new(keys.iter().map(|k| SecretString::from(k.to_string())).collect())
    }

    #[test]
    fn empty_pool_is_degraded() {
        let pool = CredentialPool::empty();
        assert!(matches!(pool.current(), Err(ChatError::NoCredentialsAvailable)));
        assert!(!pool.rotate());
        assert_eq!(pool.cursor(), 0);
    }

    #[test]
    fn rotate_advances_and_wraps() {
        let pool = pool(&["k1", "k2", "k3"]);
        assert_eq!(pool.current().unwrap().secret().expose_secret(), "k1");
        assert!(pool.rotate());
        assert_eq!(pool.current().unwrap().secret().expose_secret(), "k2");
        assert!(pool.rotate());
        assert!(pool.rotate());
        assert_eq!(pool.cursor(), 0);
        assert_eq!(pool.current().unwrap().index(), 0);
    }

    #[test]
    fn rotating_pool_size_times_returns_to_start() {
        for size in 1..=5 {
            let keys: Vec<String> = (0..size).map(|i| format!("k{i}")).collect();
            let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
            let pool = pool(&refs);
            pool.rotate();
            let start = pool.cursor();
            for _ in 0..size {
                assert!(pool.rotate());
            }
            assert_eq!(pool.cursor(), start);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_rotation_keeps_cursor_in_range() {
        const TASKS: usize = 8;
        const ROTATIONS: usize = 250;

        let pool = Arc::new(pool(&["k1", "k2", "k3"]));
        let mut handles = Vec::new();
        for _ in 0..TASKS {
            let pool = pool.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..ROTATIONS {
                    assert!(pool.rotate());
                    let credential = pool.current().expect("cursor left the pool");
                    assert!(credential.index() < pool.len());
                    tokio::task::yield_now().await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(pool.cursor(), (TASKS * ROTATIONS) % pool.len());
    }

    #[test]
    fn debug_output_hides_secret() {
        let pool = pool(&["super-secret-key"]);
        let rendered = format!("{:?}", pool.current().unwrap());
        assert!(!rendered.contains("super-secret-key"));
        assert!(rendered.contains("REDACTED"));
    }
}
