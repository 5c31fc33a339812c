use std::sync::{Arc, Mutex};

use super::store::EntrySet;

/// Storage abstraction so the service can be exercised in isolation.
///
/// Every closure runs while the implementation holds exclusive (for
/// `write`) or shared (for `read`) access to the whole entry set, which is
/// what keeps a join atomic.
pub trait WaitlistRepository: Send + Sync {
    fn read<T, F>(&self, op: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&EntrySet) -> T;

    fn write<T, F>(&self, op: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut EntrySet) -> T;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-local repository guarding the entry set with a mutex.
#[derive(Debug, Default, Clone)]
pub struct InMemoryWaitlistRepository {
    entries: Arc<Mutex<EntrySet>>,
}

impl InMemoryWaitlistRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WaitlistRepository for InMemoryWaitlistRepository {
    fn read<T, F>(&self, op: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&EntrySet) -> T,
    {
        let guard = self
            .entries
            .lock()
            .map_err(|_| RepositoryError::Unavailable("entry store lock poisoned".to_string()))?;
        Ok(op(&guard))
    }

    fn write<T, F>(&self, op: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&mut EntrySet) -> T,
    {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| RepositoryError::Unavailable("entry store lock poisoned".to_string()))?;
        Ok(op(&mut guard))
    }
}
