pub mod json_backend;

use crate::errors::Result;
use crate::ledger::Ledger;

pub use json_backend::JsonStorage;

/// Abstraction over persistence backends holding one ledger document per
/// user. Users are isolated purely by separate backing files; no cross-user
/// locking exists or is needed.
pub trait StorageBackend: Send + Sync {
    /// Loads the user's ledger, or an empty one if nothing was persisted yet.
    fn load(&self, user: &str) -> Result<Ledger>;
    /// Persists the whole document. Must not leave a partial write visible.
    fn save(&self, user: &str, ledger: &Ledger) -> Result<()>;
}
