pub mod memory;
pub mod sqlite;

use crate::app::Result;
use crate::domain::Credential;

pub use memory::MemoryCredentialStore;
pub use sqlite::SqliteCredentialStore;

/// Persistent home of the single process-wide auth token.
///
/// Writes are last-write-wins; `read` never fails and reports storage
/// problems as an absent token.
pub trait CredentialStore: Send + Sync {
    fn save(&self, credential: &Credential) -> Result<()>;
    fn read(&self) -> Option<Credential>;
    fn clear(&self) -> Result<()>;
}
