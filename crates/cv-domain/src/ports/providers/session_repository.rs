//! Session persistence contract, separate from the business rules
//! in [`crate::ports::services::SessionServiceInterface`] that drive it.

use async_trait::async_trait;

use crate::entities::CodeSession;
use crate::error::Result;
use crate::value_objects::SessionId;

/// Durable storage for [`CodeSession`] records. Implementations must make
/// `save` atomic (write-to-temp then rename) and `list` tolerant of
/// individual malformed records.
#[async_trait]
pub trait SessionRepository: Send + Sync {
 /// Persists `session`, creating or overwriting its record.
 async fn save(&self, session: &CodeSession) -> Result<()>;

 /// Loads a previously persisted session.
 async fn load(&self, id: SessionId) -> Result<CodeSession>;

 /// Lists every persisted session, sorted by `updated_at` descending.
 /// Skips any record that fails to parse rather than failing the call.
 async fn list(&self) -> Result<Vec<CodeSession>>;

 /// Deletes a persisted session. Not an error if it didn't exist.
 async fn delete(&self, id: SessionId) -> Result<()>;
}
