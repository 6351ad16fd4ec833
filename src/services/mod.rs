// Service exports
pub mod directory;
pub mod http;
pub mod memory;
pub mod outbox;
pub mod session;

pub use directory::{DirectoryError, MatchDirectory, UserDirectory};
pub use http::{HttpDirectoryOptions, HttpMatchDirectory};
pub use memory::{InMemoryDirectory, Operation};
pub use outbox::{OutboxError, RetryPolicy, VerdictOutbox};
pub use session::{LogNavigator, Navigator, RecordingNavigator, Route, SessionStore};
