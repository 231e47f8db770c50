//! In-process repositories used when no database is configured.
//!
//! Each store guards its data with a `RwLock`; state lives only as long as
//! the process. Handy for local runs and for integration tests that drive the
//! HTTP surface end to end.

mod follows;
mod messages;
mod posts;
mod users;

pub use follows::InMemoryFollowRepository;
pub use messages::InMemoryMessageRepository;
pub use posts::InMemoryPostRepository;
pub use users::InMemoryUserRepository;
