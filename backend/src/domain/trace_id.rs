//! Correlation id for one HTTP request.
//!
//! The trace middleware runs each request inside [`TraceId::scope`]; domain
//! errors built anywhere below it read [`TraceId::current`] and carry the id
//! back to the client. The id lives in a tokio task-local, so work moved onto
//! another task with `tokio::spawn` has to be re-scoped explicitly.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use uuid::Uuid;

tokio::task_local! {
    static CURRENT: TraceId;
}

/// Random v4 identifier shared by a request's response header, error body and
/// log events.
///
/// # Examples
/// ```
/// use circle::TraceId;
///
/// let id: TraceId = "6f1c1b8e-2a7d-4a43-9a55-1b2c3d4e5f60".parse().unwrap();
/// assert_eq!(id.to_string(), "6f1c1b8e-2a7d-4a43-9a55-1b2c3d4e5f60");
/// assert!(TraceId::current().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The id of the request being served, if any.
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `id` as the current trace id.
    pub async fn scope<F: Future>(id: Self, fut: F) -> F::Output {
        CURRENT.scope(id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
