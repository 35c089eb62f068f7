//! Correlation id shared by a request's log lines and its error body.
//!
//! The id lives in a Tokio task-local. Work moved onto another task loses it
//! unless the spawned future is wrapped in [`TraceId::scope`]. Background
//! sweep runs get their own id through [`TraceId::fresh`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static CURRENT: TraceId;
}

/// Id echoed in the `trace-id` response header and in [`super::Error`]
/// payloads.
///
/// # Examples
/// ```
/// use backend::TraceId;
///
/// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
/// let id = TraceId::generate();
/// let seen = TraceId::scope(id, async { TraceId::current() }).await;
/// assert_eq!(seen, Some(id));
/// assert!(TraceId::current().is_none());
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Random v4 id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Id of the enclosing request or sweep run.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Drive `fut` with `id` as the current trace id.
    pub async fn scope<F: Future>(id: Self, fut: F) -> F::Output {
        CURRENT.scope(id, fut).await
    }

    /// Drive `fut` under a newly generated id.
    pub async fn fresh<F: Future>(fut: F) -> F::Output {
        Self::scope(Self::generate(), fut).await
    }

    /// Underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(raw).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn nested_scopes_shadow_and_restore() {
        let outer = TraceId::generate();
        let inner = TraceId::generate();
        let seen = TraceId::scope(outer, async move {
            let nested = TraceId::scope(inner, async { TraceId::current() }).await;
            (nested, TraceId::current())
        })
        .await;
        assert_eq!(seen, (Some(inner), Some(outer)));
    }

    #[tokio::test]
    async fn spawned_tasks_start_without_an_id() {
        let seen = TraceId::scope(TraceId::generate(), async {
            tokio::spawn(async { TraceId::current() })
                .await
                .expect("task joins")
        })
        .await;
        assert!(seen.is_none());
    }

    #[tokio::test]
    async fn fresh_runs_get_distinct_ids() {
        let first = TraceId::fresh(async { TraceId::current() }).await;
        let second = TraceId::fresh(async { TraceId::current() }).await;
        assert!(first.is_some());
        assert_ne!(first, second);
    }

    #[test]
    fn header_form_parses_back() {
        let id = TraceId::generate();
        let parsed: TraceId = id.to_string().parse().expect("hyphenated uuid");
        assert_eq!(parsed.as_uuid(), id.as_uuid());
        assert!("not-a-trace-id".parse::<TraceId>().is_err());
    }
}
