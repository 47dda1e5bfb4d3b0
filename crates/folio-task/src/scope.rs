//! Task scope and ticket types.

use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Owner-side handle for a sequence of tasks targeting one logical result.
///
/// Only the most recently started task may commit. The scope is tied to the
/// lifetime of its owner: dropping or [closing](Self::close) it cancels every
/// outstanding ticket.
#[derive(Debug)]
pub struct TaskScope {
    label: &'static str,
    generation: u64,
    lifetime: CancellationToken,
    inflight: Option<CancellationToken>,
}

impl TaskScope {
    /// Create a scope. The label only appears in log output.
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            generation: 0,
            lifetime: CancellationToken::new(),
            inflight: None,
        }
    }

    /// Start a new task, superseding any task already in flight.
    ///
    /// The previous ticket's abort token is cancelled. Its result, if it
    /// still arrives, will be rejected by [`finish`](Self::finish).
    pub fn begin(&mut self) -> TaskTicket {
        if let Some(previous) = self.inflight.take() {
            previous.cancel();
        }
        self.generation += 1;
        let token = self.lifetime.child_token();
        self.inflight = Some(token.clone());
        TaskTicket {
            generation: self.generation,
            token,
        }
    }

    /// Whether `ticket` belongs to the newest task of an open scope.
    #[must_use]
    pub fn is_current(&self, ticket: &TaskTicket) -> bool {
        !self.lifetime.is_cancelled() && ticket.generation == self.generation
    }

    /// Settle a completed task.
    ///
    /// Returns `true` when the caller may commit the task's result. Stale and
    /// post-close completions return `false` and must be dropped.
    pub fn finish(&mut self, ticket: &TaskTicket) -> bool {
        if self.is_current(ticket) {
            self.inflight = None;
            return true;
        }
        tracing::debug!(
            scope = self.label,
            ticket = ticket.generation,
            current = self.generation,
            closed = self.lifetime.is_cancelled(),
            "Discarding stale task result"
        );
        false
    }

    /// Whether a task started by this scope has not settled yet.
    #[must_use]
    pub fn has_inflight(&self) -> bool {
        self.inflight.is_some()
    }

    /// Generation of the newest task (0 before the first [`begin`](Self::begin)).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// End the owner's lifetime: abort everything outstanding.
    pub fn close(&mut self) {
        self.lifetime.cancel();
        self.inflight = None;
    }

    /// Whether [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lifetime.is_cancelled()
    }
}

impl Drop for TaskScope {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

/// Task-side handle: generation tag plus abort token.
#[derive(Clone, Debug)]
pub struct TaskTicket {
    generation: u64,
    token: CancellationToken,
}

impl TaskTicket {
    /// Generation this ticket was issued for (1-based, monotonic per scope).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the task has been superseded or its scope closed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Abort token for APIs that accept one directly.
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Drive `future` until it completes or the ticket is cancelled.
    ///
    /// Returns `None` on cancellation; the future is dropped at that point.
    pub async fn run_until_cancelled<F: Future>(&self, future: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            () = self.token.cancelled() => None,
            output = future => Some(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_generations_are_monotonic() {
        let mut scope = TaskScope::new("test");
        assert_eq!(scope.generation(), 0);
        let a = scope.begin();
        let b = scope.begin();
        assert_eq!(a.generation(), 1);
        assert_eq!(b.generation(), 2);
        assert_eq!(scope.generation(), 2);
    }

    #[test]
    fn test_newest_ticket_commits() {
        let mut scope = TaskScope::new("test");
        let ticket = scope.begin();
        assert!(scope.has_inflight());
        assert!(scope.finish(&ticket));
        assert!(!scope.has_inflight());
    }

    #[test]
    fn test_stale_ticket_rejected_after_newer_started() {
        let mut scope = TaskScope::new("test");
        let a = scope.begin();
        let b = scope.begin();

        // A resolves after B
        assert!(scope.finish(&b));
        assert!(!scope.finish(&a));
    }

    #[test]
    fn test_stale_ticket_rejected_even_if_it_finishes_first() {
        let mut scope = TaskScope::new("test");
        let a = scope.begin();
        let b = scope.begin();

        assert!(!scope.finish(&a));
        assert!(scope.has_inflight());
        assert!(scope.finish(&b));
    }

    #[test]
    fn test_begin_cancels_previous_token() {
        let mut scope = TaskScope::new("test");
        let a = scope.begin();
        assert!(!a.is_cancelled());
        let b = scope.begin();
        assert!(a.is_cancelled());
        assert!(!b.is_cancelled());
    }

    #[test]
    fn test_close_cancels_and_rejects() {
        let mut scope = TaskScope::new("test");
        let ticket = scope.begin();
        scope.close();
        assert!(scope.is_closed());
        assert!(ticket.is_cancelled());
        assert!(!scope.finish(&ticket));
    }

    #[test]
    fn test_drop_cancels_outstanding_tickets() {
        let ticket = {
            let mut scope = TaskScope::new("test");
            scope.begin()
        };
        assert!(ticket.is_cancelled());
    }

    #[tokio::test]
    async fn test_run_until_cancelled_completes() {
        let mut scope = TaskScope::new("test");
        let ticket = scope.begin();
        let output = ticket.run_until_cancelled(async { 42 }).await;
        assert_eq!(output, Some(42));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_cancelled_aborts_on_supersede() {
        let mut scope = TaskScope::new("test");
        let ticket = scope.begin();
        let task = tokio::spawn(async move {
            ticket
                .run_until_cancelled(tokio::time::sleep(Duration::from_secs(60)))
                .await
        });
        tokio::task::yield_now().await;
        let _newer = scope.begin();
        assert_eq!(task.await.unwrap(), None);
    }
}
