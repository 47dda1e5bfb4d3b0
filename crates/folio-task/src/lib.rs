//! Cancellation-scoped tasks for asynchronous render work.
//!
//! Every asynchronous operation in the pipeline (diagram rendering, document
//! loading, link metadata fetches) is started from a [`TaskScope`] owned by the
//! component that will display its result. Starting a task hands out a
//! [`TaskTicket`]; the owner commits a completed result only if the ticket is
//! still current.
//!
//! Two mechanisms cover the two kinds of supersession:
//!
//! - **Generation tags**: each [`TaskScope::begin`] bumps a generation counter.
//!   A result carrying an older generation is stale and must be discarded.
//!   This is how render tasks are "cancelled": they run to completion and
//!   their result is dropped.
//! - **Abort tokens**: each ticket carries a child of the scope's lifetime
//!   token. Starting a newer task, or closing the scope, cancels it. Fetches
//!   observe the token and stop early via [`TaskTicket::run_until_cancelled`].
//!
//! # Example
//!
//! ```
//! use folio_task::TaskScope;
//!
//! let mut scope = TaskScope::new("diagram");
//! let first = scope.begin();
//! let second = scope.begin();
//!
//! // The first task finished last: its result is stale.
//! assert!(scope.finish(&second));
//! assert!(!scope.finish(&first));
//! ```

mod scope;

pub use scope::{TaskScope, TaskTicket};
