//! Frontier queue and visited set
//!
//! This module holds the only shared mutable state of a crawl run:
//! - `VisitedSet`: URLs already claimed, bounded by the page budget
//! - `Frontier`: URLs pending a claim attempt, shared by all workers
//!
//! Both are created empty at run start and dropped when the run ends.

use crate::config::Traversal;
use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::Notify;
use url::Url;

/// Set of URLs claimed during a run, capped at `max_pages`
///
/// A claim is a single check-and-insert under one lock, so concurrent workers
/// can never visit the same URL twice or exceed the budget.
#[derive(Debug)]
pub struct VisitedSet {
    claimed: Mutex<HashSet<String>>,
    max_pages: usize,
}

impl VisitedSet {
    pub fn new(max_pages: usize) -> Self {
        Self {
            claimed: Mutex::new(HashSet::new()),
            max_pages,
        }
    }

    /// Claims a URL for visiting
    ///
    /// # Returns
    ///
    /// * `true` - The URL was new and the budget allowed it; it is now visited
    /// * `false` - The URL was already claimed or the budget is exhausted
    pub fn try_claim(&self, url: &Url) -> bool {
        let mut claimed = lock(&self.claimed);
        if claimed.len() >= self.max_pages || claimed.contains(url.as_str()) {
            return false;
        }
        claimed.insert(url.as_str().to_string())
    }

    /// Number of URLs claimed so far
    pub fn size(&self) -> usize {
        lock(&self.claimed).len()
    }

    pub fn contains(&self, url: &Url) -> bool {
        lock(&self.claimed).contains(url.as_str())
    }

    /// Returns true once no further claim can succeed
    pub fn is_exhausted(&self) -> bool {
        self.size() >= self.max_pages
    }
}

#[derive(Debug, Default)]
struct FrontierState {
    pending: VecDeque<Url>,
    /// Items handed out by `next` and not yet reported `done`
    in_flight: usize,
    closed: bool,
}

/// Work queue of pending URLs shared by all crawl workers
///
/// Depth-first order pops the most recently pushed URL; breadth-first pops
/// the oldest. The frontier closes itself once nothing is pending and no
/// worker holds an item, since only in-flight items can add more work.
#[derive(Debug)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    wakeup: Notify,
    traversal: Traversal,
}

impl Frontier {
    pub fn new(traversal: Traversal) -> Self {
        Self {
            state: Mutex::new(FrontierState::default()),
            wakeup: Notify::new(),
            traversal,
        }
    }

    /// Adds one URL as pending
    pub fn push(&self, url: Url) {
        self.extend(std::iter::once(url));
    }

    /// Adds the links of one page as pending
    ///
    /// Under depth-first traversal the first link of the page is the next one
    /// popped, so sibling links are explored in page order.
    pub fn extend<I>(&self, links: I)
    where
        I: IntoIterator<Item = Url>,
    {
        {
            let mut state = lock(&self.state);
            if state.closed {
                return;
            }
            match self.traversal {
                Traversal::DepthFirst => {
                    let links: Vec<Url> = links.into_iter().collect();
                    state.pending.extend(links.into_iter().rev());
                }
                Traversal::BreadthFirst => state.pending.extend(links),
            }
        }
        self.wakeup.notify_waiters();
    }

    /// Waits for the next pending URL
    ///
    /// Returns `None` once the frontier is closed, either explicitly or
    /// because it drained with no item in flight. Every `Some` must be
    /// matched by a call to [`Frontier::done`].
    pub async fn next(&self) -> Option<Url> {
        loop {
            let notified = self.wakeup.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = lock(&self.state);
                if state.closed {
                    return None;
                }

                let popped = match self.traversal {
                    Traversal::DepthFirst => state.pending.pop_back(),
                    Traversal::BreadthFirst => state.pending.pop_front(),
                };

                if let Some(url) = popped {
                    state.in_flight += 1;
                    return Some(url);
                }

                if state.in_flight == 0 {
                    state.closed = true;
                    drop(state);
                    self.wakeup.notify_waiters();
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Reports that an item returned by `next` has been fully handled
    pub fn done(&self) {
        {
            let mut state = lock(&self.state);
            state.in_flight = state.in_flight.saturating_sub(1);
            if state.in_flight == 0 && state.pending.is_empty() {
                state.closed = true;
            }
        }
        self.wakeup.notify_waiters();
    }

    /// Closes the frontier, discarding everything still pending
    pub fn close(&self) {
        {
            let mut state = lock(&self.state);
            state.closed = true;
            state.pending.clear();
        }
        self.wakeup.notify_waiters();
    }

    /// Number of URLs waiting for a claim attempt
    pub fn pending(&self) -> usize {
        lock(&self.state).pending.len()
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.state).closed
    }
}

/// Locks a mutex, recovering the data if a worker panicked while holding it
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
