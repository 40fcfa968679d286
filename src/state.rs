//! Shared bookkeeping for one crawl run.
//!
//! `CrawlState` is the only mutable state touched by concurrently running
//! targets. The record cap is enforced through [`CrawlState::try_reserve`],
//! a single compare-and-increment, so two member pages finishing at the same
//! time can never both claim the last slot. The visited sets are guarded by
//! mutexes whose check-and-insert happens under one lock.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug)]
pub struct CrawlState {
    cap: usize,
    reserved: AtomicUsize,
    visited_categories: Mutex<HashSet<String>>,
    visited_members: Mutex<HashSet<String>>,
}

impl CrawlState {
    /// Creates a new, atomically reference-counted state with the given cap
    pub fn new(cap: usize) -> Arc<Self> {
        Arc::new(Self {
            cap,
            reserved: AtomicUsize::new(0),
            visited_categories: Mutex::new(HashSet::new()),
            visited_members: Mutex::new(HashSet::new()),
        })
    }

    /// Slots claimed so far; each one ends in exactly one emitted record
    pub fn emitted(&self) -> usize {
        self.reserved.load(Ordering::SeqCst)
    }

    /// Whether no further slot can be reserved
    pub fn is_exhausted(&self) -> bool {
        self.emitted() >= self.cap
    }

    /// Claim one slot, failing once the cap has been reached
    pub fn try_reserve(&self) -> bool {
        self.reserved
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < self.cap).then_some(n + 1)
            })
            .is_ok()
    }

    /// Record a category URL; true only for the first caller
    pub fn mark_category(&self, url: &str) -> bool {
        insert_new(&self.visited_categories, url)
    }

    /// Record a member page URL; true only for the first caller
    pub fn mark_member(&self, url: &str) -> bool {
        insert_new(&self.visited_members, url)
    }
}

fn insert_new(set: &Mutex<HashSet<String>>, url: &str) -> bool {
    let mut seen = set.lock().unwrap_or_else(PoisonError::into_inner);
    if seen.contains(url) {
        return false;
    }
    seen.insert(url.to_string())
}
