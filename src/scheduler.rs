//! Enforcement scheduler
//!
//! A single repeating timer that keeps every countermeasure asserted: each
//! tick re-arms the interceptors, re-neutralizes the globals, and polls
//! the detection engine, in that fixed order. The loop has no cancellation
//! handle and never exits — the guard runs until page teardown.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::interval;

use crate::guard::Guard;
use crate::page::Page;

pub struct Scheduler;

impl Scheduler {
    /// Start the enforcement loop at the guard's configured tick interval.
    /// Deliberately returns nothing: there is no legitimate "unprotect"
    /// operation to hand back.
    pub fn spawn(guard: Arc<Mutex<Guard>>, page: Arc<Mutex<Page>>) {
        tokio::spawn(async move {
            let period = guard.lock().await.config().tick_interval;
            let mut ticker = interval(period);
            loop {
                ticker.tick().await;
                let mut guard = guard.lock().await;
                let mut page = page.lock().await;
                guard.tick(&mut page);
            }
        });
    }
}

/// Boot sequencer: run the guard's synchronous installation, then start
/// the enforcement scheduler. The embedding application wires the page's
/// load event to [`Guard::on_load`] separately.
pub async fn boot(guard: Arc<Mutex<Guard>>, page: Arc<Mutex<Page>>) {
    {
        let mut g = guard.lock().await;
        let mut p = page.lock().await;
        g.install(&mut p);
    }
    Scheduler::spawn(guard, page);
}
