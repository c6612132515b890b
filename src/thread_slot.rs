//==============================================================================
// Thread-local storage: one identifier per thread
//==============================================================================

use crate::error::{Result, TourError};
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, ThreadId};

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    // Assigned on first access in each thread, then cached until it exits.
    static THREAD_ID: u64 = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
}

/// Thread-local value of the calling thread.
pub fn current_id() -> u64 {
    THREAD_ID.with(|id| *id)
}

/// Per-thread values captured once when a worker starts and handed down to
/// whatever the worker calls. The id comes from the runtime, not from the
/// thread-local slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadContext {
    pub runtime_id: ThreadId,
    pub name: Option<String>,
}

impl ThreadContext {
    pub fn enter() -> Self {
        let current = thread::current();
        ThreadContext {
            runtime_id: current.id(),
            name: current.name().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadObservation {
    pub thread_id: ThreadId,
    pub local_value: u64,
}

impl ThreadObservation {
    pub fn line(&self) -> String {
        format!(
            "Thread ID: {:?}, Thread-Local Value: {}",
            self.thread_id, self.local_value
        )
    }
}

fn observe(ctx: &ThreadContext) -> ThreadObservation {
    ThreadObservation {
        thread_id: ctx.runtime_id,
        local_value: current_id(),
    }
}

/// Runs `count` workers side by side. Each one reads its own slot, hands the
/// observation to `report` from inside the worker, and returns it. All
/// workers are joined before this returns.
pub fn observe_workers<F>(count: usize, report: F) -> Result<Vec<ThreadObservation>>
where
    F: Fn(&ThreadContext, &ThreadObservation) -> io::Result<()> + Sync,
{
    thread::scope(|s| {
        let mut handles = Vec::with_capacity(count);

        for index in 0..count {
            let report = &report;
            let handle = thread::Builder::new()
                .name(format!("worker-{index}"))
                .spawn_scoped(s, move || {
                    let ctx = ThreadContext::enter();
                    let observation = observe(&ctx);
                    report(&ctx, &observation).map(|_| observation)
                })?;
            handles.push(handle);
        }

        handles
            .into_iter()
            .enumerate()
            .map(|(index, handle)| -> Result<ThreadObservation> {
                let observation = handle
                    .join()
                    .map_err(|_| TourError::WorkerPanicked { index })??;
                Ok(observation)
            })
            .collect()
    })
}
