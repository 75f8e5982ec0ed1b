use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use flight_feed::FlightSource;
use threadpool::ThreadPool;

use crate::sync::SyncCycle;

// Upper bound on how long a stopped timer keeps sleeping.
const STOP_POLL: Duration = Duration::from_millis(50);

/// Handle on a running sync schedule. Stopping it (or dropping it) ends the
/// schedule after the current tick; fetches already in flight still complete.
#[derive(Debug)]
pub struct SyncHandle {
    running: Arc<AtomicBool>,
}

impl SyncHandle {
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Fires a fetch right away and then once per interval.
///
/// The timer thread only counts ticks: each fetch runs on a worker of the pool,
/// so a slow request never delays the next tick and several fetches may be in
/// flight at once. When every worker is busy the pool grows by one thread, so a
/// hung fetch holds up only its own cycle; it shrinks back to `workers` once
/// the backlog clears. Completed fetches are delivered in completion order, each
/// tagged with the tick that issued it.
pub struct SyncScheduler {
    interval: Duration,
    thread_pool: ThreadPool,
}

impl SyncScheduler {
    pub fn new(interval: Duration, workers: usize) -> Self {
        Self {
            interval,
            thread_pool: ThreadPool::with_name("sync-worker".to_string(), workers.max(1)),
        }
    }

    /// Starts the schedule. `notify` is called from a worker thread after each
    /// completed fetch is queued on the returned receiver.
    pub fn start<S, N>(
        self,
        source: Arc<S>,
        notify: N,
    ) -> Result<(SyncHandle, Receiver<SyncCycle>), SchedulerError>
    where
        S: FlightSource + ?Sized + 'static,
        N: Fn() + Send + Sync + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let (sender, receiver) = mpsc::channel();
        let notify = Arc::new(notify);

        let timer_running = Arc::clone(&running);
        let SyncScheduler {
            interval,
            mut thread_pool,
        } = self;
        let workers = thread_pool.max_count();

        thread::Builder::new()
            .name("sync-timer".to_string())
            .spawn(move || {
                let mut sequence = 0;
                while timer_running.load(Ordering::SeqCst) {
                    let now = Instant::now();
                    sequence += 1;

                    let source = Arc::clone(&source);
                    let sender = sender.clone();
                    let notify = Arc::clone(&notify);
                    let busy = thread_pool.active_count() + thread_pool.queued_count();
                    let wanted = workers.max(busy + 1);
                    if wanted != thread_pool.max_count() {
                        thread_pool.set_num_threads(wanted);
                    }
                    thread_pool.execute(move || {
                        let result = source.fetch_flights();
                        if sender.send(SyncCycle { sequence, result }).is_ok() {
                            notify();
                        }
                    });

                    while timer_running.load(Ordering::SeqCst) {
                        let remaining = interval.saturating_sub(now.elapsed());
                        if remaining.is_zero() {
                            break;
                        }
                        thread::sleep(remaining.min(STOP_POLL));
                    }
                }
            })
            .map_err(|e| SchedulerError::TimerStart(e.to_string()))?;

        Ok((SyncHandle { running }, receiver))
    }
}

#[derive(Debug)]
pub enum SchedulerError {
    TimerStart(String),
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerError::TimerStart(msg) => {
                write!(f, "[TimerStart]: Failed to start the sync timer: {}", msg)
            }
        }
    }
}

impl std::error::Error for SchedulerError {}
