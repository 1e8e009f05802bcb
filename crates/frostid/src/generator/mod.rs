
use crate::{Error, FrostId, Result, SystemClock, TimeSource};
use core::cmp::Ordering;
use parking_lot::Mutex;
use std::{thread, time::Duration};
use tracing::{instrument, trace};

/// Default sleep between clock samples while waiting out an exhausted
/// millisecond.
pub const DEFAULT_PAUSE: Duration = Duration::from_micros(100);

/// A lock-based ID generator suitable for multi-threaded environments.
///
/// The generator owns the mutable triple (last timestamp, sequence, fixed
/// worker ID) as one packed [`FrostId`] behind a mutex: the fields are only
/// ever valid together, so a single critical section guards all of them.
/// Share it across threads behind an `Arc`.
///
/// Each successful [`generate`] call returns a unique, roughly time-ordered
/// ID. Within one generator the returned stream is strictly increasing as
/// unsigned integers; across generators ordering holds only up to clock
/// granularity, and uniqueness requires distinct worker IDs.
///
/// [`generate`]: Self::generate
///
/// # Example
///
/// ```
/// use frostid::FrostIdGenerator;
///
/// let generator = FrostIdGenerator::new(7).expect("worker id fits 16 bits");
/// let id = generator.generate().expect("clock did not move backwards");
/// assert_eq!(id.worker_id(), 7);
/// ```
#[derive(Debug)]
pub struct FrostIdGenerator<T = SystemClock>
where
    T: TimeSource,
{
    state: Mutex<FrostId>,
    clock: T,
    pause: Duration,
}

impl FrostIdGenerator<SystemClock> {
    /// Creates a generator backed by the wall clock.
    ///
    /// The initial state is timestamp 0 and sequence 0 with the given worker
    /// ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWorkerId`] when `worker_id` exceeds
    /// [`FrostId::max_worker_id`] (65535). The parameter is `u64` so the
    /// out-of-range case is representable; callers typically pass a value
    /// resolved via [`resolve_worker_id`] or taken from configuration.
    ///
    /// [`resolve_worker_id`]: crate::resolve_worker_id
    pub fn new(worker_id: u64) -> Result<Self> {
        Self::with_clock(worker_id, SystemClock)
    }
}

impl<T> FrostIdGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator with an injected time source.
    ///
    /// Production code wants [`FrostIdGenerator::new`]; this constructor
    /// exists so tests can drive the generator with a controlled clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWorkerId`] when `worker_id` exceeds
    /// [`FrostId::max_worker_id`].
    pub fn with_clock(worker_id: u64, clock: T) -> Result<Self> {
        if worker_id > FrostId::max_worker_id() {
            return Err(Error::InvalidWorkerId {
                worker_id,
                max: FrostId::max_worker_id(),
            });
        }
        Ok(Self {
            state: Mutex::new(FrostId::from_components(0, worker_id, 0)),
            clock,
            pause: DEFAULT_PAUSE,
        })
    }

    /// Sets the sleep granularity of the exhausted-millisecond wait.
    ///
    /// The default is [`DEFAULT_PAUSE`] (100 µs). Smaller values re-sample
    /// the clock more aggressively; `Duration::ZERO` busy-polls.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// The fixed worker ID encoded into every generated ID.
    pub fn worker_id(&self) -> u64 {
        self.state.lock().worker_id()
    }

    /// Generates the next unique ID.
    ///
    /// The whole call runs under the generator's lock:
    ///
    /// - In a fresh millisecond the sequence resets to zero.
    /// - Within the same millisecond the sequence increments, yielding up to
    ///   4096 IDs per millisecond per worker. When the sequence is
    ///   exhausted, the call blocks until the clock reaches the next
    ///   millisecond, keeping the lock so no other caller can observe the
    ///   exhausted state. The wait re-samples the clock every
    ///   [`pause`](Self::with_pause) and has no timeout: a frozen clock
    ///   blocks indefinitely.
    ///
    /// Call [`FrostId::to_raw`] on the result for the plain `u64`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockRegression`] when the final observed time is
    /// behind the last successful generation. The failed call leaves the
    /// generator state untouched, so a later call under a recovered clock
    /// continues the stream; retrying is the caller's decision.
    ///
    /// # Example
    ///
    /// ```
    /// use frostid::FrostIdGenerator;
    ///
    /// let generator = FrostIdGenerator::new(0).expect("worker id fits 16 bits");
    /// match generator.generate() {
    ///     Ok(id) => println!("ID: {}", id.to_raw()),
    ///     Err(err) => eprintln!("generator error: {err}"),
    /// }
    /// ```
    #[instrument(level = "trace", skip(self))]
    pub fn generate(&self) -> Result<FrostId> {
        let mut state = self.state.lock();
        let now = self.clock.current_millis();
        let last = state.timestamp();

        let next = match now.cmp(&last) {
            Ordering::Equal => {
                if state.has_sequence_room() {
                    let id = state.increment_sequence();
                    *state = id;
                    return Ok(id);
                }
                let next = self.next_millis(last);
                // The regression check runs on the final observed value:
                // the clock may step backward while we wait.
                if next < last {
                    return Err(Error::ClockRegression {
                        last,
                        observed: next,
                    });
                }
                next
            }
            Ordering::Greater => now,
            Ordering::Less => {
                return Err(Error::ClockRegression {
                    last,
                    observed: now,
                });
            }
        };

        let id = state.rollover_to_timestamp(next);
        *state = id;
        Ok(id)
    }

    /// Polls the clock until it reports a millisecond other than `last`,
    /// sleeping [`pause`](Self::with_pause) between samples.
    ///
    /// Blocks at most the remaining fraction of the current millisecond
    /// under a healthy clock, and indefinitely under a frozen one.
    fn next_millis(&self, last: u64) -> u64 {
        trace!(last, "sequence exhausted; waiting for the next millisecond");
        let mut now = self.clock.current_millis();
        while now == last {
            thread::sleep(self.pause);
            now = self.clock.current_millis();
        }
        now
    }
}
