//! Timer queue for deferred one-shot actions
//!
//! Replaces "wait N seconds, then do X" flows with explicit data: the owner
//! schedules a payload, advances the queue by the tick delta and handles the
//! payloads that came due. Nothing ever blocks.

/// Handle to a scheduled task, used for cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

/// Tolerance when comparing deadlines against accumulated time
const DEADLINE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone)]
struct ScheduledTask<T> {
    handle: TaskHandle,
    deadline: f64,
    payload: T,
}

/// Per-owner queue of delayed payloads
#[derive(Debug, Clone)]
pub struct TaskQueue<T> {
    /// Accumulated time
    now: f64,
    /// Next handle value
    next_handle: u64,
    /// Pending tasks, in scheduling order
    tasks: Vec<ScheduledTask<T>>,
}

impl<T> TaskQueue<T> {
    /// Create an empty queue at time zero
    pub fn new() -> Self {
        Self {
            now: 0.0,
            next_handle: 0,
            tasks: Vec::new(),
        }
    }

    /// Current queue time
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Schedule `payload` to come due after `delay` time units
    pub fn schedule(&mut self, delay: f32, payload: T) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;
        self.tasks.push(ScheduledTask {
            handle,
            deadline: self.now + delay.max(0.0) as f64,
            payload,
        });
        handle
    }

    /// Cancel a pending task. Returns false if it already ran or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.handle != handle);
        self.tasks.len() != before
    }

    /// Cancel everything pending
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Whether the task is still pending
    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.handle == handle)
    }

    /// Number of pending tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Advance time and return every payload that came due, earliest first.
    /// Tasks sharing a deadline come out in scheduling order.
    pub fn advance(&mut self, delta_time: f32) -> Vec<T> {
        self.now += delta_time.max(0.0) as f64;
        let now = self.now + DEADLINE_EPSILON;

        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|t| t.deadline <= now);
        self.tasks = pending;

        // Stable sort keeps scheduling order for equal deadlines
        due.sort_by(|a, b| {
            a.deadline
                .partial_cmp(&b.deadline)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        due.into_iter().map(|t| t.payload).collect()
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
