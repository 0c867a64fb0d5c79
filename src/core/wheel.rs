//! Single-level timing wheel with per-entry revolution counters.
//!
//! The wheel has `N` buckets, one per second. A cursor advances one bucket per
//! tick; an entry fires when the cursor reaches its bucket with a zero cycle
//! count, otherwise the count drops by one and the entry waits another
//! revolution. Any horizon fits, resolution is one second.

use std::collections::HashMap;

use super::task::{DueTask, TaskArgs, TaskFn};

/// Default wheel size: one hour of one-second buckets.
pub const DEFAULT_WHEEL_SLOTS: usize = 3600;

struct WheelTask {
    cycle_count: u64,
    seq: u64,
    callback: TaskFn,
    args: TaskArgs,
}

/// Where a task landed when it was placed on the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The fire time had already passed; the task was emitted as due.
    Immediate,
    /// The task waits in `bucket` for `cycle_count` further revolutions.
    Scheduled {
        /// Bucket index in `0..N`.
        bucket: usize,
        /// Visits of the cursor to `bucket` before the task fires.
        cycle_count: u64,
    },
}

/// Circular array of key-addressed buckets.
pub struct TimeWheel {
    slots: Vec<HashMap<String, WheelTask>>,
    keys: HashMap<String, usize>,
    cur_index: u64,
    start_secs: i64,
    next_seq: u64,
}

impl TimeWheel {
    /// Create a wheel of `slot_count` buckets whose tick 0 is `start_secs` (Unix seconds).
    #[must_use]
    pub fn new(slot_count: usize, start_secs: i64) -> Self {
        let slot_count = slot_count.max(1);
        Self {
            slots: (0..slot_count).map(|_| HashMap::new()).collect(),
            keys: HashMap::new(),
            cur_index: 0,
            start_secs,
            next_seq: 0,
        }
    }

    /// Place a task due at `at_secs`, retiring any live task under the same key.
    ///
    /// Tasks at or behind the cursor are pushed straight into `due`.
    pub fn place(
        &mut self,
        key: String,
        at_secs: i64,
        callback: TaskFn,
        args: TaskArgs,
        due: &mut Vec<DueTask>,
    ) -> Placement {
        self.remove(&key);

        let from_start = at_secs.saturating_sub(self.start_secs);
        let target = match u64::try_from(from_start) {
            Ok(target) if target > self.cur_index => target,
            _ => {
                due.push(DueTask {
                    key,
                    callback,
                    args,
                });
                return Placement::Immediate;
            }
        };

        let n = self.slots.len() as u64;
        let bucket = usize::try_from(target % n).unwrap_or_default();
        // visits to `bucket` strictly between the cursor and the target tick
        let cycle_count = (target - self.cur_index - 1) / n;

        let seq = self.next_seq;
        self.next_seq += 1;

        self.slots[bucket].insert(
            key.clone(),
            WheelTask {
                cycle_count,
                seq,
                callback,
                args,
            },
        );
        self.keys.insert(key, bucket);

        Placement::Scheduled {
            bucket,
            cycle_count,
        }
    }

    /// Remove the live task under `key`. Returns whether one existed.
    pub fn remove(&mut self, key: &str) -> bool {
        let Some(bucket) = self.keys.remove(key) else {
            return false;
        };
        self.slots[bucket].remove(key).is_some()
    }

    /// Advance the cursor one bucket and emit whatever is due there, in arrival order.
    pub fn tick(&mut self, due: &mut Vec<DueTask>) {
        self.cur_index += 1;
        let bucket = self.bucket_of(self.cur_index);

        let mut fired: Vec<(String, WheelTask)> = self.slots[bucket]
            .extract_if(|_, task| {
                if task.cycle_count == 0 {
                    true
                } else {
                    task.cycle_count -= 1;
                    false
                }
            })
            .collect();
        fired.sort_by_key(|(_, task)| task.seq);

        for (key, task) in fired {
            self.keys.remove(&key);
            due.push(DueTask {
                key,
                callback: task.callback,
                args: task.args,
            });
        }
    }

    /// Tick until the cursor reaches `elapsed_secs`. Returns the number of ticks taken.
    pub fn advance_to(&mut self, elapsed_secs: u64, due: &mut Vec<DueTask>) -> u64 {
        let mut ticks = 0;
        while self.cur_index < elapsed_secs {
            self.tick(due);
            ticks += 1;
        }
        ticks
    }

    /// Bucket and remaining cycle count of the live task under `key`.
    #[must_use]
    pub fn location(&self, key: &str) -> Option<(usize, u64)> {
        let bucket = *self.keys.get(key)?;
        self.slots[bucket]
            .get(key)
            .map(|task| (bucket, task.cycle_count))
    }

    /// Ticks taken since the wheel started.
    #[must_use]
    pub const fn cur_index(&self) -> u64 {
        self.cur_index
    }

    /// Number of live tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when no task is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn bucket_of(&self, index: u64) -> usize {
        usize::try_from(index % self.slots.len() as u64).unwrap_or_default()
    }
}
