//! Binary min-heap of task records with lazy cancellation.
//!
//! Records are ordered by fire second, then by arrival. A cancelled record keeps
//! its heap slot and is only reclaimed once it surfaces at the root, so a long
//! run of far-future registrations that are all cancelled stays in memory until
//! the clock reaches them.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, SystemTime};

use super::task::{DueTask, TaskArgs, TaskFn};
use crate::util::clock::unix_secs;

/// One scheduled unit of work.
struct TaskRecord {
    key: String,
    at: SystemTime,
    callback: TaskFn,
    args: TaskArgs,
    cancelled: bool,
}

/// Heap slot: `(fire second, arrival sequence)`, min-first.
type Slot = Reverse<(i64, u64)>;

/// Min-heap of pending tasks with a key index.
#[derive(Default)]
pub struct TaskHeap {
    heap: BinaryHeap<Slot>,
    records: HashMap<u64, TaskRecord>,
    keys: HashMap<String, u64>,
    next_seq: u64,
}

impl TaskHeap {
    /// Create an empty heap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a task, retiring any live task registered under the same key.
    pub fn push(&mut self, key: String, at: SystemTime, callback: TaskFn, args: TaskArgs) {
        self.cancel(&key);

        let seq = self.next_seq;
        self.next_seq += 1;

        self.heap.push(Reverse((unix_secs(at), seq)));
        self.keys.insert(key.clone(), seq);
        self.records.insert(
            seq,
            TaskRecord {
                key,
                at,
                callback,
                args,
                cancelled: false,
            },
        );
    }

    /// Flag the live task under `key` as cancelled. Returns whether one existed.
    pub fn cancel(&mut self, key: &str) -> bool {
        let Some(seq) = self.keys.remove(key) else {
            return false;
        };
        if let Some(record) = self.records.get_mut(&seq) {
            record.cancelled = true;
        }
        true
    }

    /// Move every task due at `now` into `due`, in fire order.
    ///
    /// Returns the time until the next pending task, or `None` once the heap is empty.
    pub fn pop_due(&mut self, now: SystemTime, due: &mut Vec<DueTask>) -> Option<Duration> {
        while let Some(&Reverse((_, seq))) = self.heap.peek() {
            let Some(record) = self.records.get(&seq) else {
                self.heap.pop();
                continue;
            };

            if record.cancelled {
                self.heap.pop();
                self.records.remove(&seq);
                continue;
            }

            if let Ok(wait) = record.at.duration_since(now) {
                if !wait.is_zero() {
                    return Some(wait);
                }
            }

            self.heap.pop();
            if let Some(record) = self.records.remove(&seq) {
                self.keys.remove(&record.key);
                due.push(DueTask {
                    key: record.key,
                    callback: record.callback,
                    args: record.args,
                });
            }
        }
        None
    }

    /// Number of live (not cancelled) tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// True when no live task remains.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Heap slots in use, including cancelled records not yet reclaimed.
    #[must_use]
    pub fn slots(&self) -> usize {
        self.heap.len()
    }

    /// Whether a live task is registered under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }
}
