//! Single-writer dispatcher loop shared by both engines.
//!
//! Each running engine owns exactly one dispatcher thread. All scheduling state
//! (heap or wheel, key index) lives on that thread; callers only reach it by
//! sending [`Command`]s through a bounded mailbox. The loop blocks on whichever
//! comes first: a command, the shutdown signal, or the engine's next wake
//! deadline. After every wake it lets the engine emit due tasks and hands them
//! to the spawner without waiting for them.

use std::marker::PhantomData;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime};

use crossbeam_channel::{bounded, select, Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::SchedulerConfig;

use super::error::SchedulerError;
use super::scheduler::{SchedulerCounters, SchedulerStats, Spawn};
use super::task::{generate_key, Command, DueTask, TaskArgs, TaskFn, TaskSpec};

/// Scheduling state driven by a dispatcher loop.
pub(crate) trait Engine: Send + 'static {
    /// Name used for thread names and log fields.
    const NAME: &'static str;

    /// Fresh state for a newly started loop.
    fn new(config: &SchedulerConfig) -> Self;

    /// Place a task under an already resolved key with no live registration.
    fn schedule(&mut self, spec: TaskSpec, due: &mut Vec<DueTask>);

    /// Retire the live task under `key`. Returns whether one existed.
    fn cancel(&mut self, key: &str) -> bool;

    /// Emit every task whose fire time has been reached.
    fn advance(&mut self, due: &mut Vec<DueTask>);

    /// How long the loop may sleep before `advance` has work again.
    fn next_wake(&self) -> Duration;

    /// Live tasks still waiting.
    fn pending(&self) -> usize;
}

/// Handles to a running dispatcher thread.
struct Running {
    commands: Sender<Command>,
    shutdown: Sender<()>,
    thread: JoinHandle<()>,
}

/// Start/stop lifecycle and mailbox access for one engine instance.
pub(crate) struct Runner<E: Engine> {
    config: SchedulerConfig,
    spawner: Arc<dyn Spawn>,
    counters: Arc<SchedulerCounters>,
    running: Mutex<Option<Running>>,
    _engine: PhantomData<fn() -> E>,
}

impl<E: Engine> Runner<E> {
    pub fn new(config: SchedulerConfig, spawner: Arc<dyn Spawn>) -> Self {
        Self {
            config,
            spawner,
            counters: Arc::new(SchedulerCounters::default()),
            running: Mutex::new(None),
            _engine: PhantomData,
        }
    }

    /// Spawn the dispatcher loop with fresh state. No-op if already running.
    pub fn start(&self) -> Result<(), SchedulerError> {
        let mut running = self.running.lock();
        if running.is_some() {
            return Ok(());
        }

        let (command_tx, command_rx) = bounded(self.config.mailbox_capacity);
        let (shutdown_tx, shutdown_rx) = bounded(0);
        self.counters.pending_tasks.store(0, Ordering::Relaxed);

        let dispatch = DispatchLoop {
            engine: E::new(&self.config),
            commands: command_rx,
            shutdown: shutdown_rx,
            spawner: Arc::clone(&self.spawner),
            counters: Arc::clone(&self.counters),
        };

        let thread = thread::Builder::new()
            .name(format!("{}-dispatcher", E::NAME))
            .spawn(move || dispatch.run())?;

        *running = Some(Running {
            commands: command_tx,
            shutdown: shutdown_tx,
            thread,
        });

        info!(
            engine = E::NAME,
            mailbox_capacity = self.config.mailbox_capacity,
            "scheduler started"
        );
        Ok(())
    }

    /// Signal the loop to exit and wait until it has. No-op if not running.
    /// Called on the dispatcher thread itself, it only signals.
    pub fn stop(&self) {
        // join outside the lock so concurrent callers see `Stopped` immediately
        let Some(running) = self.running.lock().take() else {
            return;
        };

        drop(running.shutdown);
        drop(running.commands);

        // a callback owning the last handle can drop it on the dispatcher itself;
        // the closed channels already end the loop there
        if running.thread.thread().id() == thread::current().id() {
            debug!(engine = E::NAME, "scheduler dropped from its own dispatcher thread");
        } else if running.thread.join().is_err() {
            warn!(engine = E::NAME, "dispatcher thread panicked");
        }
        info!(engine = E::NAME, "scheduler stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }

    pub fn submit(
        &self,
        key: &str,
        at: SystemTime,
        callback: Option<TaskFn>,
        args: TaskArgs,
        update: bool,
    ) -> Result<(), SchedulerError> {
        let callback = callback.ok_or(SchedulerError::InvalidCallback)?;
        let spec = TaskSpec {
            key: key.to_owned(),
            at,
            callback,
            args,
        };
        let command = if update {
            Command::Update(spec)
        } else {
            Command::Add(spec)
        };

        self.send(command)?;
        self.counters.submitted_tasks.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), SchedulerError> {
        if key.is_empty() {
            return Ok(());
        }
        self.send(Command::Cancel(key.to_owned()))
    }

    pub fn stats(&self) -> SchedulerStats {
        self.counters.snapshot()
    }

    /// Blocks while the mailbox is full.
    fn send(&self, command: Command) -> Result<(), SchedulerError> {
        let commands = self
            .running
            .lock()
            .as_ref()
            .map(|running| running.commands.clone())
            .ok_or(SchedulerError::Stopped)?;

        commands.send(command).map_err(|_| SchedulerError::Stopped)
    }
}

impl<E: Engine> Drop for Runner<E> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// State moved onto the dispatcher thread.
struct DispatchLoop<E> {
    engine: E,
    commands: Receiver<Command>,
    shutdown: Receiver<()>,
    spawner: Arc<dyn Spawn>,
    counters: Arc<SchedulerCounters>,
}

impl<E: Engine> DispatchLoop<E> {
    fn run(self) {
        let Self {
            mut engine,
            commands,
            shutdown,
            spawner,
            counters,
        } = self;

        debug!(engine = E::NAME, "dispatcher loop running");

        let mut due = Vec::new();
        loop {
            let timeout = engine.next_wake();
            select! {
                recv(shutdown) -> _ => break,
                recv(commands) -> command => match command {
                    Ok(command) => apply(&mut engine, command, &mut due, &counters),
                    Err(_) => break,
                },
                default(timeout) => {}
            }

            engine.advance(&mut due);
            for task in due.drain(..) {
                counters.fired_tasks.fetch_add(1, Ordering::Relaxed);
                debug!(engine = E::NAME, key = %task.key, "task fired");
                spawner.spawn(Box::new(move || task.run()));
            }
            counters
                .pending_tasks
                .store(engine.pending(), Ordering::Relaxed);
        }

        debug!(engine = E::NAME, "dispatcher loop exiting");
    }
}

/// Apply one mailbox command. Re-registration cancels first, inside this turn.
fn apply<E: Engine>(
    engine: &mut E,
    command: Command,
    due: &mut Vec<DueTask>,
    counters: &SchedulerCounters,
) {
    let (mut spec, op) = match command {
        Command::Add(spec) => (spec, "add"),
        Command::Update(spec) => (spec, "update"),
        Command::Cancel(key) => {
            if engine.cancel(&key) {
                counters.cancelled_tasks.fetch_add(1, Ordering::Relaxed);
                debug!(engine = E::NAME, key = %key, "task cancelled");
            }
            return;
        }
    };

    if spec.key.is_empty() {
        spec.key = generate_key();
    } else if engine.cancel(&spec.key) {
        debug!(engine = E::NAME, key = %spec.key, "previous registration replaced");
    }

    debug!(engine = E::NAME, key = %spec.key, op, "task scheduled");
    engine.schedule(spec, due);
}
