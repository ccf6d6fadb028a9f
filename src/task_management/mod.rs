//! # Task Management System
//!
//! A pool of worker threads for the CPU-bound, independent-per-chunk work:
//! terrain generation and meshing. Each worker owns a dedicated channel
//! pair; the pool distributes tasks round-robin, queues overflow in FIFO
//! order, and drains completed outcomes back to the caller's thread.
//!
//! ## Task Lifecycle
//! 1. Tasks are published via [`WorkerPool::publish_task`]
//! 2. The pool picks a channel round-robin, or queues the task if every
//!    channel is at its in-flight cap
//! 3. The worker runs the task and sends its outcome back
//! 4. The caller drains outcomes with [`WorkerPool::drain_completed`] and
//!    pumps the overflow queue with [`WorkerPool::process_queued_tasks`]
//!
//! ## Failure Containment
//! A panic inside a task is caught on the worker, logged, and replaced by
//! the task's declared panic outcome. The worker thread itself survives, so
//! one poisoned chunk cannot drain the pool.

use log::{error, info};
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

pub mod task;

pub use task::PoolTask;

/// Maximum number of tasks in flight per worker channel.
///
/// One keeps scheduling simple and fair: a long generation job on one worker
/// never has a second job invisibly queued behind it while another worker
/// sits idle.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

/// A communication channel between the pool and one worker thread.
struct WorkerChannel<O> {
    task_sender: Sender<Box<dyn PoolTask<O> + Send>>,
    outcome_receiver: Receiver<O>,
    num_tasks_in_flight: usize,
    _worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
pub struct WorkerPool<O: Send + 'static> {
    channels: Vec<WorkerChannel<O>>,
    queued_tasks: VecDeque<Box<dyn PoolTask<O> + Send>>,
    current_channel: usize,
}

impl<O: Send + 'static> WorkerPool<O> {
    /// Creates a pool with the given number of worker threads.
    pub fn new(num_workers: usize) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        for worker_index in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn PoolTask<O> + Send>>();
            let (outcome_tx, outcome_rx) = channel::<O>();

            let worker = thread::spawn(move || {
                while let Ok(task) = task_rx.recv() {
                    let fallback = task.on_panic();
                    let outcome = match catch_unwind(AssertUnwindSafe(|| task.run())) {
                        Ok(outcome) => outcome,
                        Err(_) => {
                            error!("worker {worker_index}: task panicked, reporting failure");
                            fallback
                        }
                    };
                    if outcome_tx.send(outcome).is_err() {
                        break;
                    }
                }
            });

            channels.push(WorkerChannel {
                task_sender: task_tx,
                outcome_receiver: outcome_rx,
                num_tasks_in_flight: 0,
                _worker: worker,
            });
        }

        WorkerPool {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Attempts to send a task to a specific worker channel, returning the
    /// task on failure so it can be requeued.
    fn try_send_task(
        &mut self,
        task: Box<dyn PoolTask<O> + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn PoolTask<O> + Send>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(_) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(send_error) => Err(send_error.0),
        }
    }

    /// Finds an available worker channel round-robin from the last used one.
    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }
        if self
            .channels
            .iter()
            .all(|channel| channel.num_tasks_in_flight >= MAX_TASKS_IN_FLIGHT)
        {
            return None;
        }

        let start_channel = self.current_channel;
        let mut current = start_channel;
        loop {
            if self.channels[current].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT {
                return Some(current);
            }
            current = (current + 1) % self.channels.len();
            if current == start_channel {
                info!("all channels are full, but missed the first check");
                return None;
            }
        }
    }

    /// Publishes a task for execution.
    ///
    /// Returns `true` if it was handed to a worker immediately, `false` if
    /// it was queued because every worker is busy.
    pub fn publish_task(&mut self, task: Box<dyn PoolTask<O> + Send>) -> bool {
        if self.channels.is_empty() {
            self.queued_tasks.push_back(task);
            return false;
        }

        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Moves queued tasks onto workers as they become available. Call once
    /// per update tick.
    pub fn process_queued_tasks(&mut self) {
        if self.queued_tasks.is_empty() {
            return;
        }

        match self.find_available_channel() {
            None => {}
            Some(mut channel_idx) => {
                while let Some(task) = self.queued_tasks.pop_front() {
                    match self.try_send_task(task, channel_idx) {
                        Ok(_) => match self.find_available_channel() {
                            Some(next_idx) => channel_idx = next_idx,
                            None => break,
                        },
                        Err(task) => {
                            // Channel disconnected; put the task back and stop.
                            self.queued_tasks.push_front(task);
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Drains every completed outcome, in per-worker arrival order.
    pub fn drain_completed(&mut self) -> Vec<O> {
        let mut outcomes = Vec::new();
        for channel in &mut self.channels {
            while let Ok(outcome) = channel.outcome_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Number of tasks currently on workers or waiting in the queue.
    pub fn pending_tasks(&self) -> usize {
        self.queued_tasks.len()
            + self
                .channels
                .iter()
                .map(|c| c.num_tasks_in_flight)
                .sum::<usize>()
    }
}
