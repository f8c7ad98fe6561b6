// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background task runner.
//!
//! Runs one long task (decode, crop, encode) at a time on a separate
//! thread while the UI keeps repainting. While a task is in flight the
//! worker is busy and refuses new tasks.

use std::sync::mpsc::{channel, Receiver, TryRecvError};

/// State of the worker after a poll.
#[derive(Debug)]
pub enum TaskStatus<T> {
    /// Nothing was running.
    Idle,
    /// The task is still running.
    Running,
    /// The task finished with this result.
    Done(T),
    /// The task thread went away without a result (it panicked).
    Lost,
}

/// One-task-at-a-time background runner.
pub struct Worker<T> {
    receiver: Option<Receiver<T>>,
    message: Option<String>,
}

impl<T> Default for Worker<T> {
    fn default() -> Self {
        Self {
            receiver: None,
            message: None,
        }
    }
}

impl<T: Send + 'static> Worker<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.receiver.is_some()
    }

    /// Progress message of the running task.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Start `task` in the background. Returns `false` without running it
    /// if another task is still in flight.
    pub fn spawn<F>(&mut self, message: impl Into<String>, task: F) -> bool
    where
        F: FnOnce() -> T + Send + 'static,
    {
        if self.is_busy() {
            log::warn!("Worker busy, refusing new task");
            return false;
        }

        let (sender, receiver) = channel();
        self.receiver = Some(receiver);
        self.message = Some(message.into());

        std::thread::spawn(move || {
            let _ = sender.send(task());
        });

        true
    }

    /// Check for a finished task without blocking.
    pub fn poll(&mut self) -> TaskStatus<T> {
        let Some(receiver) = self.receiver.as_ref() else {
            return TaskStatus::Idle;
        };

        let status = match receiver.try_recv() {
            Ok(result) => TaskStatus::Done(result),
            Err(TryRecvError::Empty) => return TaskStatus::Running,
            Err(TryRecvError::Disconnected) => {
                log::error!("Background task ended without a result");
                TaskStatus::Lost
            }
        };

        self.receiver = None;
        self.message = None;
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    fn wait<T: Send + 'static>(worker: &mut Worker<T>) -> TaskStatus<T> {
        for _ in 0..500 {
            match worker.poll() {
                TaskStatus::Running => std::thread::sleep(Duration::from_millis(10)),
                other => return other,
            }
        }
        panic!("task did not finish");
    }

    #[test]
    fn test_task_result_is_delivered() {
        let mut worker = Worker::new();
        assert!(matches!(worker.poll(), TaskStatus::Idle));

        assert!(worker.spawn("Adding...", || 40 + 2));
        assert!(worker.is_busy());
        assert_eq!(worker.message(), Some("Adding..."));

        assert!(matches!(wait(&mut worker), TaskStatus::Done(42)));
        assert!(!worker.is_busy());
        assert_eq!(worker.message(), None);
    }

    #[test]
    fn test_second_task_is_refused_while_busy() {
        let (release, gate) = mpsc::channel::<()>();
        let mut worker = Worker::new();

        assert!(worker.spawn("First", move || {
            gate.recv().ok();
            1
        }));
        assert!(!worker.spawn("Second", || 2));

        release.send(()).unwrap();
        assert!(matches!(wait(&mut worker), TaskStatus::Done(1)));
        assert!(worker.spawn("Third", || 3));
        assert!(matches!(wait(&mut worker), TaskStatus::Done(3)));
    }

    #[test]
    fn test_panicking_task_is_lost() {
        let mut worker: Worker<u32> = Worker::new();
        worker.spawn("Failing", || panic!("boom"));
        assert!(matches!(wait(&mut worker), TaskStatus::Lost));
        assert!(!worker.is_busy());
    }
}
