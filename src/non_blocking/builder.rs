// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::SendTimeoutError;
use crossbeam_channel::Sender;
use crossbeam_channel::bounded;
use crossbeam_channel::unbounded;

use super::Task;
use super::worker::Worker;
use crate::Error;
use crate::ErrorKind;
use crate::Options;
use crate::Request;
use crate::Trap;
use crate::Writer;

/// A guard that drains queued entries associated with a [`NonBlocking`] handle on drop.
///
/// Logging through a [`NonBlocking`] handle does **not** write the entry before returning.
/// Instead, the entry is written by a dedicated logging thread at some later point. If the
/// program terminates abruptly (such as through an uncaught `panic` or a `std::process::exit`),
/// queued entries may be lost.
///
/// `WorkerGuard` should be assigned in the `main` function or whatever the entrypoint of the
/// program is, so that it is dropped during an unwinding or when `main` exits successfully.
/// Dropping it waits up to the shutdown timeout for the worker to finish.
#[derive(Debug)]
pub struct WorkerGuard {
    _guard: Option<JoinHandle<()>>,
    sender: Sender<Task>,
    shutdown: Sender<()>,
    shutdown_timeout: Duration,
    trap: Arc<dyn Trap>,
}

impl WorkerGuard {
    fn new(
        handle: JoinHandle<()>,
        sender: Sender<Task>,
        shutdown: Sender<()>,
        shutdown_timeout: Option<Duration>,
        trap: Arc<dyn Trap>,
    ) -> Self {
        const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(100);

        WorkerGuard {
            _guard: Some(handle),
            sender,
            shutdown,
            shutdown_timeout: shutdown_timeout.unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT),
            trap,
        }
    }
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        let shutdown_timeout = self.shutdown_timeout;
        match self.sender.send_timeout(Task::Shutdown, shutdown_timeout) {
            Ok(()) => {
                // Wait for the worker to write every queued entry. This happens when the worker
                // calls `recv()` on a zero-capacity channel. Use `send_timeout` so that drop is
                // not blocked indefinitely.
                let _ = self.shutdown.send_timeout((), shutdown_timeout);
            }
            Err(SendTimeoutError::Disconnected(_)) => (),
            Err(SendTimeoutError::Timeout(_)) => {
                let message = "failed to send shutdown signal to logging worker";
                let err = Error::new(ErrorKind::Worker, message)
                    .with_context("timeout", format!("{shutdown_timeout:?}"));
                self.trap.trap(&err);
            }
        }
    }
}

/// A handle queuing log calls for a worker thread.
#[derive(Clone, Debug)]
pub struct NonBlocking {
    sender: Sender<Task>,
    trap: Arc<dyn Trap>,
}

impl NonBlocking {
    fn create(
        writer: Writer,
        thread_name: String,
        buffered_lines_limit: Option<usize>,
        shutdown_timeout: Option<Duration>,
    ) -> Result<(Self, WorkerGuard), Error> {
        let (sender, receiver) = match buffered_lines_limit {
            Some(cap) => bounded(cap),
            None => unbounded(),
        };

        let (shutdown_sender, shutdown_receiver) = bounded(0);

        let trap = writer.trap();
        let worker = Worker::new(writer, receiver, shutdown_receiver);
        let handle = worker.make_thread(thread_name)?;
        let worker_guard = WorkerGuard::new(
            handle,
            sender.clone(),
            shutdown_sender,
            shutdown_timeout,
            trap.clone(),
        );

        Ok((Self { sender, trap }, worker_guard))
    }

    /// Queue one log call and return immediately.
    ///
    /// `defaults` is captured now; the entry is located, formatted and appended later on the
    /// worker thread. Errors, including a stopped worker, go to the writer's trap.
    pub fn log(&self, defaults: &Options, request: Request) {
        let task = Task::Write {
            defaults: defaults.clone(),
            request,
        };
        if let Err(err) = self.send(task) {
            self.trap.trap(&err);
        }
    }

    /// Block until every call queued before this one has been written.
    ///
    /// # Errors
    ///
    /// Return an error if the worker has stopped.
    pub fn flush(&self) -> Result<(), Error> {
        let (done, wait) = bounded(1);
        self.send(Task::Flush(done))?;
        wait.recv().map_err(|_| {
            Error::new(ErrorKind::Worker, "logging worker stopped before flushing")
        })
    }

    fn send(&self, task: Task) -> Result<(), Error> {
        self.sender.send(task).map_err(|_| {
            let message = "failed to send log entry to a stopped logging worker";
            Error::new(ErrorKind::Worker, message)
        })
    }
}

/// A builder for configuring [`NonBlocking`].
#[derive(Debug)]
pub struct NonBlockingBuilder {
    thread_name: String,
    buffered_lines_limit: Option<usize>,
    shutdown_timeout: Option<Duration>,
    writer: Writer,
}

impl NonBlockingBuilder {
    /// Creates a new [`NonBlockingBuilder`] whose worker thread owns `writer`.
    pub fn new(thread_name: impl Into<String>, writer: Writer) -> Self {
        Self {
            thread_name: thread_name.into(),
            buffered_lines_limit: None,
            shutdown_timeout: None,
            writer,
        }
    }

    /// Sets the number of queued calls before [`NonBlocking::log`] blocks the caller.
    ///
    /// Default to unbounded.
    pub fn buffered_lines_limit(mut self, buffered_lines_limit: Option<usize>) -> Self {
        self.buffered_lines_limit = buffered_lines_limit;
        self
    }

    /// Sets the shutdown timeout used when the worker guard is dropped.
    ///
    /// Default to 100 milliseconds.
    pub fn shutdown_timeout(mut self, shutdown_timeout: Option<Duration>) -> Self {
        self.shutdown_timeout = shutdown_timeout;
        self
    }

    /// Completes the builder, spawning the worker thread.
    ///
    /// # Errors
    ///
    /// Return an error if the worker thread cannot be spawned.
    pub fn build(self) -> Result<(NonBlocking, WorkerGuard), Error> {
        NonBlocking::create(
            self.writer,
            self.thread_name,
            self.buffered_lines_limit,
            self.shutdown_timeout,
        )
    }
}
