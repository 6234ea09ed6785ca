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

use std::thread::JoinHandle;

use crossbeam_channel::Receiver;
use crossbeam_channel::RecvError;

use super::Task;
use crate::Error;
use crate::ErrorKind;
use crate::Writer;

pub(super) struct Worker {
    writer: Writer,
    receiver: Receiver<Task>,
    shutdown: Receiver<()>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum WorkerState {
    Disconnected,
    Continue,
    Shutdown,
}

impl Worker {
    pub(super) fn new(writer: Writer, receiver: Receiver<Task>, shutdown: Receiver<()>) -> Worker {
        Self {
            writer,
            receiver,
            shutdown,
        }
    }

    fn work(&self) -> WorkerState {
        match self.receiver.recv() {
            Ok(Task::Write { defaults, request }) => {
                self.writer.write(&defaults, request);
                WorkerState::Continue
            }
            Ok(Task::Flush(done)) => {
                let _ = done.send(());
                WorkerState::Continue
            }
            Ok(Task::Shutdown) => WorkerState::Shutdown,
            Err(RecvError) => WorkerState::Disconnected,
        }
    }

    pub(super) fn make_thread(self, name: String) -> Result<JoinHandle<()>, Error> {
        std::thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                while self.work() == WorkerState::Continue {}
                let _ = self.shutdown.recv();
            })
            .map_err(|err| {
                Error::new(ErrorKind::Worker, "failed to spawn logging worker thread")
                    .with_context("thread", name)
                    .with_source(err)
            })
    }
}
