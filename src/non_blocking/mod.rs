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

//! Fire-and-forget logging on a dedicated worker thread.
//!
//! [`NonBlocking::log`] queues the call and returns immediately. A worker thread owning a
//! [`Writer`](crate::Writer) locates, formats and appends the entries in the order they were
//! queued, so the blocking and non-blocking forms share one code path.
//!
//! # Example
//!
//! ```
//! use logscribe::Options;
//! use logscribe::Request;
//! use logscribe::Writer;
//! use logscribe::non_blocking::NonBlockingBuilder;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let defaults = Options::default()
//!     .with_dir_path(dir.path())
//!     .with_print_console(false);
//!
//! let (non_blocking, _guard) = NonBlockingBuilder::new("logscribe-worker", Writer::default())
//!     .build()
//!     .unwrap();
//!
//! non_blocking.log(&defaults, Request::new("queued"));
//! non_blocking.flush().unwrap();
//! ```

mod builder;
mod worker;

pub use self::builder::NonBlocking;
pub use self::builder::NonBlockingBuilder;
pub use self::builder::WorkerGuard;

use crossbeam_channel::Sender;

use crate::Options;
use crate::Request;

#[derive(Debug)]
enum Task {
    Write { defaults: Options, request: Request },
    Flush(Sender<()>),
    Shutdown,
}
