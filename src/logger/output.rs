//! Output sinks for encoded entries

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

thread_local! {
    /// Outputs whose writer is running on this thread
    static HELD: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Marks an output as held by the current thread until dropped
struct Held(usize);

impl Held {
    fn acquire(id: usize) -> Option<Self> {
        HELD.with(|held| {
            let mut held = held.borrow_mut();
            if held.contains(&id) {
                return None;
            }
            held.push(id);
            Some(Held(id))
        })
    }
}

impl Drop for Held {
    fn drop(&mut self) {
        HELD.with(|held| held.borrow_mut().retain(|&id| id != self.0));
    }
}

/// A shared byte sink.
///
/// Each encoded entry is written under the lock in a single `write_all`, so
/// concurrent entries never interleave. Cloning shares the same writer.
///
/// A writer that logs back into its own output (directly, or through a
/// redirected `tracing` or `log` event) gets an [`io::ErrorKind::WouldBlock`]
/// error for the nested write instead of deadlocking.
#[derive(Clone)]
pub struct Output {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Output {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        self.with_writer(|writer| writer.write_all(buf))
    }

    /// Flush whatever buffering the writer does
    pub fn sync(&self) -> io::Result<()> {
        self.with_writer(|writer| writer.flush())
    }

    fn with_writer<R>(
        &self,
        f: impl FnOnce(&mut (dyn Write + Send)) -> io::Result<R>,
    ) -> io::Result<R> {
        let _held = Held::acquire(self.id()).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::WouldBlock,
                "log: output written to from inside its own writer",
            )
        })?;
        // A panic elsewhere while holding the lock leaves the writer usable.
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut **writer)
    }

    fn id(&self) -> usize {
        Arc::as_ptr(&self.writer) as usize
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output").finish_non_exhaustive()
    }
}
