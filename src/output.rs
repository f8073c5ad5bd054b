// Line-oriented output shared between the console session and its listeners
// so that prompts, provider text and notifications land in one ordered stream

use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

enum Sink {
    Stdout(io::Stdout),
    Buffer(Vec<u8>),
}

#[derive(Clone)]
pub struct SharedWriter {
    inner: Arc<Mutex<Sink>>,
}

impl SharedWriter {
    pub fn stdout() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Sink::Stdout(io::stdout()))),
        }
    }

    // In-memory sink, read back with `contents`
    pub fn buffer() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Sink::Buffer(Vec::new()))),
        }
    }

    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut sink = self.inner.lock();
        match &mut *sink {
            Sink::Stdout(out) => {
                let mut out = out.lock();
                writeln!(out, "{}", line)?;
                out.flush()
            }
            Sink::Buffer(buf) => writeln!(buf, "{}", line),
        }
    }

    // Text written so far. Always empty for stdout.
    pub fn contents(&self) -> String {
        match &*self.inner.lock() {
            Sink::Stdout(_) => String::new(),
            Sink::Buffer(buf) => String::from_utf8_lossy(buf).into_owned(),
        }
    }
}

impl Write for SharedWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        match &mut *self.inner.lock() {
            Sink::Stdout(out) => out.write(data),
            Sink::Buffer(buf) => buf.write(data),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.inner.lock() {
            Sink::Stdout(out) => out.flush(),
            Sink::Buffer(_) => Ok(()),
        }
    }
}
