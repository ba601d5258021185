//! Output operations - `puts_int` / `puts_str`
//!
//! Design: Every print goes through an `Output` sink. The default sink is
//! stdout; a thread can swap in a buffer to capture what it prints.

use crate::error::Result;
use crate::logging::{log_builtin_call, trace};
use crate::object::{LegacyText, Payload};
use core::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Output target abstraction
pub trait Output {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;
}

/// Process stdout
pub struct Stdout;

impl Output for Stdout {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(bytes)?;
        out.flush()
    }
}

impl Output for Vec<u8> {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// Buffer shared between the capturing caller and the installed sink
#[derive(Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Output for SharedBuffer {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.0.borrow_mut().extend_from_slice(bytes);
        Ok(())
    }
}

thread_local! {
    /// Per-thread sink override; `None` means stdout
    static OUTPUT: RefCell<Option<Box<dyn Output>>> = const { RefCell::new(None) };
}

/// Write through the calling thread's sink
fn write_current(bytes: &[u8]) -> io::Result<()> {
    OUTPUT.with(|slot| match slot.borrow_mut().as_mut() {
        Some(out) => out.write_bytes(bytes),
        None => Stdout.write_bytes(bytes),
    })
}

/// Puts the previous sink back when dropped, including during unwinding
struct RestoreSink(Option<Box<dyn Output>>);

impl Drop for RestoreSink {
    fn drop(&mut self) {
        let previous = self.0.take();
        OUTPUT.with(|slot| *slot.borrow_mut() = previous);
    }
}

/// Run `f` with this thread's output captured, returning what it printed
pub fn capture_output<R>(f: impl FnOnce() -> R) -> (R, Vec<u8>) {
    let buffer = SharedBuffer::default();
    let previous = OUTPUT.with(|slot| slot.replace(Some(Box::new(buffer.clone()))));
    let restore = RestoreSink(previous);

    let result = f();

    drop(restore);
    let bytes = buffer.0.take();
    (result, bytes)
}

/// Print integer and newline, returning the bytes written
#[inline]
pub fn print_int(val: i32) -> Result<i32> {
    print_int_to_sink(val, write_current)
}

/// Print integer to a specific sink
pub fn print_int_to(out: &mut dyn Output, val: i32) -> Result<i32> {
    print_int_to_sink(val, |bytes| out.write_bytes(bytes))
}

fn print_int_to_sink<W>(val: i32, write: W) -> Result<i32>
where
    W: FnOnce(&[u8]) -> io::Result<()>,
{
    log_builtin_call("puts_int");
    let line = format!("{}\n", val);
    write(line.as_bytes())?;
    Ok(line.len() as i32)
}

/// Print a text payload and newline, returning the bytes written
pub fn print_text(payload: &Payload) -> Result<i32> {
    let bytes = payload.text_view()?;
    print_line(bytes, write_current)
}

pub fn print_text_to(out: &mut dyn Output, payload: &Payload) -> Result<i32> {
    let bytes = payload.text_view()?;
    print_line(bytes, |b| out.write_bytes(b))
}

/// Print a legacy text object and newline
pub fn print_legacy_text(text: &LegacyText) -> Result<i32> {
    print_line(text.as_bytes(), write_current)
}

pub fn print_legacy_text_to(out: &mut dyn Output, text: &LegacyText) -> Result<i32> {
    print_line(text.as_bytes(), |b| out.write_bytes(b))
}

fn print_line<W>(bytes: &[u8], write: W) -> Result<i32>
where
    W: FnOnce(&[u8]) -> io::Result<()>,
{
    log_builtin_call("puts_str");

    let mut line = Vec::with_capacity(bytes.len() + 1);
    line.extend_from_slice(bytes);
    line.push(b'\n');
    write(&line)?;

    trace!(bytes_written = line.len(), "text printed");
    Ok(i32::try_from(line.len()).unwrap_or(i32::MAX))
}
