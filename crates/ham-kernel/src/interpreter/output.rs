//! In-memory output stream.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// A cloneable byte sink.
///
/// Hand one clone to [`EvaluationContext::set_output`] and keep another to
/// read back what `Echo` and friends wrote.
///
/// [`EvaluationContext::set_output`]: super::EvaluationContext::set_output
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    bytes: Rc<RefCell<Vec<u8>>>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.borrow()).into_owned()
    }

    pub fn clear(&self) {
        self.bytes.borrow_mut().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.borrow().is_empty()
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
