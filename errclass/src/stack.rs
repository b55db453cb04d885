//! Captured call stacks as error values
//!
//! A [`Stack`] is an ordinary error that is always collapsible: joined next
//! to a message it only shows up in verbose (`{:#}`) rendering.
//!
//! Capture follows `std::backtrace::Backtrace::capture`, so it is controlled
//! by the `RUST_LIB_BACKTRACE` / `RUST_BACKTRACE` environment variables.
//! When capture is disabled the stack still exists and renders as
//! `stack trace: disabled`.

use crate::chain::SharedError;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// A snapshot of the call stack
#[derive(Debug)]
pub struct Stack {
    backtrace: Backtrace,
    skip: usize,
}

impl Stack {
    /// Capture the current stack, leaving out `skip` frames above the caller.
    ///
    /// Never fails.
    #[inline(never)]
    pub fn capture(skip: usize) -> Self {
        Stack {
            backtrace: Backtrace::capture(),
            skip,
        }
    }

    pub fn status(&self) -> BacktraceStatus {
        self.backtrace.status()
    }

    /// The rendered frames, innermost first, without capture internals
    pub fn frames(&self) -> Vec<String> {
        if self.status() != BacktraceStatus::Captured {
            return Vec::new();
        }

        let rendered = self.backtrace.to_string();
        let mut frames: Vec<String> = Vec::new();
        for line in rendered.lines() {
            if line.trim_start().starts_with("note:") {
                continue;
            }
            if is_frame_header(line) {
                frames.push(line.to_string());
            } else if let Some(last) = frames.last_mut() {
                last.push('\n');
                last.push_str(line);
            }
        }

        let internal = frames.iter().take_while(|f| is_internal(f)).count();
        frames.into_iter().skip(internal + self.skip).collect()
    }
}

/// Capture the stack of the caller as a shared error.
///
/// `skip` drops that many frames on top of the caller's own, so a helper
/// that captures on behalf of its caller passes `1`.
#[inline(never)]
pub fn capture(skip: usize) -> SharedError {
    Arc::new(Stack::capture(skip))
}

fn is_frame_header(line: &str) -> bool {
    match line.trim_start().split_once(": ") {
        Some((index, _)) => !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

fn is_internal(frame: &str) -> bool {
    let symbol = frame
        .lines()
        .next()
        .and_then(|line| line.split_once(": "))
        .map(|(_, symbol)| symbol.trim())
        .unwrap_or_default();
    symbol.starts_with("std::backtrace") || symbol.starts_with("errclass::stack::")
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status() {
            BacktraceStatus::Captured => {}
            BacktraceStatus::Disabled => return write!(f, "stack trace: disabled"),
            _ => return write!(f, "stack trace: unsupported"),
        }

        if !f.alternate() {
            return write!(f, "stack trace");
        }

        write!(f, "stack trace:")?;
        for frame in self.frames() {
            write!(f, "\n{}", frame)?;
        }
        Ok(())
    }
}

impl StdError for Stack {}
