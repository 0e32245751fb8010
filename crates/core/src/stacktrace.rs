//! Stacktrace capture
//!
//! Formats the calling thread's backtrace into a caller-supplied buffer.
//! Capture is forced, so it works regardless of `RUST_BACKTRACE`.

use std::backtrace::Backtrace;
use std::fmt::Write;
use std::thread;
use tracing::debug;

/// Append the current thread's stacktrace to `buf`
///
/// The output starts with a `thread '<name>':` header followed by one
/// numbered entry per frame. There is no portable way to walk other
/// threads' stacks, so `include_all_threads` still captures only the
/// calling thread.
pub fn take(buf: &mut String, include_all_threads: bool) {
    if include_all_threads {
        debug!("all-thread stacktraces unavailable, capturing current thread only");
    }
    let current = thread::current();
    let name = current.name().unwrap_or("<unnamed>");
    let trace = Backtrace::force_capture();
    // Writing into a String cannot fail.
    let _ = write!(buf, "thread '{}':\n{}", name, trace);
    while buf.ends_with('\n') {
        buf.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_has_header_and_frames() {
        let mut buf = String::new();
        take(&mut buf, false);
        assert!(buf.starts_with("thread '"));
        assert!(buf.contains("0: "), "expected numbered frames: {}", buf);
    }

    #[test]
    fn test_take_appends() {
        let mut buf = String::from("prefix ");
        take(&mut buf, true);
        assert!(buf.starts_with("prefix thread '"));
        assert!(!buf.ends_with('\n'));
    }

    #[test]
    fn test_take_names_thread() {
        let out = thread::Builder::new()
            .name("capture-worker".to_string())
            .spawn(|| {
                let mut buf = String::new();
                take(&mut buf, false);
                buf
            })
            .unwrap()
            .join()
            .unwrap();
        assert!(out.starts_with("thread 'capture-worker':"));
    }
}
