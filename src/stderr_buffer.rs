use std::sync::{Mutex, MutexGuard};

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

fn lock() -> MutexGuard<'static, Option<Vec<String>>> {
    BUFFER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Activate buffering. While active, `buffered_eprintln!` stores messages
/// instead of printing to stderr (the TUI owns the terminal).
pub fn activate() {
    *lock() = Some(Vec::new());
}

/// Deactivate buffering and return all collected messages.
pub fn drain() -> Vec<String> {
    lock().take().unwrap_or_default()
}

/// Deactivate buffering and print everything collected to stderr.
pub fn flush() {
    for msg in drain() {
        eprintln!("{}", msg);
    }
}

/// Write a diagnostic message. If buffering is active the message is stored;
/// otherwise it is printed to stderr immediately.
pub fn warn(msg: String) {
    let mut guard = lock();
    if let Some(buf) = guard.as_mut() {
        buf.push(msg);
    } else {
        drop(guard);
        eprintln!("{}", msg);
    }
}

/// Works like `eprintln!` but routes through the stderr buffer when it is active.
#[macro_export]
macro_rules! buffered_eprintln {
    ($($arg:tt)*) => {
        $crate::stderr_buffer::warn(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffering_collects_and_drains() {
        activate();
        crate::buffered_eprintln!("Fetch failed for {}: {}", "cars", "HTTP 500");
        warn("second".to_string());

        let messages = drain();
        assert!(messages.contains(&"Fetch failed for cars: HTTP 500".to_string()));
        assert!(messages.contains(&"second".to_string()));

        // Inactive again
        assert!(drain().is_empty());
    }
}
