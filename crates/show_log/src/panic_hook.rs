//! Panic hook for crash reporting

use backtrace::Backtrace;
use chrono::Local;
use std::panic::PanicHookInfo;

/// Initialize the panic hook for crash reporting
pub fn init_panic_hook() {
    std::panic::set_hook(Box::new(panic_handler));
    tracing::debug!("Panic hook initialized");
}

fn panic_handler(info: &PanicHookInfo) {
    let backtrace = Backtrace::new();
    let thread = std::thread::current();
    let thread_name = thread.name().unwrap_or("<unnamed>");
    let report = crash_report(
        &Local::now().to_rfc3339(),
        thread_name,
        &format!("{:?}", info.location()),
        panic_payload(info),
        &format!("{:?}", backtrace),
    );

    eprintln!("{}", report);
    tracing::error!("{}", report);

    let dump_filename = format!(
        "imgshow_crash_{}.txt",
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let dump_path = std::env::temp_dir().join(&dump_filename);

    if let Err(e) = std::fs::write(&dump_path, &report) {
        eprintln!("Failed to write crash dump: {}", e);
    }
}

fn panic_payload<'a>(info: &'a PanicHookInfo) -> &'a str {
    let payload = info.payload();
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<unknown>"
    }
}

fn crash_report(
    timestamp: &str,
    thread_name: &str,
    location: &str,
    payload: &str,
    backtrace: &str,
) -> String {
    format!(
        "=== CRITICAL PANIC ===\n\
         Timestamp: {}\n\
         Thread: {}\n\
         Location: {}\n\
         Payload: {}\n\n\
         Stack Trace:\n{}",
        timestamp, thread_name, location, payload, backtrace
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crash_report_layout() {
        let report = crash_report("2026-01-01T00:00:00+00:00", "main", "src/main.rs:1:1", "boom", "<bt>");
        assert!(report.starts_with("=== CRITICAL PANIC ===\n"));
        assert!(report.contains("Thread: main\n"));
        assert!(report.contains("Payload: boom\n"));
        assert!(report.ends_with("Stack Trace:\n<bt>"));
    }
}
