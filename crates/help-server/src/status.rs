//! Every `HELP_STATUS:`-prefixed and `[1c-help] `-prefixed write goes
//! through this module, so the status-line grammar (spec §6.2) can't
//! drift between call sites.

/// Emit `HELP_STATUS:unavailable[:reason]`.
pub fn unavailable(reason: Option<&str>) {
    match reason {
        Some(reason) => eprintln!("HELP_STATUS:unavailable:{reason}"),
        None => eprintln!("HELP_STATUS:unavailable"),
    }
}

/// Emit `HELP_STATUS:indexing:<percent>:<total>:<message>`.
pub fn indexing(percent: u8, total: u64, message: &str) {
    eprintln!("HELP_STATUS:indexing:{percent}:{total}:{message}");
}

/// Emit `HELP_STATUS:ready:<version>:<count>`.
pub fn ready(version: &str, count: u64) {
    eprintln!("HELP_STATUS:ready:{version}:{count}");
}

/// Emit a plain diagnostic line, prefixed `[1c-help] `.
pub fn log(message: &str) {
    eprintln!("[1c-help] {message}");
}
