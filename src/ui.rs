use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use std::time::Duration;

/// Track quiet mode state
static QUIET_MODE: std::sync::LazyLock<Mutex<bool>> =
    std::sync::LazyLock::new(|| Mutex::new(false));

/// Track debug mode state
static DEBUG_MODE: std::sync::LazyLock<Mutex<bool>> =
    std::sync::LazyLock::new(|| Mutex::new(false));

/// Enable or disable debug mode
pub fn set_debug_mode(enabled: bool) {
    let mut debug_mode = DEBUG_MODE.lock();
    *debug_mode = enabled;
}

/// Check if debug mode is enabled
pub fn is_debug_mode() -> bool {
    *DEBUG_MODE.lock()
}

/// Enable or disable quiet mode
pub fn set_quiet_mode(enabled: bool) {
    let mut quiet_mode = QUIET_MODE.lock();
    *quiet_mode = enabled;
}

/// Check if quiet mode is enabled
pub fn is_quiet_mode() -> bool {
    *QUIET_MODE.lock()
}

pub fn create_spinner(message: &str) -> ProgressBar {
    if is_quiet_mode() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn print_version(version: &str) {
    if is_quiet_mode() {
        return;
    }
    println!("{} {}", "readmegen".magenta().bold(), version.cyan());
}

pub fn print_success(message: &str) {
    if is_quiet_mode() {
        return;
    }
    println!("{}", message.green().bold());
}

pub fn print_info(message: &str) {
    if is_quiet_mode() {
        return;
    }
    println!("{}", message.cyan());
}

pub fn print_error(message: &str) {
    eprintln!("{}", message.red().bold());
}
