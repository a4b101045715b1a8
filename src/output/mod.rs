use chrono::Local;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn step(num: usize, total: usize, msg: &str) {
    println!(
        "{} {}",
        style(format!("[{}/{}]", num, total)).bold().cyan(),
        msg
    );
}

pub fn success(msg: &str) {
    println!("{} {}", style("✓").bold().green(), msg);
}

pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").bold().red(), msg);
}

pub fn warning(msg: &str) {
    eprintln!("{} {}", style("!").bold().yellow(), msg);
}

pub fn info(msg: &str) {
    println!("{} {}", style("→").bold().blue(), msg);
}

pub fn header(msg: &str) {
    println!("\n{}", style(msg).bold().underlined());
}

/// Severity tag for the persistent run log.
#[derive(Debug, Clone, Copy)]
pub enum Severity {
    Status,
    Warning,
    Error,
}

impl Severity {
    fn as_str(self) -> &'static str {
        match self {
            Severity::Status => "status",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Append one structured line to `<log_dir>/deploy.log`.
///
/// Best-effort: a missing or unwritable log directory must never fail a
/// deploy, so IO errors are reported as terminal warnings and dropped.
pub fn append_run_log(log_dir: &Path, severity: Severity, msg: &str) {
    let line = format!(
        "{} [{}] {}\n",
        Local::now().format("%Y-%m-%dT%H:%M:%S"),
        severity.as_str(),
        msg
    );

    let result = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("deploy.log"))
        .and_then(|mut f| f.write_all(line.as_bytes()));

    if let Err(e) = result {
        warning(&format!("Could not write deploy log: {}", e));
    }
}
