//! Pretty terminal output with colors and badges.

use std::time::Duration;

use colored::Colorize;

use crate::config::describe;
use crate::payload::PingPayload;
use crate::shutdown::Stop;

// A closed or broken stdout must not panic the loop, so write errors are
// dropped instead of going through `println!`.
macro_rules! out {
    () => {
        out!("")
    };
    ($($arg:tt)*) => {{
        use std::io::Write;
        let _ = writeln!(std::io::stdout(), $($arg)*);
    }};
}

// === Startup ===

pub fn print_banner(url: &str, interval: Duration) {
    out!();
    out!("{} {}", "🚀".bold(), "Starting keep-alive".white().bold());
    out!("  {} {}", "target:".dimmed(), url.cyan().underline());
    out!(
        "  {} {}",
        "every:".dimmed(),
        format!("💓 ping every {}", describe(interval)).white()
    );
    out!("{}", "-".repeat(50).dimmed());
}

// === Badges ===

fn badge(text: &str, fg: colored::Color, bg: colored::Color) -> colored::ColoredString {
    format!(" {} ", text).color(fg).on_color(bg).bold()
}

// === Cycle ===

pub fn log_cycle_start(timestamp: &str, cycle: u64) {
    out!();
    out!(
        "{} {} {}",
        format!("[{}]", timestamp).dimmed(),
        "keep-alive running".white(),
        format!("#{}", cycle).dimmed()
    );
}

pub fn log_ping_attempt(url: &str) {
    out!(
        "{} {}",
        badge("PING", colored::Color::Black, colored::Color::Cyan),
        url.cyan()
    );
}

pub fn log_ping_ok(payload: &PingPayload) {
    out!(
        "{} {} {}",
        badge("OK", colored::Color::Black, colored::Color::Green),
        payload.label.white(),
        "✓".green().bold()
    );
    out!(
        "  {} {}",
        "uptime:".dimmed(),
        format!("{} seconds", payload.uptime_secs).green()
    );
    if let Some(bot) = &payload.bot {
        out!("  {} {}", "bot:".dimmed(), bot.white());
    }
    if let Some(ts) = &payload.timestamp {
        out!("  {} {}", "server time:".dimmed(), ts.dimmed());
    }
}

pub fn log_http_status(code: u16) {
    out!(
        "{} {}",
        badge("HTTP", colored::Color::Black, colored::Color::Yellow),
        format!("status {}", code).yellow()
    );
}

pub fn log_ping_error(detail: &str) {
    out!(
        "{} {} {}",
        badge("ERROR", colored::Color::White, colored::Color::Red),
        "ping failed:".dimmed(),
        detail.red()
    );
}

pub fn log_kept_alive() {
    out!("{} {}", "✓".green().bold(), "target kept alive".green());
}

pub fn log_failed_continuing() {
    out!("{} {}", "⚠".yellow().bold(), "ping failed, continuing".yellow());
}

pub fn log_sleeping(d: Duration) {
    out!("{} {}", "😴".dimmed(), format!("sleeping {}", describe(d)).dimmed());
}

// === Failures and shutdown ===

pub fn log_unexpected(detail: &str) {
    out!(
        "{} {}",
        badge("UNEXPECTED", colored::Color::White, colored::Color::Red),
        detail.red()
    );
}

pub fn log_backoff(d: Duration) {
    out!(
        "{} {}",
        "🔄".dimmed(),
        format!("retrying in {}", describe(d)).yellow()
    );
}

fn stop_message(stop: Stop) -> &'static str {
    match stop {
        Stop::Interrupt => "keep-alive stopped by user",
        Stop::Terminate => "keep-alive stopped by SIGTERM",
    }
}

pub fn log_stopped(stop: Stop) {
    out!();
    out!(
        "{} {}",
        badge("STOP", colored::Color::White, colored::Color::Red),
        stop_message(stop).white().bold()
    );
}
