use std::time::Duration;

use colored::*;

pub const TOTAL_WIDTH: usize = 64;

pub fn banner() {
    let text = format!("⟦ MACSEEK v{} ⟧", env!("CARGO_PKG_VERSION"));
    let width = text.chars().count();
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH.saturating_sub(width) / 2).bright_black();
    eprintln!("{sep}{}{sep}", text.bright_green().bold());
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    eprintln!("{line}");
}

pub fn fat_separator() {
    eprintln!("{}", "═".repeat(TOTAL_WIDTH).bright_black());
}

pub fn summary(devices: usize, elapsed: Duration) {
    let devices: ColoredString = format!("{devices} devices").bold().green();
    let elapsed: ColoredString = format!("{:.2}s", elapsed.as_secs_f64()).bold().yellow();
    fat_separator();
    eprintln!("Lookup complete: {devices} listed in {elapsed}");
}

pub fn no_results() {
    eprintln!("{}", "no devices found".red().bold());
}
