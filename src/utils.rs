/// Formats a byte count as MiB with two decimal places, the display
/// convention used everywhere a size is shown to the user.
pub fn format_size(bytes: u64) -> String {
    format!("{:.2} MiB", bytes as f64 / (1024.0 * 1024.0))
}
