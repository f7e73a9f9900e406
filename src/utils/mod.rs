/// Width of the `=` rules around printed and saved captions
pub const SEPARATOR_WIDTH: usize = 60;

/// A full-width `=` rule
pub fn separator() -> String {
    "=".repeat(SEPARATOR_WIDTH)
}

/// Parse a comma separated language list, e.g. `"en, pt-BR"`
pub fn parse_language_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether a yes/no answer means yes; only `y` counts, ignoring case and padding
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Format duration in human-readable format
pub fn format_duration(seconds: f64) -> String {
    if seconds < 1.0 {
        return format!("{}ms", (seconds * 1000.0).round() as u64);
    }

    let total_seconds = seconds as u64;
    let minutes = total_seconds / 60;
    let secs = total_seconds % 60;

    if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{:.1}s", seconds)
    }
}
