//! Clock formatting helpers shared by the hosts and the `.lrc` writer.

fn whole_millis(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        // saturating float -> int cast, so absurdly large clocks stay finite
        (seconds * 1000.0).round() as u64
    } else {
        0
    }
}

/// Formats a playback position as `MM:SS`, truncating the fractional part.
///
/// Negative and non-finite positions are shown as `00:00`. Minutes are not
/// wrapped into hours, so a 2 hour position prints as `120:00`.
///
/// # Examples
///
/// ```
/// use lyric_sync_lib::time::format_time;
///
/// assert_eq!(format_time(75.9), "01:15");
/// assert_eq!(format_time(-3.0), "00:00");
/// ```
#[must_use]
pub fn format_time(seconds: f64) -> String {
    let total = whole_millis(seconds.floor()) / 1000;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Formats a playback position as an `.lrc` timestamp body, `MM:SS.mmm`,
/// rounded to the nearest millisecond.
#[must_use]
pub fn format_timestamp(seconds: f64) -> String {
    let millis = whole_millis(seconds);
    format!(
        "{:02}:{:02}.{:03}",
        millis / 60_000,
        (millis / 1000) % 60,
        millis % 1000
    )
}
