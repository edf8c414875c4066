//! Mapping a playback position onto the active lyric line.
//!
//! Lookups take two paths. When the clock has moved forward from the
//! previously active line, the index is advanced one entry at a time from
//! that hint, which costs O(1) amortised during normal playback. On the first
//! lookup, or after the clock jumped back before the hinted line, the index
//! is recomputed from scratch with a binary search. Both paths pick the
//! greatest index whose time is `<=` the query, so lines sharing a timestamp
//! resolve to the last one declared.

use tracing::trace;

use crate::TimestampedEvent;

/// Returns the index of the line active at `query_time`.
///
/// `previous` is the index returned by the last call for the same track and
/// only serves as a starting point; any value gives the same result.
/// Positions before the first line floor to index `0` so a line is shown as
/// soon as playback starts. Returns `None` only for an empty track.
///
/// # Examples
///
/// ```
/// use lyric_sync_lib::lrc::LyricEntry;
/// use lyric_sync_lib::tracker::locate;
///
/// let track = vec![
///     LyricEntry::new(0.0, "a"),
///     LyricEntry::new(10.0, "b"),
///     LyricEntry::new(20.0, "c"),
/// ];
/// assert_eq!(locate(&track, 15.0, None), Some(1));
/// assert_eq!(locate(&track, 25.0, Some(1)), Some(2));
/// assert_eq!(locate(&track, 3.0, Some(2)), Some(0));
/// ```
#[must_use]
pub fn locate<T: TimestampedEvent>(
    track: &[T],
    query_time: f64,
    previous: Option<usize>,
) -> Option<usize> {
    if track.is_empty() {
        return None;
    }
    match previous.filter(|&i| i < track.len()) {
        Some(hint) if query_time >= track[hint].get_timestamp() => {
            Some(advance_from(track, query_time, hint))
        }
        _ => Some(cold_scan(track, query_time)),
    }
}

fn advance_from<T: TimestampedEvent>(track: &[T], query_time: f64, hint: usize) -> usize {
    let mut index = hint;
    while track
        .get(index + 1)
        .map_or(false, |next| next.get_timestamp() <= query_time)
    {
        index += 1;
    }
    trace!(hint, index, query_time, "advanced from hint");
    index
}

fn cold_scan<T: TimestampedEvent>(track: &[T], query_time: f64) -> usize {
    let started = track.partition_point(|event| event.get_timestamp() <= query_time);
    let index = started.saturating_sub(1);
    trace!(index, query_time, "rescanned track");
    index
}
