use tracing::debug;

use crate::lrc::{LyricEntry, LyricTrack};
use crate::tracker::locate;

/// Receiver for the line that should currently be on screen.
pub trait LineSink {
    fn show_line(&mut self, entry: &LyricEntry);
}

impl<F: FnMut(&LyricEntry)> LineSink for F {
    fn show_line(&mut self, entry: &LyricEntry) {
        self(entry);
    }
}

/// Tracks which line of a single track is displayed as playback time moves.
///
/// Each controller owns its track and cursor, so several can run side by
/// side, e.g. one per lyric language of the same song.
#[derive(Debug, Clone, Default)]
pub struct LyricController {
    track: LyricTrack,
    current_index: Option<usize>,
}

impl LyricController {
    #[must_use]
    pub const fn new(track: LyricTrack) -> Self {
        Self {
            track,
            current_index: None,
        }
    }

    /// Handles a clock update. Returns the newly active entry when the
    /// displayed line changes, and `None` when it stays the same.
    pub fn update(&mut self, time: f64) -> Option<&LyricEntry> {
        let index = locate(self.track.entries(), time, self.current_index)?;
        if self.current_index == Some(index) {
            return None;
        }
        debug!(index, time, "lyric line changed");
        self.current_index = Some(index);
        self.track.get(index)
    }

    /// Locates the line for `time` and returns it even if it is already the
    /// displayed one. Meant for metadata-loaded and track-start events, so
    /// the display is filled before the first regular clock update.
    pub fn prime(&mut self, time: f64) -> Option<&LyricEntry> {
        self.current_index = locate(self.track.entries(), time, self.current_index);
        self.current_index.and_then(|index| self.track.get(index))
    }

    /// [`update`](Self::update), forwarding a changed line to `sink`.
    /// Returns whether anything was shown.
    pub fn sync(&mut self, time: f64, sink: &mut impl LineSink) -> bool {
        match self.update(time) {
            Some(entry) => {
                sink.show_line(entry);
                true
            }
            None => false,
        }
    }

    /// [`prime`](Self::prime), forwarding the located line to `sink`.
    pub fn prime_into(&mut self, time: f64, sink: &mut impl LineSink) -> bool {
        match self.prime(time) {
            Some(entry) => {
                sink.show_line(entry);
                true
            }
            None => false,
        }
    }

    /// Swaps in another track and forgets the cursor, which may not be valid
    /// for the new track.
    pub fn replace_track(&mut self, track: LyricTrack) {
        self.track = track;
        self.current_index = None;
    }

    pub fn reset(&mut self) {
        self.current_index = None;
    }

    #[must_use]
    pub const fn track(&self) -> &LyricTrack {
        &self.track
    }

    #[must_use]
    pub const fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    #[must_use]
    pub fn current_entry(&self) -> Option<&LyricEntry> {
        self.current_index.and_then(|index| self.track.get(index))
    }
}

#[cfg(test)]
mod test {
    use eyre::Result;

    use super::*;

    fn abc() -> LyricController {
        LyricController::new(LyricTrack::from_entries(vec![
            LyricEntry::new(0.0, "a"),
            LyricEntry::new(10.0, "b"),
            LyricEntry::new(20.0, "c"),
        ]))
    }

    #[test]
    fn emits_only_when_line_changes() {
        let mut controller = abc();
        let mut shown = vec![];
        let mut sink = |entry: &LyricEntry| shown.push(entry.text().to_owned());
        for time in [0.0, 5.0, 9.999, 10.0, 15.0, 25.0] {
            controller.sync(time, &mut sink);
        }
        assert_eq!(shown, vec!["a", "b", "c"]);
    }

    #[test]
    fn unchanged_index_does_not_reemit() {
        let mut controller = abc();
        assert!(controller.update(10.0).is_some());
        assert_eq!(controller.current_index(), Some(1));
        assert!(controller.update(11.0).is_none());
        assert_eq!(controller.current_index(), Some(1));
    }

    #[test]
    fn seek_back_emits_earlier_line() {
        let mut controller = abc();
        controller.update(25.0);
        let entry = controller.update(3.0).map(|e| e.text().to_owned());
        assert_eq!(entry.as_deref(), Some("a"));
        assert_eq!(controller.current_index(), Some(0));
    }

    #[test]
    fn prime_always_returns_the_active_line() {
        let mut controller = abc();
        assert_eq!(controller.prime(0.0).map(LyricEntry::text), Some("a"));
        // already displayed, but a fresh media load still needs it drawn
        assert_eq!(controller.prime(0.0).map(LyricEntry::text), Some("a"));
        assert!(controller.update(0.5).is_none());
    }

    #[test]
    fn prime_into_forwards_to_sink() {
        let mut controller = abc();
        let mut shown = vec![];
        let mut sink = |entry: &LyricEntry| shown.push(entry.time());
        assert!(controller.prime_into(12.0, &mut sink));
        assert!(!controller.sync(13.0, &mut sink));
        assert_eq!(shown, vec![10.0]);
    }

    #[test]
    fn empty_track_never_emits() -> Result<()> {
        let mut controller = LyricController::new(LyricTrack::new("no timestamps here")?);
        assert!(controller.prime(0.0).is_none());
        assert!(controller.update(3.0).is_none());
        assert_eq!(controller.current_index(), None);
        assert!(controller.current_entry().is_none());
        Ok(())
    }

    #[test]
    fn replacing_track_resets_cursor() -> Result<()> {
        let mut controller = abc();
        controller.update(25.0);
        controller.replace_track(LyricTrack::new("[00:30.000]only")?);
        assert_eq!(controller.current_index(), None);
        assert_eq!(controller.update(1.0).map(LyricEntry::text), Some("only"));
        Ok(())
    }

    #[test]
    fn reset_makes_next_update_emit_again() {
        let mut controller = abc();
        controller.update(15.0);
        controller.reset();
        assert_eq!(controller.update(15.0).map(LyricEntry::text), Some("b"));
        assert_eq!(controller.current_entry().map(LyricEntry::text), Some("b"));
    }

    #[test]
    fn controllers_are_independent() -> Result<()> {
        let mut original = LyricController::new(LyricTrack::new("[00:00.000]hello\n[00:05.000]world")?);
        let mut translated = LyricController::new(LyricTrack::new("[00:00.000]안녕\n[00:06.000]세상")?);
        original.update(5.5);
        translated.update(5.5);
        assert_eq!(original.current_entry().map(LyricEntry::text), Some("world"));
        assert_eq!(translated.current_entry().map(LyricEntry::text), Some("안녕"));
        Ok(())
    }
}
