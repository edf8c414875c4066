pub mod controller;
pub mod lrc;
pub mod time;
pub mod tracker;

pub use controller::{LineSink, LyricController};
pub use lrc::{LrcParser, LyricEntry, LyricTrack};
pub use tracker::locate;

pub trait TimestampedEvent {
    /// Position of the event on the playback clock, in seconds.
    fn get_timestamp(&self) -> f64;
}
