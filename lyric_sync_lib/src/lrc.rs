use std::fmt::{Display, Formatter};
use std::ops::Index;
use std::str::FromStr;

use eyre::{eyre, Report, Result, WrapErr};
use regex::Regex;
use tracing::{debug, trace};

use crate::time::format_timestamp;
use crate::TimestampedEvent;

macro_rules! read_capture {
    ($captures:expr, $name:expr) => {
        $captures
            .name($name)
            .ok_or_else(|| eyre!("regex does not contain {}", $name))?
            .as_str()
    };
}

macro_rules! parse {
    ($str:expr) => {
        $str.trim().parse().wrap_err(format!("{:?}", $str))
    };
}

/// A single timed line of a lyrics file.
#[derive(Debug, Clone, PartialEq)]
pub struct LyricEntry {
    time: f64,
    text: String,
}

impl LyricEntry {
    /// Negative, negative zero and NaN times are clamped to the start of the track.
    #[must_use]
    pub fn new(time: f64, text: impl Into<String>) -> Self {
        Self {
            time: if time > 0.0 { time } else { 0.0 },
            text: text.into(),
        }
    }

    #[must_use]
    pub const fn time(&self) -> f64 {
        self.time
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl TimestampedEvent for LyricEntry {
    fn get_timestamp(&self) -> f64 {
        self.time
    }
}

impl Display for LyricEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]{}", format_timestamp(self.time), self.text)
    }
}

/// Lyric lines sorted by time. Lines sharing a timestamp keep their source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LyricTrack {
    entries: Vec<LyricEntry>,
}

impl LyricTrack {
    /// Parses the contents of an `.lrc` file.
    ///
    /// Lines that are not of the form `[MM:SS.mmm]text` are skipped, so this
    /// only fails if the line pattern itself cannot be compiled.
    ///
    /// # Arguments
    ///
    /// * `raw`: the lyrics text to parse.
    ///
    /// returns: `Result<LyricTrack, Report>`
    ///
    /// # Examples
    ///
    /// ```
    /// use lyric_sync_lib::lrc::LyricTrack;
    ///
    /// let track = LyricTrack::new("[00:13.440]second\n[00:09.702]first\nnot a lyric").unwrap();
    /// assert_eq!(track.len(), 2);
    /// assert_eq!(track[0].text(), "first");
    /// ```
    pub fn new(raw: &str) -> Result<Self> {
        Ok(LrcParser::new()?.parse(raw))
    }

    /// Builds a track from already timed entries, sorting them by time.
    #[must_use]
    pub fn from_entries(mut entries: Vec<LyricEntry>) -> Self {
        // `sort_by` is stable, which keeps same-time lines in source order
        entries.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&LyricEntry> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn entries(&self) -> &[LyricEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LyricEntry> {
        self.entries.iter()
    }
}

impl Index<usize> for LyricTrack {
    type Output = LyricEntry;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

impl<'a> IntoIterator for &'a LyricTrack {
    type Item = &'a LyricEntry;
    type IntoIter = std::slice::Iter<'a, LyricEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromStr for LyricTrack {
    type Err = Report;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl Display for LyricTrack {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

/// Reusable `.lrc` parser holding the compiled line pattern.
#[derive(Debug, Clone)]
pub struct LrcParser {
    line_regex: Regex,
}

impl LrcParser {
    /// # Errors
    ///
    /// Will return `Err` if the line pattern fails to compile.
    pub fn new() -> Result<Self> {
        // ASCII classes only: `\d` would also accept non-ASCII digits
        let line_regex = Regex::new(
            r"^\[(?P<minutes>[0-9]{2}):(?P<seconds>[0-9]{2}\.[0-9]{3})\]\s*(?P<text>.*)$",
        )?;
        Ok(Self { line_regex })
    }

    /// Parses lyrics text into a sorted track. Never fails: lines that do not
    /// match `[MM:SS.mmm]text` are dropped, and input without any such line
    /// gives an empty track.
    #[must_use]
    pub fn parse(&self, raw: &str) -> LyricTrack {
        let mut entries = vec![];
        let mut dropped = 0_usize;

        // `lines` strips both `\n` and `\r\n` endings
        for (number, line) in raw.lines().enumerate().filter(|(_, l)| !l.is_empty()) {
            match self.decode_line(line) {
                Ok(Some(entry)) => entries.push(entry),
                Ok(None) => {
                    trace!(line = number + 1, "skipping line without timestamp");
                    dropped += 1;
                }
                Err(err) => {
                    trace!(line = number + 1, error = %err, "skipping unreadable timestamp");
                    dropped += 1;
                }
            }
        }

        let track = LyricTrack::from_entries(entries);
        debug!(entries = track.len(), dropped, "parsed lyrics");
        track
    }

    fn decode_line(&self, line: &str) -> Result<Option<LyricEntry>> {
        let captures = match self.line_regex.captures(line) {
            None => return Ok(None),
            Some(x) => x,
        };
        let minutes: u32 = parse!(read_capture!(captures, "minutes"))?;
        let seconds: f64 = parse!(read_capture!(captures, "seconds"))?;
        let text = read_capture!(captures, "text").trim();
        Ok(Some(LyricEntry::new(
            f64::from(minutes) * 60.0 + seconds,
            text,
        )))
    }
}
