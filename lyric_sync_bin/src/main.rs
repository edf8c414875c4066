use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result, WrapErr};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use lyric_sync_lib::lrc::LyricTrack;
use lyric_sync_lib::time::format_time;
use lyric_sync_lib::LyricController;

mod clock;

use clock::PlaybackClock;

/// Commandline lyric synchronisation tool for .lrc files!
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the parsed lyrics back out as sorted .lrc lines
    Dump {
        /// Source .lrc file
        #[clap(value_parser)]
        source: PathBuf,
    },
    /// Feed playback positions through the tracker and print each line change
    #[clap(allow_negative_numbers = true)]
    At {
        /// Source .lrc file
        #[clap(value_parser)]
        source: PathBuf,

        /// Playback positions in seconds, in the order they are sampled
        #[clap(value_parser, required = true)]
        times: Vec<f64>,
    },
    /// Show the lyrics in real time against a simulated playback clock
    Play {
        /// Source .lrc file
        #[clap(value_parser)]
        source: PathBuf,

        /// Milliseconds between clock samples
        #[clap(long, value_parser, default_value_t = 250)]
        tick_ms: u64,

        /// Song seconds that pass per real second
        #[clap(long, value_parser, default_value_t = 1.0)]
        speed: f64,

        /// Position in seconds to start playing from
        #[clap(long, value_parser, default_value_t = 0.0)]
        from: f64,

        /// Seconds to keep playing after the last line
        #[clap(long, value_parser, default_value_t = 3.0)]
        tail: f64,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(err) = init_logging() {
        eprintln!("logging disabled: {err}");
    }

    let args = Args::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Dump { source } => dump(&read_track(&source)?, &mut out),
        Command::At { source, times } => at(&read_track(&source)?, &times, &mut out),
        Command::Play {
            source,
            tick_ms,
            speed,
            from,
            tail,
        } => {
            check_play_args(speed, from, tail)?;
            let track = read_track(&source)?;
            play(track, Duration::from_millis(tick_ms.max(1)), speed, from, tail, &mut out)
        }
    }
}

/// Logs go to stderr so they never mix with the lyric output.
fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| eyre!("failed to set up logging: {err}"))
}

/// The clock never reaches the end of the track unless all of these are finite.
fn check_play_args(speed: f64, from: f64, tail: f64) -> Result<()> {
    if !(speed > 0.0 && speed.is_finite()) {
        return Err(eyre!("--speed must be a positive number, got {speed}"));
    }
    if !from.is_finite() {
        return Err(eyre!("--from must be a finite number, got {from}"));
    }
    if !tail.is_finite() {
        return Err(eyre!("--tail must be a finite number, got {tail}"));
    }
    Ok(())
}

fn read_track(source: &Path) -> Result<LyricTrack> {
    let file_str = fs::read_to_string(source)
        .wrap_err_with(|| format!("failed to read {}", source.display()))?;
    let track = LyricTrack::new(&file_str)?;
    info!(path = %source.display(), lines = track.len(), "loaded lyrics");
    Ok(track)
}

fn dump(track: &LyricTrack, out: &mut impl Write) -> Result<()> {
    if track.is_empty() {
        writeln!(out, "no lyrics available")?;
        return Ok(());
    }
    for entry in track {
        writeln!(out, "{entry}")?;
    }
    writeln!(out, "{} entries", track.len())?;
    Ok(())
}

fn at(track: &LyricTrack, times: &[f64], out: &mut impl Write) -> Result<()> {
    if track.is_empty() {
        writeln!(out, "no lyrics available")?;
        return Ok(());
    }
    let mut controller = LyricController::new(track.clone());
    for &time in times {
        let changed = controller
            .update(time)
            .map(|entry| (format_time(entry.time()), entry.text().to_owned()));
        match (changed, controller.current_index()) {
            (Some((stamp, text)), Some(index)) => {
                writeln!(out, "{time:.3} -> #{index} [{stamp}] {text}")?;
            }
            _ => debug!(time, "line unchanged"),
        }
    }
    Ok(())
}

fn play(
    track: LyricTrack,
    tick: Duration,
    speed: f64,
    from: f64,
    tail: f64,
    out: &mut impl Write,
) -> Result<()> {
    let end = match track.entries().last() {
        None => {
            writeln!(out, "no lyrics available")?;
            return Ok(());
        }
        Some(last) => last.time() + tail.max(0.0),
    };
    let mut controller = LyricController::new(track);
    let clock = PlaybackClock::start(from, speed);

    if let Some(entry) = controller.prime(clock.now()) {
        writeln!(out, "{}  {}", format_time(entry.time()), entry.text())?;
        out.flush()?;
    }
    loop {
        thread::sleep(tick);
        let now = clock.now();
        if let Some(entry) = controller.update(now) {
            writeln!(out, "{}  {}", format_time(entry.time()), entry.text())?;
            out.flush()?;
        }
        if now > end {
            break;
        }
    }
    Ok(())
}
