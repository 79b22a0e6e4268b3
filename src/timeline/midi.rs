//! Tempo map extraction from Standard MIDI Files
//!
//! Reads Set Tempo meta events from the tempo track and converts their tick
//! positions to seconds, producing a `TempoTimeline`.
//!
//! # Conventions
//!
//! - Only the first track is scanned; format 1 files keep the tempo map there
//! - Playback starts at 120 BPM until the first Set Tempo event
//! - A Set Tempo event at tick 0 replaces the initial 120 BPM entry
//! - Later events add a change point only when the tempo actually changes
//!
//! # Example
//!
//! ```no_run
//! use tempo_profile::timeline::midi::read_tempo_map_file;
//!
//! let timeline = read_tempo_map_file("score.mid")?;
//! for (time, bpm) in timeline.iter() {
//!     println!("At {:.2} seconds, the tempo is {:.2} BPM", time, bpm);
//! }
//! # Ok::<(), tempo_profile::TempoError>(())
//! ```

use std::path::Path;

use midly::{MetaMessage, Smf, Timing, TrackEventKind};

use super::TempoTimeline;
use crate::error::TempoError;

/// Tempo assumed before any Set Tempo event
pub const DEFAULT_BPM: f64 = 120.0;

const MICROSECONDS_PER_MINUTE: f64 = 60_000_000.0;

/// Parse SMF bytes and extract the tempo timeline
///
/// # Errors
///
/// - `TempoError::MidiParse` if the bytes are not a valid SMF, the file has no
///   tracks, or it uses SMPTE timecode timing
/// - `TempoError::InvalidInput` if the resulting timeline is malformed
pub fn read_tempo_map(bytes: &[u8]) -> Result<TempoTimeline, TempoError> {
    let smf = Smf::parse(bytes).map_err(|e| TempoError::MidiParse(e.to_string()))?;

    let ticks_per_beat = match smf.header.timing {
        Timing::Metrical(ticks) => ticks.as_int(),
        Timing::Timecode(fps, subframes) => {
            return Err(TempoError::MidiParse(format!(
                "SMPTE timecode timing ({} fps, {} subframes) is not supported",
                fps.as_int(),
                subframes
            )));
        }
    };

    if ticks_per_beat == 0 {
        return Err(TempoError::MidiParse(
            "Header declares zero ticks per beat".to_string(),
        ));
    }

    let tempo_track = smf
        .tracks
        .first()
        .ok_or_else(|| TempoError::MidiParse("File contains no tracks".to_string()))?;

    // (absolute tick, bpm)
    let mut tick_tempos: Vec<(u64, f64)> = vec![(0, DEFAULT_BPM)];
    let mut current_tick: u64 = 0;

    for event in tempo_track {
        current_tick += u64::from(event.delta.as_int());

        if let TrackEventKind::Meta(MetaMessage::Tempo(us_per_beat)) = event.kind {
            let us_per_beat = us_per_beat.as_int();
            if us_per_beat == 0 {
                log::warn!("Ignoring Set Tempo event with zero length at tick {}", current_tick);
                continue;
            }
            let bpm = MICROSECONDS_PER_MINUTE / f64::from(us_per_beat);

            if current_tick == 0 {
                tick_tempos = vec![(0, bpm)];
            } else if tick_tempos.last().map(|&(_, last)| last) != Some(bpm) {
                tick_tempos.push((current_tick, bpm));
            }
        }
    }

    log::debug!(
        "Read {} tempo change points ({} ticks per beat)",
        tick_tempos.len(),
        ticks_per_beat
    );

    let (change_times, tempos) = ticks_to_seconds(&tick_tempos, ticks_per_beat);
    TempoTimeline::new(change_times, tempos)
}

/// Read a MIDI file from disk and extract its tempo timeline
pub fn read_tempo_map_file<P: AsRef<Path>>(path: P) -> Result<TempoTimeline, TempoError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| TempoError::Io(format!("{}: {}", path.display(), e)))?;
    read_tempo_map(&bytes)
}

/// Integrate tick positions through the tempo segments to get seconds
fn ticks_to_seconds(tick_tempos: &[(u64, f64)], ticks_per_beat: u16) -> (Vec<f32>, Vec<f32>) {
    let ticks_per_beat = f64::from(ticks_per_beat);
    let mut change_times = Vec::with_capacity(tick_tempos.len());
    let mut tempos = Vec::with_capacity(tick_tempos.len());

    let mut seconds = 0.0f64;
    let mut last_tick = 0u64;
    let mut last_bpm = DEFAULT_BPM;

    for (i, &(tick, bpm)) in tick_tempos.iter().enumerate() {
        if i > 0 {
            let seconds_per_tick = 60.0 / (last_bpm * ticks_per_beat);
            seconds += (tick - last_tick) as f64 * seconds_per_tick;
        }
        change_times.push(seconds as f32);
        tempos.push(bpm as f32);
        last_tick = tick;
        last_bpm = bpm;
    }

    (change_times, tempos)
}
