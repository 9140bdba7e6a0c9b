//! Timeline orchestration for multiple animations
//!
//! A timeline owns a set of tweens placed at offsets along a shared clock.
//! Advancing the timeline starts each entry as its window opens and forwards
//! the clock delta to every running entry.

use slotmap::{new_key_type, SlotMap};

use crate::tween::{CompleteCallback, PlaybackState, Tween};

new_key_type! {
    /// Stable key for an animation placed on a timeline
    pub struct TimelineEntryId;
}

/// Where a new entry is placed on the timeline clock
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimelinePosition {
    /// Fixed offset in milliseconds from timeline start. Absolute placements
    /// never move the append point.
    Absolute(f32),
    /// Signed offset in milliseconds from the append point, the end of the
    /// most recently appended entry; 0.0 appends, negative values overlap it
    RelativeToEnd(f32),
}

/// Loop and rate configuration for a timeline
#[derive(Clone, Copy, Debug)]
pub struct TimelineConfig {
    /// Number of passes; -1 loops forever
    pub loop_count: i32,
    /// Clock rate multiplier (1.0 is real time)
    pub rate: f32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            loop_count: 1,
            rate: 1.0,
        }
    }
}

impl TimelineConfig {
    pub fn loop_count(mut self, count: i32) -> Self {
        self.loop_count = count;
        self
    }

    pub fn infinite(mut self) -> Self {
        self.loop_count = -1;
        self
    }

    pub fn rate(mut self, rate: f32) -> Self {
        self.rate = rate.max(0.0);
        self
    }
}

struct TimelineEntry {
    /// Offset in milliseconds from timeline start
    start_ms: f32,
    tween: Tween,
    started: bool,
}

/// A timeline orchestrating multiple tweens on one clock
///
/// Entries are owned by the timeline, so an animation instance belongs to at
/// most one timeline.
pub struct Timeline {
    entries: SlotMap<TimelineEntryId, TimelineEntry>,
    current_time: f32,
    total_duration: f32,
    /// End of the last relatively placed entry; `RelativeToEnd` resolves
    /// against this, not against the overall total
    append_cursor_ms: f32,
    state: PlaybackState,
    loop_count: i32,
    current_loop: i32,
    rate: f32,
    completed_fired: bool,
    on_complete: Vec<CompleteCallback>,
}

impl Timeline {
    pub fn new(config: TimelineConfig) -> Self {
        Self {
            entries: SlotMap::with_key(),
            current_time: 0.0,
            total_duration: 0.0,
            append_cursor_ms: 0.0,
            state: PlaybackState::Idle,
            loop_count: config.loop_count,
            current_loop: 0,
            rate: config.rate,
            completed_fired: false,
            on_complete: Vec::new(),
        }
    }

    /// Add a tween at the given position. The timeline's total duration grows
    /// to cover the entry's estimated end (one iteration for infinite tweens).
    ///
    /// Relative placements chain off the append point; an entry placed at an
    /// absolute offset leaves the append point where it was, so
    /// `add(a, Absolute(0.0))` followed by `add(b, RelativeToEnd(0.0))`
    /// starts both entries together.
    pub fn add(&mut self, tween: Tween, position: TimelinePosition) -> TimelineEntryId {
        let start_ms = match position {
            TimelinePosition::Absolute(ms) => ms.max(0.0),
            TimelinePosition::RelativeToEnd(delta) => (self.append_cursor_ms + delta).max(0.0),
        };
        let end = start_ms + tween.total_duration_ms();
        self.total_duration = self.total_duration.max(end);
        if matches!(position, TimelinePosition::RelativeToEnd(_)) {
            self.append_cursor_ms = end;
        }

        self.entries.insert(TimelineEntry {
            start_ms,
            tween,
            started: false,
        })
    }

    pub fn on_complete<F>(&mut self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.on_complete.push(Box::new(callback));
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Running
    }

    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    pub fn total_duration_ms(&self) -> f32 {
        self.total_duration
    }

    pub fn set_playback_rate(&mut self, rate: f32) {
        self.rate = rate.max(0.0);
    }

    /// Start playback. Entries whose offset has already elapsed start
    /// immediately, so two entries at offset 0 begin within the same tick.
    pub fn play(&mut self) {
        match self.state {
            PlaybackState::Running => return,
            PlaybackState::Paused => {
                self.state = PlaybackState::Running;
                return;
            }
            PlaybackState::Finished => {
                self.rewind();
            }
            PlaybackState::Idle => {}
        }
        self.state = PlaybackState::Running;
        for entry in self.entries.values_mut() {
            if entry.start_ms <= self.current_time && !entry.started {
                entry.tween.play();
                entry.started = true;
            }
        }
        tracing::debug!(total_ms = self.total_duration, "timeline started");
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Running {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            self.state = PlaybackState::Running;
        }
    }

    pub fn stop(&mut self) {
        self.rewind();
        self.state = PlaybackState::Idle;
    }

    fn rewind(&mut self) {
        self.current_time = 0.0;
        self.current_loop = 0;
        self.completed_fired = false;
        for entry in self.entries.values_mut() {
            entry.tween.stop();
            entry.started = false;
        }
    }

    /// Jump the clock to an absolute time. Entries before the target reset;
    /// entries inside their window are positioned at the matching local time,
    /// including the iteration index and direction parity of multi-iteration
    /// tweens.
    pub fn seek(&mut self, time_ms: f32) {
        let time_ms = time_ms.clamp(0.0, self.total_duration);
        self.current_time = time_ms;

        for entry in self.entries.values_mut() {
            let local = time_ms - entry.start_ms;
            if local < 0.0 {
                entry.tween.stop();
                entry.started = false;
            } else {
                if !entry.started {
                    entry.tween.play();
                    entry.started = true;
                }
                let delay = entry.tween.config().delay_ms;
                entry.tween.seek_elapsed(local - delay);
            }
        }
    }

    /// Advance the clock by `dt_ms` (scaled by the playback rate), starting
    /// entries whose window opens during this tick with the overshoot applied.
    pub fn update(&mut self, dt_ms: f32) {
        if self.state != PlaybackState::Running || dt_ms <= 0.0 {
            return;
        }

        let scaled = dt_ms * self.rate;
        let new_time = self.current_time + scaled;

        for entry in self.entries.values_mut() {
            if entry.started {
                entry.tween.update(scaled);
            } else if entry.start_ms <= new_time {
                entry.tween.play();
                entry.started = true;
                let overshoot = new_time - entry.start_ms;
                entry.tween.update(overshoot);
            }
        }

        self.current_time = new_time;

        if self.current_time >= self.total_duration {
            let more = self.loop_count < 0 || self.current_loop + 1 < self.loop_count;
            if more {
                self.current_loop += 1;
                self.current_time = 0.0;
                for entry in self.entries.values_mut() {
                    entry.tween.stop();
                    entry.started = false;
                }
                tracing::trace!(pass = self.current_loop, "timeline looped");
            } else {
                self.current_time = self.total_duration;
                self.state = PlaybackState::Finished;
                self.fire_complete();
            }
        }
    }

    /// Current value of one entry's tween
    pub fn value(&self, id: TimelineEntryId) -> Option<f32> {
        self.entries.get(id).map(|entry| entry.tween.value())
    }

    /// Current progress of one entry's tween
    pub fn progress(&self, id: TimelineEntryId) -> Option<f32> {
        self.entries.get(id).map(|entry| entry.tween.progress())
    }

    fn fire_complete(&mut self) {
        if self.completed_fired {
            return;
        }
        self.completed_fired = true;
        for callback in &mut self.on_complete {
            callback();
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new(TimelineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tween::{AnimationConfig, Direction};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn tween(duration_ms: f32) -> Tween {
        Tween::new(0.0, 100.0, AnimationConfig::new(duration_ms).unwrap())
    }

    #[test]
    fn test_relative_positions_chain_and_overlap() {
        let mut timeline = Timeline::default();
        timeline.add(tween(1000.0), TimelinePosition::RelativeToEnd(0.0));
        assert_eq!(timeline.total_duration_ms(), 1000.0);

        // "+=0" appends after the previous relative entry
        timeline.add(tween(500.0), TimelinePosition::RelativeToEnd(0.0));
        assert_eq!(timeline.total_duration_ms(), 1500.0);

        // "-=500" overlaps it
        timeline.add(tween(200.0), TimelinePosition::RelativeToEnd(-500.0));
        assert_eq!(timeline.total_duration_ms(), 1500.0);
    }

    #[test]
    fn test_entries_at_zero_start_same_tick() {
        let mut timeline = Timeline::default();
        let a = timeline.add(tween(1000.0), TimelinePosition::Absolute(0.0));
        // The absolute placement above did not move the append point, so
        // "+=0" still resolves to offset 0
        let b = timeline.add(tween(1000.0), TimelinePosition::RelativeToEnd(0.0));

        timeline.play();
        timeline.update(100.0);

        assert!((timeline.progress(a).unwrap() - 0.1).abs() < 1e-6);
        assert!((timeline.progress(b).unwrap() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_absolute_entries_do_not_move_append_point() {
        let mut timeline = Timeline::default();
        timeline.add(tween(500.0), TimelinePosition::RelativeToEnd(0.0));
        // An absolute entry way out past the chain
        timeline.add(tween(100.0), TimelinePosition::Absolute(2000.0));
        assert_eq!(timeline.total_duration_ms(), 2100.0);

        // The next relative entry still chains at 500, not 2100
        let chained = timeline.add(tween(500.0), TimelinePosition::RelativeToEnd(0.0));
        timeline.play();
        timeline.update(600.0);
        assert!((timeline.progress(chained).unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_window_open_gets_overshoot() {
        let mut timeline = Timeline::default();
        let late = timeline.add(tween(1000.0), TimelinePosition::Absolute(100.0));

        timeline.play();
        // Tick crosses the entry's start by 60ms
        timeline.update(160.0);
        assert!((timeline.progress(late).unwrap() - 0.06).abs() < 1e-6);
    }

    #[test]
    fn test_completion_fires_once() {
        let fired = Arc::new(AtomicU32::new(0));
        let mut timeline = Timeline::default();
        timeline.add(tween(100.0), TimelinePosition::Absolute(0.0));
        let f = Arc::clone(&fired);
        timeline.on_complete(move || {
            f.fetch_add(1, Ordering::SeqCst);
        });

        timeline.play();
        timeline.update(100.0);
        assert_eq!(timeline.state(), PlaybackState::Finished);
        timeline.update(50.0);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_loop_resets_entries() {
        let mut timeline = Timeline::new(TimelineConfig::default().loop_count(2));
        let id = timeline.add(tween(100.0), TimelinePosition::Absolute(0.0));

        timeline.play();
        timeline.update(100.0);
        // First pass done; clock reset and entries stopped
        assert_eq!(timeline.current_time(), 0.0);
        assert!(timeline.is_playing());

        timeline.update(50.0);
        assert!((timeline.progress(id).unwrap() - 0.5).abs() < 1e-6);

        timeline.update(50.0);
        assert_eq!(timeline.state(), PlaybackState::Finished);
    }

    #[test]
    fn test_playback_rate_scales_clock() {
        let mut timeline = Timeline::new(TimelineConfig::default().rate(2.0));
        let id = timeline.add(tween(1000.0), TimelinePosition::Absolute(0.0));

        timeline.play();
        timeline.update(250.0);
        assert!((timeline.progress(id).unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_seek_positions_entries() {
        let mut timeline = Timeline::default();
        let early = timeline.add(tween(1000.0), TimelinePosition::Absolute(0.0));
        let late = timeline.add(tween(1000.0), TimelinePosition::Absolute(500.0));

        timeline.play();
        timeline.seek(750.0);

        assert!((timeline.progress(early).unwrap() - 0.75).abs() < 1e-6);
        assert!((timeline.progress(late).unwrap() - 0.25).abs() < 1e-6);

        // Seeking back before the late entry's window resets it
        timeline.seek(250.0);
        assert_eq!(timeline.progress(late).unwrap(), 0.0);
    }

    #[test]
    fn test_seek_into_later_iteration() {
        let mut timeline = Timeline::default();
        let config = AnimationConfig::new(100.0).unwrap().iterations(3).unwrap();
        let id = timeline.add(
            Tween::new(0.0, 100.0, config),
            TimelinePosition::Absolute(0.0),
        );

        timeline.play();
        // Midway through the second of three iterations
        timeline.seek(150.0);
        assert!((timeline.progress(id).unwrap() - 0.5).abs() < 1e-6);
        assert!((timeline.value(id).unwrap() - 50.0).abs() < 1e-4);

        timeline.seek(300.0);
        assert_eq!(timeline.progress(id).unwrap(), 1.0);
    }

    #[test]
    fn test_seek_restores_alternate_parity() {
        let mut timeline = Timeline::default();
        let config = AnimationConfig::new(100.0)
            .unwrap()
            .iterations(2)
            .unwrap()
            .direction(Direction::Alternate);
        let id = timeline.add(
            Tween::new(0.0, 100.0, config),
            TimelinePosition::Absolute(0.0),
        );

        timeline.play();
        // 25ms into the second, reversed iteration renders 75
        timeline.seek(125.0);
        assert!((timeline.value(id).unwrap() - 75.0).abs() < 1e-4);
    }

    #[test]
    fn test_pause_freezes_clock() {
        let mut timeline = Timeline::default();
        let id = timeline.add(tween(1000.0), TimelinePosition::Absolute(0.0));

        timeline.play();
        timeline.update(200.0);
        timeline.pause();
        timeline.update(200.0);
        assert!((timeline.progress(id).unwrap() - 0.2).abs() < 1e-6);

        timeline.resume();
        timeline.update(300.0);
        assert!((timeline.progress(id).unwrap() - 0.5).abs() < 1e-6);
    }
}
