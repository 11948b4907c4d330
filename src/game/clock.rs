use bevy::prelude::*;

use crate::config::tuning::Tuning;

/// Per-frame delta and simulated time since the match started.
///
/// `delta` is written once per frame by the frame driver and read by every
/// simulation step. `elapsed` only advances while the match is running.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameClock {
    pub delta: f32,
    pub elapsed: f32,
}

impl FrameClock {
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

/// Frame driver: copy the engine frame time into the clock.
pub fn drive_frame_clock(time: Res<Time>, tuning: Res<Tuning>, mut clock: ResMut<FrameClock>) {
    clock.delta = time.delta_secs().clamp(0.0, tuning.max_frame_delta.max(0.0));
}

pub fn advance_match_clock(mut clock: ResMut<FrameClock>) {
    clock.elapsed += clock.delta;
}
