// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Animation playback timing.

use std::time::{Duration, Instant};

/// Play/stop state and the time the shown frame was switched to.
#[derive(Debug, Default)]
pub struct Playback {
    shown_since: Option<Instant>,
}

impl Playback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.shown_since.is_some()
    }

    pub fn start(&mut self, now: Instant) {
        self.shown_since = Some(now);
        log::info!("Playback started");
    }

    pub fn stop(&mut self) {
        if self.shown_since.take().is_some() {
            log::info!("Playback stopped");
        }
    }

    /// Whether the shown frame has been on screen for `delay`. When it has,
    /// the timer restarts from `now`.
    pub fn advance(&mut self, now: Instant, delay: Duration) -> bool {
        match self.shown_since {
            Some(since) if now.saturating_duration_since(since) >= delay => {
                self.shown_since = Some(now);
                true
            }
            _ => false,
        }
    }

    /// Time left before the shown frame should be replaced.
    pub fn remaining(&self, now: Instant, delay: Duration) -> Option<Duration> {
        self.shown_since
            .map(|since| delay.saturating_sub(now.saturating_duration_since(since)))
    }
}

/// Delay to use for a frame; GIFs commonly store 0 meaning "as fast as the
/// viewer allows", which browsers show at a fallback rate.
pub fn effective_delay(delay_ms: u32, fallback_ms: u32) -> Duration {
    if delay_ms == 0 {
        Duration::from_millis(u64::from(fallback_ms))
    } else {
        Duration::from_millis(u64::from(delay_ms))
    }
}

/// Counter following `current` on a tape of `count` slots, wrapping to 1.
pub fn next_counter(current: usize, count: usize) -> usize {
    if count == 0 {
        0
    } else if current >= count {
        1
    } else {
        current + 1
    }
}
