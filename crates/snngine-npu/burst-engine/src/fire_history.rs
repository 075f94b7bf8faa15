// Copyright 2025 hsc-projects
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 hsc-projects
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! FireHistory - dense, tick-aligned window of fired-neuron bitmaps.
//!
//! - Dense: every tick gets a frame, silent ticks included; gaps are filled
//!   with empty frames.
//! - Bounded: at most `window_size` frames are kept (the max record duration).
//! - Queries are by tick range, never "last K spikes".

use roaring::RoaringBitmap;
use snngine_npu_neural::Tick;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FireHistoryError {
    #[error("window size must be > 0")]
    InvalidWindowSize,

    #[error("depth must be > 0")]
    InvalidDepth,

    #[error("non-monotonic tick: current={current}, requested={requested}")]
    NonMonotonicTick { current: Tick, requested: Tick },

    #[error("requested end_tick={end_tick} exceeds current_tick={current_tick}")]
    EndTickInFuture { end_tick: Tick, current_tick: Tick },

    #[error("insufficient history: need [{start}..{end}], but have [{have_start}..{have_end}]")]
    InsufficientHistory {
        start: Tick,
        end: Tick,
        have_start: Tick,
        have_end: Tick,
    },

    #[error("requested depth {depth} exceeds window size {window_size}")]
    DepthExceedsWindow { depth: usize, window_size: usize },
}

#[derive(Debug, Clone)]
pub struct FireHistory {
    window_size: usize,
    current_tick: Tick,
    frames: VecDeque<(Tick, RoaringBitmap)>, // oldest -> newest
}

impl FireHistory {
    pub fn new(window_size: usize) -> Result<Self, FireHistoryError> {
        if window_size == 0 {
            return Err(FireHistoryError::InvalidWindowSize);
        }
        Ok(Self {
            window_size,
            current_tick: 0,
            frames: VecDeque::with_capacity(window_size),
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Record the neurons that fired at `tick`
    pub fn record(&mut self, tick: Tick, fired: &[u32]) -> Result<(), FireHistoryError> {
        if self.current_tick != 0 && tick <= self.current_tick {
            return Err(FireHistoryError::NonMonotonicTick {
                current: self.current_tick,
                requested: tick,
            });
        }

        if self.current_tick > 0 && tick > self.current_tick + 1 {
            // Only the last window_size gap frames can survive
            let gap_start =
                (self.current_tick + 1).max(tick.saturating_sub(self.window_size as u64));
            for missing in gap_start..tick {
                self.push_frame(missing, RoaringBitmap::new());
            }
        }

        let bitmap: RoaringBitmap = fired.iter().copied().collect();
        self.push_frame(tick, bitmap);
        self.current_tick = tick;
        Ok(())
    }

    fn push_frame(&mut self, tick: Tick, bitmap: RoaringBitmap) {
        self.frames.push_back((tick, bitmap));
        while self.frames.len() > self.window_size {
            self.frames.pop_front();
        }
    }

    /// Exactly `depth` frames covering `[end_tick - depth + 1 ..= end_tick]`
    pub fn window(
        &self,
        end_tick: Tick,
        depth: usize,
    ) -> Result<Vec<(Tick, &RoaringBitmap)>, FireHistoryError> {
        if depth == 0 {
            return Err(FireHistoryError::InvalidDepth);
        }
        if depth > self.window_size {
            return Err(FireHistoryError::DepthExceedsWindow {
                depth,
                window_size: self.window_size,
            });
        }
        if end_tick > self.current_tick {
            return Err(FireHistoryError::EndTickInFuture {
                end_tick,
                current_tick: self.current_tick,
            });
        }

        let start = end_tick.saturating_sub(depth as u64 - 1);
        let (have_start, have_end) = match (self.frames.front(), self.frames.back()) {
            (Some(first), Some(last)) => (first.0, last.0),
            _ => (0, 0),
        };
        if self.frames.is_empty() || start < have_start || start == 0 {
            return Err(FireHistoryError::InsufficientHistory {
                start,
                end: end_tick,
                have_start,
                have_end,
            });
        }

        let offset = (start - have_start) as usize;
        Ok(self
            .frames
            .iter()
            .skip(offset)
            .take(depth)
            .map(|(tick, bitmap)| (*tick, bitmap))
            .collect())
    }

    /// Spike count per tick for the same window as [`FireHistory::window`]
    pub fn spike_counts(&self, end_tick: Tick, depth: usize) -> Result<Vec<u64>, FireHistoryError> {
        Ok(self
            .window(end_tick, depth)?
            .into_iter()
            .map(|(_, bitmap)| bitmap.len())
            .collect())
    }

    /// Most recent frame
    pub fn latest(&self) -> Option<(Tick, &RoaringBitmap)> {
        self.frames.back().map(|(tick, bitmap)| (*tick, bitmap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_window() {
        let mut history = FireHistory::new(3).unwrap();
        for tick in 1..=5 {
            history.record(tick, &[tick as u32]).unwrap();
        }
        assert_eq!(history.len(), 3);
        let window = history.window(5, 3).unwrap();
        assert_eq!(window.iter().map(|(t, _)| *t).collect::<Vec<_>>(), vec![3, 4, 5]);
        assert!(window[2].1.contains(5));

        assert!(matches!(
            history.window(2, 1),
            Err(FireHistoryError::InsufficientHistory { .. })
        ));
    }

    #[test]
    fn test_gaps_filled_with_empty_frames() {
        let mut history = FireHistory::new(10).unwrap();
        history.record(1, &[0, 1]).unwrap();
        history.record(4, &[2]).unwrap();
        assert_eq!(history.spike_counts(4, 4).unwrap(), vec![2, 0, 0, 1]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            FireHistory::new(0).unwrap_err(),
            FireHistoryError::InvalidWindowSize
        );
        let mut history = FireHistory::new(4).unwrap();
        history.record(2, &[]).unwrap();
        assert!(matches!(
            history.record(2, &[]),
            Err(FireHistoryError::NonMonotonicTick { .. })
        ));
        assert!(matches!(
            history.window(3, 1),
            Err(FireHistoryError::EndTickInFuture { .. })
        ));
        assert!(matches!(
            history.window(2, 5),
            Err(FireHistoryError::DepthExceedsWindow { .. })
        ));
        assert_eq!(history.window(2, 0).unwrap_err(), FireHistoryError::InvalidDepth);
    }
}
