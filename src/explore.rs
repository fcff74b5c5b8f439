use crate::{
    EXPLORE_ABS_PAN_STEP, EXPLORE_ABS_TILT_STEP, EXPLORE_PAN_END_ANGLE, EXPLORE_PAN_START_ANGLE,
    EXPLORE_TILT_END_ANGLE, EXPLORE_TILT_START_ANGLE,
};

/// Most points a single axis will produce. Finer steps are widened to fit.
pub const MAX_AXIS_POINTS: usize = 4096;

/// One axis of the sweep: `start` to `end` in `step` sized moves, the last
/// one shortened so the axis always finishes exactly on `end`.
#[cfg_attr(feature = "no_std", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq)]
struct Axis {
    start: f32,
    end: f32,
    step: f32,
    len: usize,
}

impl Axis {
    fn new(start: f32, end: f32, step: f32) -> Self {
        let span = libm::fabsf(end - start);
        let mut step = libm::fabsf(step);
        let len = if span == 0.0 {
            1
        } else if !(step > 0.0) || step >= span {
            2
        } else {
            let moves = libm::ceilf(span / step);
            if moves >= (MAX_AXIS_POINTS - 1) as f32 {
                step = span / (MAX_AXIS_POINTS - 1) as f32;
                MAX_AXIS_POINTS
            } else {
                moves as usize + 1
            }
        };
        let step = if end < start { -step } else { step };
        Self {
            start,
            end,
            step,
            len,
        }
    }

    fn at(&self, i: usize) -> f32 {
        if i + 1 >= self.len {
            self.end
        } else {
            self.start + self.step * i as f32
        }
    }
}

/// Raster scan over pan and tilt, yielding `(pan_deg, tilt_deg)` targets.
///
/// Pan sweeps across the full range, tilt steps once, pan sweeps back, and so
/// on until the last tilt row has been swept. The iterator is finite; use
/// `.cycle()` to scan forever.
#[cfg_attr(feature = "no_std", derive(defmt::Format))]
#[derive(Debug, Clone, PartialEq)]
pub struct ExploreSweep {
    pan: Axis,
    tilt: Axis,
    row: usize,
    col: usize,
}

impl Default for ExploreSweep {
    fn default() -> Self {
        Self::new(
            (EXPLORE_PAN_START_ANGLE, EXPLORE_PAN_END_ANGLE),
            (EXPLORE_TILT_START_ANGLE, EXPLORE_TILT_END_ANGLE),
            EXPLORE_ABS_PAN_STEP,
            EXPLORE_ABS_TILT_STEP,
        )
    }
}

impl ExploreSweep {
    /// # Parameters
    /// - `pan_range`, `tilt_range`: `(start, end)` in degrees; `end` may be
    ///   below `start`.
    /// - `pan_step`, `tilt_step`: Absolute step sizes. A step that is not
    ///   positive jumps straight from start to end.
    pub fn new(pan_range: (f32, f32), tilt_range: (f32, f32), pan_step: f32, tilt_step: f32) -> Self {
        Self {
            pan: Axis::new(pan_range.0, pan_range.1, pan_step),
            tilt: Axis::new(tilt_range.0, tilt_range.1, tilt_step),
            row: 0,
            col: 0,
        }
    }

    /// Total number of targets in one pass.
    pub fn pass_len(&self) -> usize {
        self.pan.len.saturating_mul(self.tilt.len)
    }

    fn remaining(&self) -> usize {
        self.pass_len()
            .saturating_sub(self.row.saturating_mul(self.pan.len).saturating_add(self.col))
    }
}

impl Iterator for ExploreSweep {
    type Item = (f32, f32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.row >= self.tilt.len {
            return None;
        }

        // odd rows run pan backwards
        let pan_idx = if self.row % 2 == 0 {
            self.col
        } else {
            self.pan.len - 1 - self.col
        };
        let target = (self.pan.at(pan_idx), self.tilt.at(self.row));

        self.col += 1;
        if self.col >= self.pan.len {
            self.col = 0;
            self.row += 1;
        }

        Some(target)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for ExploreSweep {}
