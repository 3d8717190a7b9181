//! Depth-pass planning.

use serde::{Deserialize, Serialize};

/// Lower bound on the step-down, in mm. Smaller values are silently
/// clamped.
pub const MIN_STEP_DOWN: f64 = 0.1;

/// Heights and depths for one operation. All values are signed Z in the
/// canonical frame; cutting proceeds toward decreasing Z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthParams {
    /// Height for rapid repositioning clear of everything.
    pub clearance_height: f64,
    /// Height from which plunging starts at feed rate.
    pub safe_height: f64,
    /// Top of the material to remove.
    pub start_depth: f64,
    /// Maximum material removed per rough pass, in mm.
    pub step_down: f64,
    /// Material removed by the final finishing pass, in mm. Clamped to
    /// the step-down. Zero disables the separate finishing pass.
    pub finish_step: f64,
    /// Bottom of the cut; the last pass always ends exactly here.
    pub final_depth: f64,
}

impl Default for DepthParams {
    fn default() -> Self {
        Self {
            clearance_height: 10.0,
            safe_height: 5.0,
            start_depth: 0.0,
            step_down: 2.0,
            finish_step: 0.0,
            final_depth: -10.0,
        }
    }
}

impl DepthParams {
    /// Ordered pass-end depths from just below the start depth down to the
    /// final depth.
    ///
    /// Rough passes split the non-finish material into equal steps no
    /// larger than the (clamped) step-down; when a finish step is set, one
    /// extra pass removes exactly that much and lands on the final depth.
    /// The list is strictly decreasing and its last element equals the
    /// final depth exactly. No material (start at or below final) yields
    /// an empty list.
    pub fn passes(&self) -> Vec<f64> {
        let step = self.step_down.max(MIN_STEP_DOWN);
        let total = self.start_depth - self.final_depth;
        if total <= 1e-9 {
            return Vec::new();
        }
        let finish = self.finish_step.clamp(0.0, step).min(total);

        let mut passes = Vec::new();
        let rough = total - finish;
        if rough > 1e-9 {
            let count = (rough / step).ceil() as usize;
            let size = rough / count as f64;
            for i in 1..=count {
                passes.push(self.start_depth - size * i as f64);
            }
        }

        if finish > 1e-9 {
            passes.push(self.final_depth);
        } else if let Some(last) = passes.last_mut() {
            // Pin the last rough pass onto the final depth exactly.
            *last = self.final_depth;
        }
        passes
    }
}
