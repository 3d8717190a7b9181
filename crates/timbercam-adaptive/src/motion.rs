//! Motion program generation.
//!
//! Expands abstract solver regions into a fully dimensioned, depth-staged
//! motion program in the canonical frame: helix or straight plunge entries,
//! cutting moves at pass depth, lifted or fully retracted link moves, and
//! clearance retracts between regions and passes.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::depth::DepthParams;
use crate::region::{MotionKind, SolveResult};

/// Angular step of the helical descent, in radians.
const HELIX_STEP: f64 = PI / 18.0;

/// Helix radii at or below this collapse to a straight plunge, in mm.
const HELIX_RADIUS_EPSILON: f64 = 1e-4;

/// Lower bound on the helix ramp angle, in degrees.
pub const MIN_HELIX_ANGLE_DEG: f64 = 1.0;

/// Motion command verb, in the spirit of G0/G1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionVerb {
    /// Rapid repositioning move, no material contact.
    #[serde(rename = "rapid")]
    Rapid,
    /// Feed-rate move.
    #[serde(rename = "linear")]
    Linear,
}

/// One machine motion with a partial coordinate set.
///
/// Axes a command does not mention keep their last value; coordinate
/// completion (see [`crate::placement`]) makes them explicit before the
/// program leaves the canonical frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionCommand {
    /// Motion verb.
    pub verb: MotionVerb,
    /// X axis target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Y axis target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Z axis target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// A rotary axis target, in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
    /// C rotary axis target, in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<f64>,
    /// Feed rate in mm/min; only feed moves carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed: Option<f64>,
    /// Free-form annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl MotionCommand {
    /// A rapid move with no axis words yet.
    pub fn rapid() -> Self {
        Self {
            verb: MotionVerb::Rapid,
            x: None,
            y: None,
            z: None,
            a: None,
            c: None,
            feed: None,
            comment: None,
        }
    }

    /// A feed move at the given rate, with no axis words yet.
    pub fn linear(feed: f64) -> Self {
        Self {
            verb: MotionVerb::Linear,
            feed: Some(feed),
            ..Self::rapid()
        }
    }

    /// Set the XY target.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Set the Z target.
    pub fn z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    /// Set the AC rotary targets, in degrees.
    pub fn orient(mut self, a: f64, c: f64) -> Self {
        self.a = Some(a);
        self.c = Some(c);
        self
    }

    /// Attach an annotation.
    pub fn commented(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// The fully resolved position, if all three linear axes are present.
    pub fn position(&self) -> Option<(f64, f64, f64)> {
        match (self.x, self.y, self.z) {
            (Some(x), Some(y), Some(z)) => Some((x, y, z)),
            _ => None,
        }
    }
}

/// Parameters shaping the motion program around the solver output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionParams {
    /// Lift above pass depth for `LinkClear` moves, in mm. The effective
    /// lift is never below the tool diameter.
    pub lift_distance: f64,
    /// Helix ramp entry angle in degrees; floored at
    /// [`MIN_HELIX_ANGLE_DEG`].
    pub helix_angle_deg: f64,
    /// Feed rate for plunging and descending moves, in mm/min.
    pub vertical_feed: f64,
    /// Feed rate for cutting moves at depth, in mm/min.
    pub horizontal_feed: f64,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            lift_distance: 1.0,
            helix_angle_deg: 5.0,
            vertical_feed: 100.0,
            horizontal_feed: 100.0,
        }
    }
}

/// An ordered sequence of motion commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionProgram {
    /// Commands in execution order.
    pub commands: Vec<MotionCommand>,
}

impl MotionProgram {
    /// Create an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command.
    pub fn push(&mut self, command: MotionCommand) {
        self.commands.push(command);
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the program holds no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Expand solver regions into a depth-staged motion program.
///
/// Passes run top to bottom; within a pass, regions run in solver order.
/// Each (pass, region) pair gets exactly one entry — a helix ramp when the
/// region's helix radius is positive, a straight plunge otherwise. An
/// empty solve result yields an empty program; that is a valid outcome,
/// not an error.
pub fn generate_program(
    result: &SolveResult,
    depths: &DepthParams,
    motion: &MotionParams,
    tool_diameter: f64,
) -> MotionProgram {
    let mut program = MotionProgram::new();
    if result.is_empty() {
        return program;
    }

    let step_up = motion.lift_distance.max(tool_diameter);
    let helix_angle = motion.helix_angle_deg.max(MIN_HELIX_ANGLE_DEG).to_radians();
    let clearance = depths.clearance_height;

    let mut pass_start = depths.start_depth;
    let mut last_z = clearance;

    for pass_end in depths.passes() {
        for region in &result.regions {
            let center = region.helix_center;
            let start = region.start_point;
            let helix_radius = region.helix_radius();

            if helix_radius > HELIX_RADIUS_EPSILON {
                trace!(helix_radius, pass_end, "helix entry");
                let start_angle = (start.y - center.y).atan2(start.x - center.x);
                let hx = center.x + helix_radius * start_angle.cos();
                let hy = center.y + helix_radius * start_angle.sin();

                program.push(
                    MotionCommand::rapid()
                        .at(hx, hy)
                        .z(clearance)
                        .commented(format!("helix to pass depth {pass_end:.3}")),
                );
                program.push(MotionCommand::rapid().at(hx, hy).z(depths.safe_height));
                program.push(
                    MotionCommand::linear(motion.vertical_feed)
                        .at(hx, hy)
                        .z(pass_start),
                );

                // Depth gained per revolution at the configured ramp angle.
                let circumference = 2.0 * PI * helix_radius;
                let depth_per_revolution = circumference * helix_angle.tan();
                let pass_depth = pass_start - pass_end;
                let mut max_radians = pass_depth / depth_per_revolution * 2.0 * PI;

                let mut current = 0.0;
                while current < max_radians {
                    let x = center.x + helix_radius * (current + start_angle).cos();
                    let y = center.y + helix_radius * (current + start_angle).sin();
                    let z = pass_start - current / max_radians * pass_depth;
                    program.push(MotionCommand::linear(motion.vertical_feed).at(x, y).z(z));
                    current += HELIX_STEP;
                }

                // One more full revolution at the target depth so the
                // center is actually cleared.
                max_radians += 2.0 * PI;
                while current < max_radians {
                    let x = center.x + helix_radius * (current + start_angle).cos();
                    let y = center.y + helix_radius * (current + start_angle).sin();
                    program.push(
                        MotionCommand::linear(motion.horizontal_feed)
                            .at(x, y)
                            .z(pass_end),
                    );
                    current += HELIX_STEP;
                }
            } else {
                program.push(
                    MotionCommand::rapid()
                        .at(start.x, start.y)
                        .z(clearance)
                        .commented(format!("straight to pass depth {pass_end:.3}")),
                );
                program.push(
                    MotionCommand::linear(motion.vertical_feed)
                        .at(start.x, start.y)
                        .z(pass_end),
                );
            }

            last_z = pass_end;
            for segment in &region.paths {
                for point in &segment.points {
                    match segment.kind {
                        MotionKind::Cutting => {
                            let z = pass_end;
                            if z != last_z {
                                program.push(MotionCommand::linear(motion.vertical_feed).z(z));
                            }
                            program.push(
                                MotionCommand::linear(motion.horizontal_feed)
                                    .at(point.x, point.y),
                            );
                            last_z = z;
                        }
                        MotionKind::LinkClear => {
                            let z = pass_end + step_up;
                            if z != last_z {
                                program.push(MotionCommand::rapid().z(z));
                            }
                            program.push(MotionCommand::rapid().at(point.x, point.y));
                            last_z = z;
                        }
                        MotionKind::LinkNotClear => {
                            let z = clearance;
                            if z != last_z {
                                program.push(MotionCommand::rapid().z(z));
                            }
                            program.push(MotionCommand::rapid().at(point.x, point.y));
                            last_z = z;
                        }
                    }
                }
            }

            // Retract clear of the stock before the next region.
            if last_z != clearance {
                program.push(MotionCommand::rapid().z(clearance));
                last_z = clearance;
            }
        }

        pass_start = pass_end;
        // And again once the pass is complete.
        if last_z != clearance {
            program.push(MotionCommand::rapid().z(clearance));
            last_z = clearance;
        }
    }

    program
}
