//! Frame placement: from the canonical frame into the assembly.
//!
//! Programs are authored in a canonical frame — origin at the feature
//! center, feature normal along +Z, feature direction along +Y. Placement
//! backfills every command's coordinates, then rigidly transforms them
//! into the feature's real position and orientation. Either the whole
//! program is transformed or none of it is; a program never leaves this
//! stage with mixed canonical and world coordinates.

use timbercam_math::{Point3, Transform, Vec3};

use crate::error::{AdaptiveError, Result};
use crate::motion::{MotionCommand, MotionProgram};

/// Where and how a feature face sits in the assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Feature position.
    pub position: Point3,
    /// Feature face normal. Not required to be unit length.
    pub normal: Vec3,
    /// Feature direction (the slot's long axis). Not required to be unit
    /// length.
    pub direction: Vec3,
}

impl Frame {
    /// The canonical authoring frame: origin, normal +Z, direction +Y.
    pub fn canonical() -> Self {
        Self {
            position: Point3::origin(),
            normal: Vec3::z(),
            direction: Vec3::y(),
        }
    }

    /// Create a frame from position, normal and direction.
    pub fn new(position: Point3, normal: Vec3, direction: Vec3) -> Self {
        Self {
            position,
            normal,
            direction,
        }
    }

    /// The rigid transform carrying the canonical frame onto this one:
    /// direction alignment, then normal alignment, then translation.
    ///
    /// Fails when the normal or direction degenerates to zero length —
    /// there is no partial placement.
    pub fn placement(&self) -> Result<Transform> {
        if self.normal.norm() < 1e-12 {
            return Err(AdaptiveError::ZeroLengthNormal);
        }
        if self.direction.norm() < 1e-12 {
            return Err(AdaptiveError::ZeroLengthDirection);
        }
        let rotate_normal = Transform::rotation_between(&Vec3::z(), &self.normal);
        let rotate_direction = Transform::rotation_between(&Vec3::y(), &self.direction);
        let translate =
            Transform::translation(self.position.x, self.position.y, self.position.z);
        Ok(translate.then(&rotate_normal).then(&rotate_direction))
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Rotary-axis angles derived from a tool normal, in degrees.
///
/// A fixed-convention heuristic for an AC rotary pair — not a general
/// 5-axis kinematic solve, and reachability is not validated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolOrientation {
    /// Rotation about X.
    pub a: f64,
    /// Rotation about Y.
    pub b: f64,
    /// Rotation about Z.
    pub c: f64,
}

/// Compute rotary angles aligning the tool with `normal`.
pub fn tool_orientation(normal: &Vec3) -> ToolOrientation {
    ToolOrientation {
        a: normal.y.atan2(-normal.z).to_degrees(),
        b: normal.x.atan2(-normal.z).to_degrees(),
        c: normal.y.atan2(normal.x).to_degrees(),
    }
}

/// Make every command's X, Y and Z explicit.
///
/// Axes omitted by a command carry forward from the most recent command
/// that set them, each axis independently; before an axis first appears it
/// reads as the canonical origin value 0.
pub fn complete_coordinates(program: &mut MotionProgram) {
    let mut x = 0.0;
    let mut y = 0.0;
    let mut z = 0.0;
    for command in &mut program.commands {
        match command.x {
            Some(value) => x = value,
            None => command.x = Some(x),
        }
        match command.y {
            Some(value) => y = value,
            None => command.y = Some(y),
        }
        match command.z {
            Some(value) => z = value,
            None => command.z = Some(z),
        }
    }
}

/// Place a canonical-frame program into the target frame, in place.
///
/// Completes coordinates first, then applies the frame's rigid transform
/// to every command position. Order, verbs, feeds and comments are
/// untouched. The frame is validated before anything is mutated.
pub fn place(program: &mut MotionProgram, frame: &Frame) -> Result<()> {
    let placement = frame.placement()?;
    complete_coordinates(program);
    for command in &mut program.commands {
        if let Some((x, y, z)) = command.position() {
            let placed = placement.apply_point(&Point3::new(x, y, z));
            command.x = Some(placed.x);
            command.y = Some(placed.y);
            command.z = Some(placed.z);
        }
    }
    Ok(())
}

/// Place a program and prepend a single AC orientation command.
///
/// Optional extension for machines with an AC rotary pair; plain
/// [`place`] emits no orientation.
pub fn place_with_orientation(
    program: &mut MotionProgram,
    frame: &Frame,
) -> Result<ToolOrientation> {
    place(program, frame)?;
    let orientation = tool_orientation(&frame.normal);
    program.commands.insert(
        0,
        MotionCommand::rapid()
            .orient(orientation.a, orientation.c)
            .commented("tool orientation"),
    );
    Ok(orientation)
}
