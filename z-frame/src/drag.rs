use crate::{round_half, Angles, Geometry, Joint, Limits, Point};

/// Quantization of dragged angles in degrees.
pub const DRAG_QUANTUM: f64 = 0.5;

/// Map a dragged cursor into a new angle of the joint.
///
/// The bearing from the joint pivot to the cursor is quantized to
/// [`DRAG_QUANTUM`], converted into the joint's own frame, and clamped.
/// The middle link wraps to the nearer side of the 0/360 seam.
///
/// Return `None` if the angle stays the same.
pub fn drag_angle(
    joint: Joint,
    cursor: [f64; 2],
    geo: &Geometry,
    angles: &Angles,
    limits: &Limits,
) -> Option<f64> {
    let pose = geo.pose(angles);
    let bearing = pose.pivot(joint).bearing(&cursor);
    let deg = match joint {
        Joint::Middle => unwrap_near(round_half(bearing + 180.), angles.a1),
        Joint::SeatPan => angles.a1 - round_half(bearing),
        Joint::Backrest => angles.a1 - angles.a2 - round_half(bearing),
    };
    let deg = limits.clamp(joint, deg);
    (deg != angles[joint]).then_some(deg)
}

// Choose the shorter way across the seam
fn unwrap_near(deg: f64, prev: f64) -> f64 {
    let diff = deg - prev;
    if diff > 180. {
        deg - 360.
    } else if diff < -180. {
        deg + 360.
    } else {
        deg
    }
}
