use cgmath::Vector2;

use crate::game::frame::Frame;

/// Cubic Hermite interpolation between two poses, per joint per axis.
/// Tangents at both ends are `(b - a) * 0.5`, which gives an
/// ease-in/ease-out curve with zero velocity at the endpoints. `t` is
/// not clamped; callers pass t in [0,1].
pub fn hermite(a: &Frame, b: &Frame, t: f32) -> Frame {
    let h00 = 2. * t * t * t - 3. * t * t + 1.;
    let h10 = t * t * t - 2. * t * t + t;
    let h01 = -2. * t * t * t + 3. * t * t;
    let h11 = t * t * t - t * t;

    let mut out = Frame::default();
    for (joint, p0) in a.joints() {
        let p1 = b.get(joint).unwrap_or(p0);
        let tangent = (p1 - p0) * 0.5;
        out.set(joint, p0 * h00 + tangent * h10 + p1 * h01 + tangent * h11);
    }
    out
}

/// Straight per-joint lerp, used for walk/run gait blending and for
/// cross-fading standing vs crouching streams.
pub fn linear(a: &Frame, b: &Frame, w: f32) -> Frame {
    let mut out = Frame::default();
    for (joint, p0) in a.joints() {
        let p1 = b.get(joint).unwrap_or(p0);
        out.set(joint, p0 * (1. - w) + p1 * w);
    }
    out
}

/// Mirrors a pose across the horizontal midline (x -> 1 - x).
pub fn mirror(frame: &Frame) -> Frame {
    let mut out = Frame::default();
    for (joint, p) in frame.joints() {
        out.set(joint, Vector2::new(1. - p.x, p.y));
    }
    out
}
