use nalgebra as na;

use crate::{
    constants::{DIST_EPS, FRAME_DEGENERACY_EPS},
    types::{Quat, Vec3, WallRunSide},
};

/// Target orientation of a wall-running character.
#[derive(Clone, Copy, Debug)]
pub struct WallRunFrame {
    /// Direction of travel; always lies in the wall plane.
    pub forward: Vec3,
    /// The character's right axis: points away from the wall for a left-side run and into it for
    /// a right-side run.
    pub lateral: Vec3,
    /// Rotation mapping local -Z to `forward` and local +X to `lateral`.
    pub rotation: Quat,
}

impl WallRunFrame {
    /// Solve the frame for a run on `side` of a wall with normal `wall_normal`.
    ///
    /// - lateral = normal (left) or -normal (right)
    /// - forward = normalize(up x lateral); with -Z forward and +X right this is the travel
    ///   direction that keeps the wall on `side`
    ///
    /// Returns `None` for [`WallRunSide::None`], a zero normal, or a normal (nearly) parallel to
    /// `up`.
    pub fn solve(side: WallRunSide, wall_normal: Vec3, up: Vec3) -> Option<Self> {
        let normal = wall_normal.try_normalize(DIST_EPS)?;
        let lateral = match side {
            WallRunSide::None => return None,
            WallRunSide::Left => normal,
            WallRunSide::Right => -normal,
        };

        let forward = up.cross(&lateral).try_normalize(FRAME_DEGENERACY_EPS)?;

        // forward and lateral are orthogonal by construction; the remaining axis completes a
        // right-handed basis (x = right, y = up, z = back).
        let back = -forward;
        let frame_up = back.cross(&lateral);
        let basis = na::Rotation3::from_basis_unchecked(&[lateral, frame_up, back]);

        Some(Self {
            forward,
            lateral,
            rotation: Quat::from_rotation_matrix(&basis),
        })
    }
}

/// Rotate `current` toward `target` by `clamp(dt * speed, 0, 1)` of the remaining angle.
///
/// A non-positive `speed` snaps to the target.
#[inline]
pub fn interp_rotation_to(current: Quat, target: Quat, dt_seconds: f32, speed: f32) -> Quat {
    if speed <= 0.0 {
        return target;
    }

    let alpha = (dt_seconds.max(0.0) * speed).clamp(0.0, 1.0);
    current.try_slerp(&target, alpha, 1.0e-6).unwrap_or(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_normals() -> Vec<Vec3> {
        let mut normals = Vec::new();
        for yaw_step in 0..12 {
            for tilt in [-0.6f32, -0.25, 0.0, 0.3, 0.7] {
                let yaw = yaw_step as f32 * std::f32::consts::TAU / 12.0;
                normals.push(Vec3::new(yaw.cos(), tilt, yaw.sin()));
            }
        }
        normals
    }

    #[test]
    fn forward_lies_in_the_wall_plane() {
        let up = Vec3::y();
        for normal in sample_normals() {
            for side in [WallRunSide::Left, WallRunSide::Right] {
                let frame = WallRunFrame::solve(side, normal, up).unwrap();
                let n = normal.normalize();

                assert!(frame.forward.dot(&n).abs() < 1.0e-5, "{normal:?} {side:?}");
                assert!((frame.forward.norm() - 1.0).abs() < 1.0e-5);
            }
        }
    }

    #[test]
    fn rotation_matches_frame_axes() {
        let up = Vec3::y();
        for normal in sample_normals() {
            for side in [WallRunSide::Left, WallRunSide::Right] {
                let frame = WallRunFrame::solve(side, normal, up).unwrap();
                let forward = frame.rotation * Vec3::new(0.0, 0.0, -1.0);
                let right = frame.rotation * Vec3::x();

                assert!((forward - frame.forward).norm() < 1.0e-4);
                assert!((right - frame.lateral).norm() < 1.0e-4);
            }
        }
    }

    #[test]
    fn left_side_keeps_wall_on_the_left() {
        // Wall at -X facing +X, character should run along -Z with +X to its right.
        let frame = WallRunFrame::solve(WallRunSide::Left, Vec3::x(), Vec3::y()).unwrap();
        assert!((frame.forward - Vec3::new(0.0, 0.0, -1.0)).norm() < 1.0e-6);
        assert!(frame.rotation.angle() < 1.0e-4);

        let toward_wall = WallRunSide::Left
            .toward_wall(frame.rotation * Vec3::x())
            .unwrap();
        assert!(toward_wall.dot(&Vec3::x()) < 0.0);
    }

    #[test]
    fn right_side_runs_the_other_way() {
        let left = WallRunFrame::solve(WallRunSide::Left, Vec3::x(), Vec3::y()).unwrap();
        let right = WallRunFrame::solve(WallRunSide::Right, Vec3::x(), Vec3::y()).unwrap();
        assert!((left.forward + right.forward).norm() < 1.0e-6);
    }

    #[test]
    fn degenerate_normals_have_no_frame() {
        let up = Vec3::y();
        assert!(WallRunFrame::solve(WallRunSide::Left, Vec3::y(), up).is_none());
        assert!(WallRunFrame::solve(WallRunSide::Right, -Vec3::y(), up).is_none());
        assert!(WallRunFrame::solve(WallRunSide::Left, Vec3::zeros(), up).is_none());
        assert!(WallRunFrame::solve(WallRunSide::None, Vec3::x(), up).is_none());
    }

    #[test]
    fn interp_moves_a_fraction_of_the_angle() {
        let current = Quat::identity();
        let target = Quat::from_axis_angle(&na::Vector3::y_axis(), 1.0);

        let half = interp_rotation_to(current, target, 0.1, 5.0);
        assert!((half.angle() - 0.5).abs() < 1.0e-4);

        let clamped = interp_rotation_to(current, target, 1.0, 5.0);
        assert!(clamped.angle_to(&target) < 1.0e-4);

        let snapped = interp_rotation_to(current, target, 0.01, 0.0);
        assert!(snapped.angle_to(&target) < 1.0e-6);
    }
}
