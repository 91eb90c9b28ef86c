//! Conversions between Bevy's glam types and the nalgebra types used by `wallrun`.

use bevy::prelude::{Quat, Vec3};
use nalgebra as na;

#[inline]
pub fn to_bevy_vec(v: wallrun::Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub fn to_na_vec(v: Vec3) -> wallrun::Vec3 {
    wallrun::Vec3::new(v.x, v.y, v.z)
}

#[inline]
pub fn to_bevy_quat(q: wallrun::Quat) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

#[inline]
pub fn to_na_quat(q: Quat) -> wallrun::Quat {
    wallrun::Quat::new_normalize(na::Quaternion::new(q.w, q.x, q.y, q.z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotations_agree_on_the_facing_axis() {
        let bevy_q = Quat::from_rotation_y(0.7);
        let na_q = to_na_quat(bevy_q);

        let bevy_forward = bevy_q * Vec3::NEG_Z;
        let na_forward = to_bevy_vec(na_q * wallrun::Vec3::new(0.0, 0.0, -1.0));
        assert!(bevy_forward.distance(na_forward) < 1.0e-5);
        assert!(to_bevy_quat(na_q).angle_between(bevy_q) < 1.0e-4);
    }
}
