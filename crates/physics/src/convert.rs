//! glam <-> nalgebra conversions at the rapier boundary.

use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, Translation3, UnitQuaternion};
use rapier3d::prelude::*;

pub(crate) fn vec_to_na(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

pub(crate) fn vec_from_na(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub(crate) fn point_to_na(v: Vec3) -> Point<Real> {
    point![v.x, v.y, v.z]
}

pub(crate) fn quat_to_na(q: Quat) -> UnitQuaternion<Real> {
    // nalgebra's Quaternion constructor takes the scalar part first.
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

pub(crate) fn quat_from_na(r: &UnitQuaternion<Real>) -> Quat {
    Quat::from_xyzw(r.i, r.j, r.k, r.w)
}

pub(crate) fn isometry(position: Vec3, rotation: Quat) -> Isometry<Real> {
    Isometry::from_parts(Translation3::from(vec_to_na(position)), quat_to_na(rotation))
}
