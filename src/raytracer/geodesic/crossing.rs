use crate::raytracer::disk::AccretionDisk;
use glam::{Vec2, Vec3};

/// In-plane point where the segment `from -> to` passes through z = 0, if
/// that point lies on the disk.
///
/// z = +0.0 and z = -0.0 both count as the upper side, so a segment has to
/// reach strictly negative z (or leave it) to register.
pub fn disk_crossing(from: Vec3, to: Vec3, disk: &AccretionDisk) -> Option<Vec2> {
    if (from.z < 0.0) == (to.z < 0.0) {
        return None;
    }
    let t = from.z / (from.z - to.z);
    let hit = from.truncate().lerp(to.truncate(), t);
    disk.contains(hit.length()).then_some(hit)
}
