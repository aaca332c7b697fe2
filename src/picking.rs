//! Ray/box intersection used for cube picking.
//!
//! The camera supplies the world-space ray (`Camera3d::unproject` already
//! handles the screen-to-device coordinate flip); this module answers which
//! box that ray hits first. The wave cubes never rotate and are scaled only
//! along Y, so an axis-aligned box is their exact hit volume and a slab test
//! is all the intersection machinery the scene needs.

use glamx::Vec3;

/// World-space ray. The direction does not need to be normalized; times of
/// impact are expressed in units of its length, which is consistent within
/// one query.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Ray {
        Ray { origin, dir }
    }
}

/// Axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub mins: Vec3,
    pub maxs: Vec3,
}

impl Aabb {
    /// Box centered at `center` extending `half_extents` along each axis.
    pub fn from_half_extents(center: Vec3, half_extents: Vec3) -> Aabb {
        Aabb {
            mins: center - half_extents,
            maxs: center + half_extents,
        }
    }

    /// Time of impact of `ray` on this box, or `None` when the ray misses
    /// or the box lies entirely behind the origin. A ray starting inside
    /// the box reports an impact at time zero.
    pub fn cast_ray(&self, ray: &Ray) -> Option<f32> {
        let origin = ray.origin.to_array();
        let dir = ray.dir.to_array();
        let mins = self.mins.to_array();
        let maxs = self.maxs.to_array();

        let mut t_enter = 0.0f32;
        let mut t_exit = f32::INFINITY;
        for axis in 0..3 {
            if dir[axis].abs() <= f32::EPSILON {
                // Parallel to this slab: the origin must already lie
                // between the two planes.
                if origin[axis] < mins[axis] || origin[axis] > maxs[axis] {
                    return None;
                }
            } else {
                let inv = 1.0 / dir[axis];
                let mut t0 = (mins[axis] - origin[axis]) * inv;
                let mut t1 = (maxs[axis] - origin[axis]) * inv;
                if t0 > t1 {
                    std::mem::swap(&mut t0, &mut t1);
                }
                t_enter = t_enter.max(t0);
                t_exit = t_exit.min(t1);
                if t_enter > t_exit {
                    return None;
                }
            }
        }
        Some(t_enter)
    }
}

/// Index and time of impact of the box hit first by `ray`, scanning the
/// whole slice. Ties go to the lower index.
pub fn pick_nearest(ray: &Ray, boxes: &[Aabb]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (index, aabb) in boxes.iter().enumerate() {
        if let Some(toi) = aabb.cast_ray(ray) {
            if best.map_or(true, |(_, t)| toi < t) {
                best = Some((index, toi));
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box_at(center: Vec3) -> Aabb {
        Aabb::from_half_extents(center, Vec3::splat(0.5))
    }

    #[test]
    fn head_on_hit_reports_the_near_face() {
        let aabb = unit_box_at(Vec3::ZERO);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let toi = aabb.cast_ray(&ray).unwrap();
        assert!((toi - 4.5).abs() < 1e-6);
    }

    #[test]
    fn ray_starting_inside_hits_at_zero() {
        let aabb = unit_box_at(Vec3::ZERO);
        let ray = Ray::new(Vec3::new(0.1, -0.2, 0.0), Vec3::new(0.3, 0.9, 0.1));
        assert_eq!(aabb.cast_ray(&ray), Some(0.0));
    }

    #[test]
    fn box_behind_the_origin_is_not_hit() {
        let aabb = unit_box_at(Vec3::new(0.0, 0.0, 5.0));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(aabb.cast_ray(&ray), None);
    }

    #[test]
    fn parallel_ray_outside_the_slab_misses() {
        let aabb = unit_box_at(Vec3::ZERO);
        // Runs along Z but two units above the box.
        let ray = Ray::new(Vec3::new(0.0, 2.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(aabb.cast_ray(&ray), None);
    }

    #[test]
    fn parallel_ray_inside_the_slab_hits() {
        let aabb = unit_box_at(Vec3::ZERO);
        let ray = Ray::new(Vec3::new(0.25, 0.25, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(aabb.cast_ray(&ray).is_some());
    }

    #[test]
    fn diagonal_hit_and_near_miss() {
        let aabb = unit_box_at(Vec3::new(3.0, 3.0, 3.0));
        let hit = Ray::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 1.0));
        assert!(aabb.cast_ray(&hit).is_some());
        let miss = Ray::new(Vec3::ZERO, Vec3::new(1.0, 1.0, -1.0));
        assert_eq!(aabb.cast_ray(&miss), None);
    }

    #[test]
    fn taller_boxes_catch_rays_that_short_ones_miss() {
        let short = Aabb::from_half_extents(Vec3::ZERO, Vec3::new(0.25, 0.3, 0.25));
        let tall = Aabb::from_half_extents(Vec3::ZERO, Vec3::new(0.25, 0.7, 0.25));
        // Passes half a unit above the center.
        let ray = Ray::new(Vec3::new(0.0, 0.5, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(short.cast_ray(&ray), None);
        assert!(tall.cast_ray(&ray).is_some());
    }

    #[test]
    fn nearest_box_wins() {
        let row: Vec<Aabb> = (0..5)
            .map(|i| unit_box_at(Vec3::new(0.0, 0.0, -2.0 * i as f32)))
            .collect();
        // Shooting down -Z from between boxes 1 and 2: boxes 2..5 are ahead,
        // box 2 is nearest.
        let ray = Ray::new(Vec3::new(0.0, 0.0, -3.0), Vec3::new(0.0, 0.0, -1.0));
        let (index, toi) = pick_nearest(&ray, &row).unwrap();
        assert_eq!(index, 2);
        assert!((toi - 0.5).abs() < 1e-6);
    }

    #[test]
    fn only_the_boxes_in_the_slice_are_considered() {
        let row = [unit_box_at(Vec3::new(-4.0, 0.0, 0.0))];
        // Would squarely hit a box at the origin, but none is listed.
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(pick_nearest(&ray, &row), None);
        assert_eq!(pick_nearest(&ray, &[]), None);
    }

    #[test]
    fn equal_distances_resolve_to_the_lower_index() {
        let pair = [
            unit_box_at(Vec3::new(-0.2, 0.0, 0.0)),
            unit_box_at(Vec3::new(0.2, 0.0, 0.0)),
        ];
        // Overlapping boxes, same near plane along the ray.
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let (index, _) = pick_nearest(&ray, &pair).unwrap();
        assert_eq!(index, 0);
    }
}
