use crate::raytracer::geodesic::{RayOutcome, SceneAccess, Termination};
use glam::Vec3;

/// Final pixel color for a finished ray.
///
/// The background is the sky along the final direction for escaped rays and
/// black otherwise (capped rays count as absorbed). A disk hit is composited
/// over that background as `alpha * disk + (1 - alpha) * background`, using
/// the first crossing only.
pub fn resolve_color<S: SceneAccess>(outcome: &RayOutcome, scene: &S) -> Vec3 {
    let background = match outcome.termination {
        Termination::Escaped => scene.sky_color(outcome.state.direction),
        Termination::Absorbed | Termination::Indeterminate => Vec3::ZERO,
    };

    let color = match outcome.disk_hit {
        Some(hit) => {
            let alpha = scene.disk().alpha;
            scene.disk_color(hit.x, hit.y) * alpha + background * (1.0 - alpha)
        }
        None => background,
    };

    color.clamp(Vec3::ZERO, Vec3::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raytracer::disk::blackbody_color;
    use crate::raytracer::geodesic::tests::TestScene;
    use crate::raytracer::geodesic::Method;
    use crate::raytracer::ray::RayState;
    use glam::Vec2;

    fn outcome(termination: Termination, disk_hit: Option<Vec2>, direction: Vec3) -> RayOutcome {
        RayOutcome {
            termination,
            disk_hit,
            disk_crossings: disk_hit.is_some() as u32,
            steps: 1,
            state: RayState::new(Vec3::new(20.0, 0.0, 0.0), direction),
            l_square: 0.0,
        }
    }

    #[test]
    fn absorbed_is_black() {
        let scene = TestScene::new();
        assert_eq!(resolve_color(&outcome(Termination::Absorbed, None, Vec3::X), &scene), Vec3::ZERO);
        assert_eq!(resolve_color(&outcome(Termination::Indeterminate, None, Vec3::X), &scene), Vec3::ZERO);
    }

    #[test]
    fn escaped_samples_sky_along_final_direction() {
        let scene = TestScene::new();
        let c = resolve_color(&outcome(Termination::Escaped, None, Vec3::Y * 3.0), &scene);
        assert_eq!(c, scene.sky_color(Vec3::Y));
    }

    #[test]
    fn disk_hit_alpha_blends_over_sky() {
        let mut scene = TestScene::new();
        scene.disk.alpha = 0.25;
        let hit = Some(Vec2::new(3.0, 0.0));
        let c = resolve_color(&outcome(Termination::Escaped, hit, Vec3::Z), &scene);
        let expected = blackbody_color(4500.0) * 0.25 + scene.sky_color(Vec3::Z) * 0.75;
        assert!((c - expected).length() < 1e-6);
    }

    #[test]
    fn opaque_disk_in_front_of_the_hole_stays_visible() {
        let scene = TestScene::new();
        let hit = Some(Vec2::new(3.0, 0.0));
        let c = resolve_color(&outcome(Termination::Absorbed, hit, Vec3::Z), &scene);
        assert_eq!(c, blackbody_color(4500.0));
    }

    #[test]
    fn traced_disk_ray_differs_from_sky_by_blend() {
        let mut scene = TestScene::new();
        scene.disk.alpha = 0.5;
        scene.law.coefficient = 0.0;
        let dir = Vec3::new(0.0, 0.0, -1.0);
        let start = RayState::new(Vec3::new(4.0, 0.0, 3.0), dir);
        let traced = Method::Rk4.trace(start, &scene, 0.01, 100_000);
        let c = resolve_color(&traced, &scene);
        let sky = scene.sky_color(dir);
        let expected = blackbody_color(4500.0) * 0.5 + sky * 0.5;
        assert!((c - expected).length() < 1e-5);
        assert!((c - sky).length() > 1e-3);
    }

    #[test]
    fn output_is_clamped() {
        let mut scene = TestScene::new();
        scene.disk.alpha = 1.0;
        let c = resolve_color(&outcome(Termination::Escaped, Some(Vec2::new(3.0, 0.0)), Vec3::X), &scene);
        assert!(c.min_element() >= 0.0 && c.max_element() <= 1.0);
    }
}
