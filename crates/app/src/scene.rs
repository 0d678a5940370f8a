//! Demo road scene for the headless runner.

use bevy::prelude::*;

use simulation::path_curve::PathCurve;
use simulation::road::RoadBlueprint;

/// Two roads: a winding Bezier route and a straight avenue beside it.
pub fn build_demo_scene(world: &mut World) {
    let winding = PathCurve::bezier_chain(&[
        [
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -300.0),
            Vec3::new(400.0, 0.0, -300.0),
            Vec3::new(400.0, 0.0, -600.0),
        ],
        [
            Vec3::new(400.0, 0.0, -600.0),
            Vec3::new(400.0, 0.0, -900.0),
            Vec3::new(0.0, 0.0, -900.0),
            Vec3::new(0.0, 0.0, -1200.0),
        ],
    ]);
    let winding_length = winding.length();
    let winding_road = RoadBlueprint::new(winding).with_pool_size(6).spawn(world);

    let avenue = PathCurve::straight(Vec3::new(-60.0, 0.0, 0.0), Vec3::new(-60.0, 0.0, -1500.0));
    let avenue_road = RoadBlueprint::new(avenue)
        .with_anchor(Vec3::new(-60.0, 0.0, -20.0))
        .with_pool_size(4)
        .spawn(world);

    info!(
        "demo scene: winding road {winding_road:?} ({winding_length:.0} units, 6 vehicles), \
         avenue {avenue_road:?} (1500 units, 4 vehicles)"
    );
}
