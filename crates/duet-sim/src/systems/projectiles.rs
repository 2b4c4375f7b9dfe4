//! Projectile system: motion rules and lifetime expiry for active slots.

use hecs::{Entity, World};

use duet_core::components::Position;
use duet_core::types::{SimTime, Vec2};

use crate::projectile::{expired, step, Projectile};

/// Current positions of every live shooter, for boomerang returns.
fn shooter_positions(world: &World) -> Vec<(Entity, Vec2)> {
    let mut anchors: Vec<(Entity, Vec2)> = Vec::new();
    for (_, projectile) in world.query::<&Projectile>().iter() {
        let Some(shooter) = projectile.shooter.filter(|_| projectile.active) else {
            continue;
        };
        if anchors.iter().any(|(entity, _)| *entity == shooter) {
            continue;
        }
        if let Ok(position) = world.get::<&Position>(shooter) {
            anchors.push((shooter, position.0));
        }
    }
    anchors
}

/// Move every active projectile and park the ones that are done.
pub fn run(world: &mut World, time: &SimTime) {
    let anchors = shooter_positions(world);

    for (_entity, (projectile, position)) in world.query_mut::<(&mut Projectile, &mut Position)>() {
        if !projectile.active {
            continue;
        }
        let anchor = projectile.shooter.and_then(|shooter| {
            anchors
                .iter()
                .find(|(entity, _)| *entity == shooter)
                .map(|(_, at)| *at)
        });

        let returned = step(projectile, &mut position.0, time.dt, anchor);
        if returned || expired(projectile, time.now) {
            projectile.deactivate(position);
        }
    }
}
