//! Ship Tests - Power, Damage Flow and Saved Ships
//!
//! Drives ships through the [`ShipWorld`] the way a game loop would:
//! collisions reported by the physics backend become block damage, and the
//! resulting fragments appear as ships of their own after the step.

use glam::DVec2;
use hullsmith_engine::game::{
    BlockId, BlockStructure, GameConfig, PolygonBlock, PowerKey, PowerSupply, ShipControls,
    ShipData, ShipId, ShipPreset, ShipWorld,
};
use hullsmith_engine::physics::{BodyState, CollisionReport, PhysicsBackend, SimplePhysics};

fn world() -> ShipWorld<SimplePhysics> {
    ShipWorld::new(SimplePhysics::new(), GameConfig::default())
}

/// Plus sign of five quads: 0 in the middle, arms right, up, left, down.
fn cross(side: f64) -> BlockStructure {
    let mut s = BlockStructure::new(PolygonBlock::quad(side));
    for (edge, opposite) in [(1, 3), (2, 0), (3, 1), (0, 2)] {
        s.attach((BlockId(0), edge), PolygonBlock::quad(side), opposite)
            .unwrap();
    }
    s
}

fn hit(world: &mut ShipWorld<SimplePhysics>, ship: ShipId, tag: u64) {
    let body = world.ship(ship).unwrap().body();
    world.physics_mut().inject_collision(CollisionReport {
        body,
        tag,
        damage: 1,
    });
}

// ============================================================================
// Power Supply
// ============================================================================

#[test]
fn test_power_stays_within_capacity() {
    let mut psu = PowerSupply::new(300.0);
    psu.set_production(PowerKey::named("reactor"), 120.0);
    psu.set_consumption(PowerKey::Thrust, 80.0);
    psu.set_consumption(PowerKey::Turning, 200.0);
    for step in 0..500 {
        let dt = 0.005 + (step % 7) as f64 * 0.01;
        let report = psu.tick(dt);
        assert!(psu.power() >= 0.0);
        assert!(psu.power() <= psu.max_storage());
        assert!(report.consumed <= report.produced + 300.0 + 1e-9);
    }
}

#[test]
fn test_starved_consumer_is_skipped_not_partially_charged() {
    let mut psu = PowerSupply::new(100.0);
    psu.set_power(10.0);
    psu.set_consumption(PowerKey::Thrust, 1000.0);
    psu.set_consumption(PowerKey::Brakes, 100.0);
    let report = psu.tick(0.05);
    // Thrust wanted 50 and got nothing; brakes still took their 5
    assert_eq!(report.starved, vec![PowerKey::Thrust]);
    assert!((report.consumed - 5.0).abs() < 1e-9);
    assert!((psu.power() - 5.0).abs() < 1e-9);
}

// ============================================================================
// Damage Flow
// ============================================================================

#[test]
fn test_shooting_the_core_scatters_the_arms() {
    let mut w = world();
    let state = BodyState {
        velocity: DVec2::new(2.0, 0.0),
        ..BodyState::default()
    };
    let id = w.spawn_ship(cross(1.0), state).unwrap();
    hit(&mut w, id, 0);
    w.fixed_tick(0.01);

    assert!(w.ship(id).is_none());
    assert_eq!(w.ship_count(), 4);
    assert_eq!(w.physics().body_count(), 4);

    let mut positions: Vec<DVec2> = w
        .ship_ids()
        .into_iter()
        .map(|ship| {
            let state = w.body_state(ship).unwrap();
            assert!((state.velocity - DVec2::new(2.0, 0.0)).length() < 1e-6);
            assert_eq!(w.ship(ship).unwrap().structure().len(), 1);
            state.position
        })
        .collect();
    positions.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));

    // Everything drifted for one step before the split
    let drift = DVec2::new(0.02, 0.0);
    let expected = [
        DVec2::new(-1.0, 0.0),
        DVec2::new(0.0, -1.0),
        DVec2::new(0.0, 1.0),
        DVec2::new(1.0, 0.0),
    ];
    for (p, e) in positions.iter().zip(expected) {
        assert!((*p - (e + drift)).length() < 1e-6, "{p} vs {e}");
    }
}

#[test]
fn test_shooting_an_arm_keeps_the_hull() {
    let mut w = world();
    let id = w.spawn_ship(cross(1.0), BodyState::default()).unwrap();
    hit(&mut w, id, 3);
    w.fixed_tick(0.01);

    assert_eq!(w.ship_count(), 1);
    let ship = w.ship(id).unwrap();
    assert_eq!(ship.structure().len(), 4);
    assert!(ship.structure().is_consistent());
    // The hull re-centred on its remaining blocks
    assert!(ship.structure().centroid().length() < 1e-9);
    let state = w.body_state(id).unwrap();
    assert!((state.position - DVec2::new(0.25, 0.0)).length() < 1e-6);
}

#[test]
fn test_preset_breaks_apart_under_fire() {
    let mut w = world();
    let id = w
        .spawn_preset(ShipPreset::Long, BodyState::default(), 1)
        .unwrap();
    let blocks = w.ship(id).unwrap().structure().len();

    // Peel the hull down to its cockpit; every block hit once with 3 hp
    // goes after three hits
    for tag in (1..blocks as u64).rev() {
        for _ in 0..3 {
            if !w.ship(id).is_some_and(|s| s.structure().contains(BlockId(tag))) {
                break;
            }
            hit(&mut w, id, tag);
            w.fixed_tick(0.01);
        }
    }
    let total: usize = w.ships().map(|(_, s)| s.structure().len()).sum();
    assert_eq!(w.ship(id).map(|s| s.structure().len()), Some(1));
    assert!(total < blocks);
    assert!(w.ships().all(|(_, s)| s.structure().is_consistent()));
    assert_eq!(w.physics().body_count(), w.ship_count());
}

// ============================================================================
// Controls and Saved Ships
// ============================================================================

#[test]
fn test_thrusting_ship_accelerates_forward() {
    let mut w = world();
    let id = w
        .spawn_preset(ShipPreset::Big, BodyState::default(), 1)
        .unwrap();
    w.set_controls(
        id,
        ShipControls {
            thrust: true,
            ..ShipControls::idle()
        },
    );
    for _ in 0..10 {
        w.fixed_tick(0.01);
    }
    let state = w.body_state(id).unwrap();
    assert!(state.velocity.x > 0.0);
    assert!(state.velocity.y.abs() < 1e-9);
    assert!(w.ship(id).unwrap().psu().consumption(&PowerKey::Thrust) > 0.0);
}

#[test]
fn test_saved_ship_loads_with_same_mass() {
    let mut w = world();
    let id = w
        .spawn_preset(ShipPreset::Wide, BodyState::default(), 1)
        .unwrap();
    let data = w.ship(id).unwrap().dump_data();
    let json = data.to_json_string().unwrap();
    let reloaded = ShipData::from_json_str(&json).unwrap();

    let at = BodyState::at(DVec2::new(100.0, 50.0), 0.0);
    let copy = w.load_ship(&reloaded, at).unwrap();
    let (a, b) = (w.ship(id).unwrap(), w.ship(copy).unwrap());
    assert!((a.mass() - b.mass()).abs() < 1e-9 * a.mass());
    assert!((a.moment() - b.moment()).abs() < 1e-9 * a.moment());
    assert_eq!(
        a.structure().extract_connections(),
        b.structure().extract_connections()
    );
    assert_eq!(a.thrust_power(), b.thrust_power());

    let body = b.body();
    let state = w.physics().body_state(body).unwrap();
    assert!((state.position - DVec2::new(100.0, 50.0)).length() < 1e-6);
}
