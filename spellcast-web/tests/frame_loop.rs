//! Whole-frame scenarios: landmarks in, effect events out

mod common;

use std::time::Duration;

use common::*;
use spellcast_web::config::{BossConfig, GameConfig};
use spellcast_web::effects::{ComboKind, EffectEvent, ParticleOwner, RemovalReason};
use spellcast_web::gesture::{Gesture, HandSlot};
use spellcast_web::spell::ProjectileKind;
use spellcast_web::world::World;

/// Fist, then Victory: fire charges on the first hand
fn charge_fire(driver: &mut Driver) {
    driver.run(&one(posed(Gesture::Fist, 0.5, 0.6)), 3);
    driver.run(&one(posed(Gesture::Victory, 0.5, 0.6)), 10);
}

#[test]
fn test_fire_cast_hits_boss() {
    let mut driver = Driver::new(World::default());
    charge_fire(&mut driver);

    let fire = driver.world.hand(HandSlot::First).slot(ProjectileKind::Fire);
    assert!(fire.and_then(|slot| slot.projectile()).is_some());
    assert!(!driver.world.particles().is_empty());

    let hit = driver.run_until(&one(posed(Gesture::OpenPalm, 0.5, 0.6)), 400, |e| {
        matches!(e, EffectEvent::BossHit { kind: ProjectileKind::Fire, .. })
    });
    assert!(hit);

    let health = driver.world.boss().map(|b| b.health()).unwrap();
    assert!((85..=95).contains(&health));
    assert_eq!(
        driver.count(|e| matches!(e, EffectEvent::ProjectileRemoved { reason: RemovalReason::Hit, .. })),
        1
    );
    assert_eq!(driver.world.damage_texts().len(), 1);
    assert!(driver.world.in_flight().is_empty());
}

#[test]
fn test_merge_through_world() {
    let mut driver = Driver::new(World::default());
    driver.run(&one(posed(Gesture::Fist, 0.5, 0.6)), 2);
    driver.run(&one(posed(Gesture::FingerOne, 0.5, 0.6)), 2);
    driver.run(&one(posed(Gesture::Victory, 0.5, 0.6)), 3);

    let spawned_lightning = driver.count(|e| {
        matches!(e, EffectEvent::ProjectileSpawned { kind: ProjectileKind::Lightning, .. })
    });
    assert_eq!(spawned_lightning, 1);
    assert_eq!(
        driver.count(|e| matches!(e, EffectEvent::ProjectileRemoved { reason: RemovalReason::Merged, .. })),
        2
    );

    let hand = driver.world.hand(HandSlot::First);
    let kinds: Vec<_> = hand.projectiles().map(|p| p.kind).collect();
    assert_eq!(kinds, vec![ProjectileKind::Lightning]);
    assert!(hand.is_consistent());
}

#[test]
fn test_dropped_ball_takes_its_particles() {
    let mut driver = Driver::new(World::default());
    let left = with_thumb(posed(Gesture::Fist, 0.40, 0.6), 0.445, 0.62);
    let right = with_thumb(posed(Gesture::Fist, 0.60, 0.6), 0.555, 0.62);
    driver.run(&two(left, right), 10);

    let id = driver
        .events
        .iter()
        .find_map(|e| match e {
            EffectEvent::AuroraBallFormed { id, .. } => Some(*id),
            _ => None,
        })
        .unwrap();
    assert!(driver.world.aurora_ball().is_held());
    assert!(driver.world.particles().count_owned(ParticleOwner::Projectile(id)) > 0);

    // Second hand leaves tracking
    driver.step(&one(left));
    assert!(!driver.world.aurora_ball().is_held());
    assert_eq!(driver.world.particles().count_owned(ParticleOwner::Projectile(id)), 0);
    assert!(driver.events.contains(&EffectEvent::AuroraBallDropped { id }));
    assert!(driver.events.contains(&EffectEvent::ProjectileRemoved {
        id,
        kind: ProjectileKind::Aurora,
        reason: RemovalReason::Abandoned,
    }));
}

#[test]
fn test_ball_pauses_casting() {
    let mut driver = Driver::new(World::default());
    let left = with_thumb(posed(Gesture::Fist, 0.40, 0.6), 0.445, 0.62);
    let right = with_thumb(posed(Gesture::Fist, 0.60, 0.6), 0.555, 0.62);
    driver.run(&two(left, right), 5);
    assert!(driver.world.casting_suppressed());

    let victory = with_thumb(posed(Gesture::Victory, 0.40, 0.6), 0.445, 0.62);
    driver.run(&two(victory, right), 5);
    assert!(driver.world.aurora_ball().is_held());
    assert_eq!(driver.world.hand(HandSlot::First).projectiles().count(), 0);
}

/// Thumbs touching, index fingers apart
fn blink_hands() -> spellcast_web::gesture::HandsInput {
    let left = with_index(with_thumb(unposed(0.35, 0.6), 0.49, 0.62), 0.2, 0.7);
    let right = with_index(with_thumb(unposed(0.65, 0.6), 0.51, 0.62), 0.8, 0.7);
    two(left, right)
}

#[test]
fn test_blink_moves_camera() {
    let mut driver = Driver::new(World::default());
    let start = driver.world.camera().eye;

    let done = driver.run_until(&blink_hands(), 60, |e| {
        matches!(e, EffectEvent::BlinkTeleport { .. } | EffectEvent::BlinkFizzled)
    });
    assert!(done);
    assert!(driver.events.contains(&EffectEvent::ComboArmed { combo: ComboKind::Blink }));

    let landed = driver.events.iter().find_map(|e| match e {
        EffectEvent::BlinkTeleport { to, .. } => Some(*to),
        _ => None,
    });
    let to = landed.unwrap();
    let eye = driver.world.camera().eye;
    assert_eq!(to, [eye.x, eye.y, eye.z]);
    assert!((eye - start).norm() > 0.1);
    assert!(driver.world.is_blink_flashing());
    assert!(driver.world.combos().blink_cooldown(driver.world.clock()) > Duration::ZERO);
}

#[test]
fn test_blink_hold_blocks_aurora() {
    let mut driver = Driver::new(World::default());
    // Thumbs and index tips all within reach of each other
    let left = with_index(with_thumb(unposed(0.45, 0.6), 0.49, 0.62), 0.52, 0.68);
    let right = with_index(with_thumb(unposed(0.55, 0.6), 0.51, 0.62), 0.48, 0.68);
    let input = two(left, right);

    let done = driver.run_until(&input, 60, |e| {
        matches!(e, EffectEvent::BlinkTeleport { .. } | EffectEvent::BlinkFizzled)
    });
    assert!(done);
    assert_eq!(
        driver.count(|e| *e == EffectEvent::ComboArmed { combo: ComboKind::Aurora }),
        0
    );
    assert_eq!(driver.count(|e| matches!(e, EffectEvent::AuroraBurst { .. })), 0);
}

#[test]
fn test_boss_defeated_once() {
    let config = GameConfig {
        boss: BossConfig {
            max_health: 5,
            ..BossConfig::default()
        },
        ..GameConfig::default()
    };
    let mut driver = Driver::new(World::new(config));

    charge_fire(&mut driver);
    let hit = driver.run_until(&one(posed(Gesture::OpenPalm, 0.5, 0.6)), 400, |e| {
        matches!(e, EffectEvent::BossDefeated { .. })
    });
    assert!(hit);
    assert!(driver.world.boss().is_none());
    assert!(driver.world.is_shaking());
    assert_eq!(driver.world.boss_health_ratio(), 0.0);

    // A second cast flies on with nothing to hit
    charge_fire(&mut driver);
    driver.run(&one(posed(Gesture::OpenPalm, 0.5, 0.6)), 400);
    assert_eq!(driver.count(|e| matches!(e, EffectEvent::BossDefeated { .. })), 1);
    assert_eq!(driver.count(|e| matches!(e, EffectEvent::BossHit { .. })), 1);
}

#[test]
fn test_lost_hands_clear_gesture_text() {
    let mut driver = Driver::new(World::default());
    driver.step(&two(posed(Gesture::Victory, 0.3, 0.6), posed(Gesture::OpenPalm, 0.7, 0.6)));
    assert_eq!(driver.world.gesture_text(), "Victory ✌️ | Open Palm");

    driver.step(&[None, None]);
    assert_eq!(driver.world.gesture_text(), "");
    assert!(driver.events.contains(&EffectEvent::GestureChanged {
        hand: HandSlot::Second,
        gesture: None,
    }));
}

/// World time from launch to the boss hit when ticking every `frame`
fn fire_flight_time(frame: Duration) -> Duration {
    let mut driver = Driver::with_frame(World::default(), frame);
    driver.run_for(&one(posed(Gesture::Fist, 0.5, 0.6)), Duration::from_millis(48));
    driver.run_for(&one(posed(Gesture::Victory, 0.5, 0.6)), Duration::from_millis(160));
    let fire = driver.world.hand(HandSlot::First).slot(ProjectileKind::Fire);
    assert!(fire.and_then(|slot| slot.projectile()).is_some());

    let launched_at = driver.world.clock() + frame;
    let hit = driver.run_until(&one(posed(Gesture::OpenPalm, 0.5, 0.6)), 1000, |e| {
        matches!(e, EffectEvent::BossHit { kind: ProjectileKind::Fire, .. })
    });
    assert!(hit, "no hit at {frame:?} per frame");
    driver.world.clock() - launched_at
}

#[test]
fn test_hit_time_independent_of_frame_rate() {
    let at_60 = fire_flight_time(Duration::from_nanos(16_666_667));
    let at_72 = fire_flight_time(Duration::from_nanos(13_888_889));
    let gap = if at_60 > at_72 { at_60 - at_72 } else { at_72 - at_60 };
    assert!(gap <= Duration::from_millis(50), "60 Hz {at_60:?} vs 72 Hz {at_72:?}");
}
