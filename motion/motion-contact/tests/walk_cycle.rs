//! End-to-end contact labeling on a synthetic walk cycle.
//!
//! Run with: cargo test -p motion-contact --test walk_cycle

#![allow(clippy::unwrap_used)]

use motion_contact::{
    Collider, CollisionWorld, ContactConfig, ContactModule, ContactSampler, ContactScene,
    LayerMask, Shape,
};
use motion_types::{FrameSample, JointId, Mirror, MotionClip, MotionSource, Pose, Skeleton};
use nalgebra::{Point3, Vector3};

const GROUND: u8 = 4;
const PROPS: u8 = 5;

/// Hips, LeftFoot, RightFoot over 100 frames at 60 fps.
///
/// The left foot is planted on frames 40..=60, the right foot on 0..=20 and
/// 80..=99. Otherwise each foot swings 30 cm above the ground.
fn walk() -> MotionClip {
    let skeleton = Skeleton::new(["Hips", "LeftFoot", "RightFoot"]).with_name_symmetry();
    let samples = (0..100)
        .map(|i| {
            let x = f64::from(i) * 0.01;
            let left = if (40..=60).contains(&i) { 0.04 } else { 0.3 };
            let right = if i <= 20 || i >= 80 { 0.04 } else { 0.3 };
            FrameSample::new(
                Pose::from_position(Point3::new(x, 0.0, 0.0)),
                vec![
                    Pose::from_position(Point3::new(x, 0.9, 0.0)),
                    Pose::from_position(Point3::new(x, left, 0.1)),
                    Pose::from_position(Point3::new(x, right, -0.1)),
                ],
            )
        })
        .collect();
    MotionClip::new(skeleton, 60.0, samples).unwrap()
}

fn world() -> CollisionWorld {
    CollisionWorld::new()
        .with(Collider::ground(0.0, GROUND))
        // A crate the left foot would touch if props counted.
        .with(Collider::new(
            Shape::aabb(Point3::new(-1.0, 0.2, 0.0), Point3::new(2.0, 0.25, 0.5)),
            PROPS,
        ))
}

#[test]
fn left_foot_touches_ground_at_frame_50() {
    let clip = walk();
    let world = world();
    let scene = ContactScene::new(&clip, &world);
    let mut contacts = ContactModule::new(clip.skeleton());

    let left = clip.skeleton().require("LeftFoot").unwrap();
    let config = ContactConfig::for_sensor(left)
        .threshold(0.1)
        .normal(Vector3::new(0.0, -1.0, 0.0))
        .mask(LayerMask::layer(GROUND));
    assert!(contacts.add_with(scene, config).unwrap());

    let flags = contacts.get(left).unwrap().contact_flags();
    assert_eq!(flags.len(), clip.frame_count());
    assert!(flags.regular()[50]);
    assert_eq!(flags.contact_count(Mirror::Regular), 21);

    // Mirrored left foot follows the recorded right foot.
    assert!(flags.inverse()[0]);
    assert!(!flags.inverse()[50]);
    assert_eq!(flags.contact_count(Mirror::Mirrored), 41);
}

#[test]
fn mask_selects_layers() {
    let clip = walk();
    let world = world();
    let scene = ContactScene::new(&clip, &world);
    let left = JointId::new(1);

    let ground_only = scene
        .compute(&ContactConfig::for_sensor(left).mask(LayerMask::layer(GROUND)))
        .unwrap();
    let everything = scene.compute(&ContactConfig::for_sensor(left)).unwrap();

    // The swinging foot (30 cm) reaches the crate top (25 cm) but not the ground.
    assert!(!ground_only.regular()[10]);
    assert!(everything.regular()[10]);
    assert_eq!(everything.contact_count(Mirror::Regular), 100);
}

#[test]
fn sequential_and_parallel_agree() {
    let clip = walk();
    let world = world();
    let parallel = ContactScene::new(&clip, &world);
    let sequential = parallel.with_sampler(ContactSampler::sequential());

    let mut a = ContactModule::new(clip.skeleton());
    let mut b = ContactModule::new(clip.skeleton());
    for sensor in [JointId::new(1), JointId::new(2)] {
        a.add(parallel, sensor).unwrap();
        b.add(sequential, sensor).unwrap();
    }
    assert_eq!(a, b);
}

#[test]
fn module_round_trips_through_json() {
    let clip = walk();
    let world = world();
    let scene = ContactScene::new(&clip, &world);
    let mut contacts = ContactModule::new(clip.skeleton());
    contacts.add(scene, JointId::new(1)).unwrap();

    let json = serde_json::to_string(&contacts).unwrap();
    let back: ContactModule = serde_json::from_str(&json).unwrap();
    assert_eq!(back, contacts);
}
