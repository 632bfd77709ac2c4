//! Property-based tests for contact labeling.
//!
//! Run with: cargo test -p motion-contact -- proptest

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use motion_contact::{
    Collider, CollisionWorld, ContactConfig, ContactFunction, ContactSampler, ContactScene,
    LayerMask,
};
use motion_types::{FrameSample, JointId, Mirror, MotionClip, MotionSource, Pose, Skeleton};
use nalgebra::{Point3, Vector3};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Two-joint clips with random foot heights.
fn arb_clip() -> impl Strategy<Value = MotionClip> {
    let heights = prop::collection::vec((-0.2..0.6f64, -0.2..0.6f64), 1..60);
    (heights, 10.0..120.0f64).prop_map(|(heights, framerate)| {
        let samples = heights
            .into_iter()
            .map(|(l, r)| {
                FrameSample::new(
                    Pose::identity(),
                    vec![
                        Pose::from_position(Point3::new(0.1, l, 0.0)),
                        Pose::from_position(Point3::new(-0.1, r, 0.0)),
                    ],
                )
            })
            .collect();
        let skeleton = Skeleton::new(["LeftFoot", "RightFoot"]).with_name_symmetry();
        MotionClip::new(skeleton, framerate, samples).unwrap()
    })
}

fn arb_config() -> impl Strategy<Value = ContactConfig> {
    (
        0..2usize,
        0.01..0.5f64,
        prop::array::uniform3(-0.1..0.1f64),
        prop::array::uniform3(-1.0..1.0f64),
        0..3u8,
    )
        .prop_filter("normal must be non-zero", |(_, _, _, n, _)| {
            Vector3::from(*n).norm() > 1e-3
        })
        .prop_map(|(sensor, threshold, offset, normal, layer)| {
            ContactConfig::for_sensor(JointId::new(sensor))
                .threshold(threshold)
                .offset(Vector3::from(offset))
                .normal(Vector3::from(normal))
                .mask(LayerMask::layer(layer))
        })
}

fn world() -> CollisionWorld {
    CollisionWorld::new()
        .with(Collider::ground(0.0, 0))
        .with(Collider::ground(0.3, 1))
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn proptest_one_flag_per_frame(clip in arb_clip(), config in arb_config()) {
        let world = world();
        let flags = ContactScene::new(&clip, &world).compute(&config).unwrap();
        for mirror in Mirror::ALL {
            prop_assert_eq!(flags.get(mirror).len(), clip.frame_count());
        }
    }

    #[test]
    fn proptest_parallel_matches_sequential(clip in arb_clip(), config in arb_config()) {
        let world = world();
        let scene = ContactScene::new(&clip, &world);
        let parallel = scene.compute(&config).unwrap();
        let sequential = scene
            .with_sampler(ContactSampler::sequential())
            .compute(&config)
            .unwrap();
        prop_assert_eq!(parallel, sequential);
    }

    #[test]
    fn proptest_unchanged_setter_is_noop(clip in arb_clip(), config in arb_config()) {
        let world = world();
        let scene = ContactScene::new(&clip, &world);
        let mut function = ContactFunction::new(scene, config).unwrap();
        let before = function.clone();

        prop_assert!(!function.set_threshold(scene, config.threshold).unwrap());
        prop_assert!(!function.set_normal(scene, config.normal).unwrap());
        prop_assert!(!function.set_offset(scene, config.offset).unwrap());
        prop_assert!(!function.set_mask(scene, config.mask).unwrap());
        prop_assert!(!function.set_sensor(scene, config.sensor).unwrap());
        prop_assert_eq!(function, before);
    }

    #[test]
    fn proptest_changed_setter_keeps_length(
        clip in arb_clip(),
        config in arb_config(),
        threshold in 0.01..0.5f64,
    ) {
        let world = world();
        let scene = ContactScene::new(&clip, &world);
        let mut function = ContactFunction::new(scene, config).unwrap();

        let changed = function.set_threshold(scene, threshold).unwrap();
        prop_assert_eq!(changed, threshold != config.threshold);
        prop_assert_eq!(function.config().threshold, threshold);
        prop_assert_eq!(function.contact_flags().len(), clip.frame_count());
        prop_assert_eq!(
            function.contact_flags(),
            &scene.compute(function.config()).unwrap()
        );
    }

    #[test]
    fn proptest_empty_mask_never_hits(clip in arb_clip(), config in arb_config()) {
        let world = world();
        let flags = ContactScene::new(&clip, &world)
            .compute(&config.mask(LayerMask::NONE))
            .unwrap();
        for mirror in Mirror::ALL {
            prop_assert_eq!(flags.contact_count(mirror), 0);
        }
    }

    #[test]
    fn proptest_invalid_threshold_leaves_function(
        clip in arb_clip(),
        config in arb_config(),
        threshold in -1.0..=0.0f64,
    ) {
        let world = world();
        let scene = ContactScene::new(&clip, &world);
        let mut function = ContactFunction::new(scene, config).unwrap();
        let before = function.clone();
        prop_assert!(function.set_threshold(scene, threshold).is_err());
        prop_assert_eq!(function, before);
    }
}
