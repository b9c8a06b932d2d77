//! Property tests for sampling and reconcile.

use glam::Vec3;
use image::{Rgba, RgbaImage};
use morphfield::{
    CanvasConfig, ImageSampler, ParticleField, PixelSample, PlacementConfig, PositionPolicy,
};
use proptest::prelude::*;

const SIZE: u32 = 32;

fn raster(mask: &[bool]) -> RgbaImage {
    RgbaImage::from_fn(SIZE, SIZE, |x, y| {
        if mask[(y * SIZE + x) as usize] {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    })
}

fn policy(seed: u64) -> PositionPolicy {
    let canvas = CanvasConfig {
        width: SIZE,
        height: SIZE,
        ..CanvasConfig::default()
    };
    PositionPolicy::seeded(&canvas, &PlacementConfig::default(), 1300.0, seed)
}

proptest! {
    #[test]
    fn samples_match_dark_even_pixels(mask in prop::collection::vec(any::<bool>(), (SIZE * SIZE) as usize)) {
        let img = raster(&mask);
        let samples = ImageSampler::new(SIZE, SIZE)
            .sample_raster(img.as_raw(), SIZE, SIZE)
            .unwrap();

        let mut expected = Vec::new();
        for row in 0..SIZE {
            for x in 0..SIZE {
                let y = SIZE - row;
                if mask[(row * SIZE + x) as usize] && x != 0 && x % 2 == 0 && y % 2 == 0 {
                    expected.push(PixelSample::new(x, y));
                }
            }
        }
        prop_assert_eq!(samples, expected);
    }

    #[test]
    fn pool_never_shrinks(
        counts in prop::collection::vec(0usize..200, 1..8),
        seed in any::<u64>(),
    ) {
        let mut policy = policy(seed);
        let mut field = ParticleField::new(5, 0.05);
        let mut high_water = 0;

        for n in counts {
            let samples: Vec<PixelSample> =
                (0..n as u32).map(|i| PixelSample::new(2 + 2 * (i % 15), 2 + 2 * (i / 15))).collect();
            field.reconcile(&samples, &mut policy);
            high_water = high_water.max(n);

            prop_assert_eq!(field.len(), high_water);
            prop_assert_eq!(field.active_count(), n);
            let on_image = field
                .particles()
                .iter()
                .filter(|p| policy.is_image_target(p.target))
                .count();
            prop_assert_eq!(on_image, n);
        }
    }

    #[test]
    fn parked_targets_stay_outside_ring(seed in any::<u64>(), outward in any::<bool>()) {
        let mut policy = policy(seed);
        let min = policy.min_park_radius();
        for _ in 0..32 {
            let target: Vec3 = policy.parked_target(outward);
            prop_assert!(target.truncate().length() >= min - 0.01);
            prop_assert!(!policy.is_image_target(target));
        }
    }
}
