// Copyright (c) 2026 rezky_nightky

use std::time::Duration;

use rand::Rng;

use crate::color::Rgb;
use crate::runtime::MixMode;

const RAINBOW_PERIOD_MS: u128 = 10_000;

/// Draw color for a glyph at vertical pixel position `y`.
///
/// `wall` is wall-clock time; only `Rainbow` reads it. `Random` draws a fresh
/// coin per call, so the same cell may flicker between the two colors.
pub fn color_for<R: Rng + ?Sized>(
    y: f32,
    surface_height: f32,
    mode: MixMode,
    primary: Rgb,
    secondary: Rgb,
    wall: Duration,
    rng: &mut R,
) -> Rgb {
    match mode {
        MixMode::Single => primary,
        MixMode::Gradient => primary.lerp(secondary, ratio(y, surface_height)),
        MixMode::Random => {
            if rng.random_bool(0.5) {
                primary
            } else {
                secondary
            }
        }
        MixMode::Rainbow => Rgb::from_hsl(rainbow_hue(y, surface_height, wall), 1.0, 0.5),
    }
}

pub fn rainbow_hue(y: f32, surface_height: f32, wall: Duration) -> f32 {
    let shift = (wall.as_millis() % RAINBOW_PERIOD_MS) as f32 / 10.0;
    ratio(y, surface_height) * 360.0 + shift
}

fn ratio(y: f32, surface_height: f32) -> f32 {
    if surface_height > 0.0 && y.is_finite() {
        y / surface_height
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn rgb() -> impl Strategy<Value = Rgb> {
        (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Rgb::new(r, g, b))
    }

    proptest! {
        #[test]
        fn gradient_hits_both_endpoints(p in rgb(), s in rgb(), h in 1.0f32..4000.0) {
            let mut rng = StdRng::seed_from_u64(0);
            let top = color_for(0.0, h, MixMode::Gradient, p, s, Duration::ZERO, &mut rng);
            let bottom = color_for(h, h, MixMode::Gradient, p, s, Duration::ZERO, &mut rng);
            prop_assert_eq!(top, p);
            prop_assert_eq!(bottom, s);
        }
    }

    #[test]
    fn single_is_always_primary() {
        let mut rng = StdRng::seed_from_u64(3);
        for y in [0.0, 50.0, 1e6] {
            let c = color_for(y, 100.0, MixMode::Single, Rgb::GREEN, Rgb::RED, Duration::ZERO, &mut rng);
            assert_eq!(c, Rgb::GREEN);
        }
    }

    #[test]
    fn gradient_midpoint_rounds() {
        let mut rng = StdRng::seed_from_u64(0);
        let c = color_for(
            50.0,
            100.0,
            MixMode::Gradient,
            Rgb::new(0, 0, 0),
            Rgb::new(255, 1, 3),
            Duration::ZERO,
            &mut rng,
        );
        assert_eq!(c, Rgb::new(128, 1, 2));
    }

    #[test]
    fn zero_height_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(0);
        let g = color_for(40.0, 0.0, MixMode::Gradient, Rgb::GREEN, Rgb::RED, Duration::ZERO, &mut rng);
        assert_eq!(g, Rgb::GREEN);
        let r = color_for(40.0, 0.0, MixMode::Rainbow, Rgb::GREEN, Rgb::RED, Duration::ZERO, &mut rng);
        assert_eq!(r, Rgb::RED);
    }

    #[test]
    fn random_only_yields_the_two_inputs_and_both_appear() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = (false, false);
        for _ in 0..200 {
            let c = color_for(0.0, 10.0, MixMode::Random, Rgb::GREEN, Rgb::RED, Duration::ZERO, &mut rng);
            assert!(c == Rgb::GREEN || c == Rgb::RED);
            if c == Rgb::GREEN {
                seen.0 = true;
            } else {
                seen.1 = true;
            }
        }
        assert!(seen.0 && seen.1);
    }

    #[test]
    fn rainbow_hue_shifts_with_time() {
        assert_eq!(rainbow_hue(50.0, 100.0, Duration::ZERO), 180.0);
        assert_eq!(rainbow_hue(0.0, 100.0, Duration::from_millis(1200)), 120.0);
        assert_eq!(rainbow_hue(0.0, 100.0, Duration::from_millis(10_300)), 30.0);
    }
}
