// Copyright (c) 2026 rezky_nightky

use std::time::Duration;

use crate::runtime::InteractionMode;

pub const INTERACTION_RADIUS: f32 = 100.0;
pub const PUSH_STRENGTH: f32 = 0.5;
pub const ORBIT_RADIUS: f32 = 50.0;

/// Last known pointer position in surface pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum PointerState {
    #[default]
    Inactive,
    At {
        x: f32,
        y: f32,
    },
}

impl PointerState {
    /// Negative or non-finite coordinates mean the pointer is off the surface.
    pub fn at(x: f32, y: f32) -> Self {
        if x.is_finite() && y.is_finite() && x >= 0.0 && y >= 0.0 {
            PointerState::At { x, y }
        } else {
            PointerState::Inactive
        }
    }

    pub fn position(self) -> Option<(f32, f32)> {
        match self {
            PointerState::Inactive => None,
            PointerState::At { x, y } => Some((x, y)),
        }
    }

    pub fn is_active(self) -> bool {
        self.position().is_some()
    }
}

/// Result of the interaction field for one cell.
///
/// `Offset` is added to the cell position, `Override` replaces it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Displacement {
    None,
    Offset { dx: f32, dy: f32 },
    Override { x: f32, y: f32 },
}

impl Displacement {
    pub fn apply(self, x: f32, y: f32) -> (f32, f32) {
        match self {
            Displacement::None => (x, y),
            Displacement::Offset { dx, dy } => (x + dx, y + dy),
            Displacement::Override { x, y } => (x, y),
        }
    }
}

pub fn displace(
    pointer: PointerState,
    cell: (f32, f32),
    mode: InteractionMode,
    wall: Duration,
) -> Displacement {
    if mode == InteractionMode::None {
        return Displacement::None;
    }
    let Some((px, py)) = pointer.position() else {
        return Displacement::None;
    };

    let dx = cell.0 - px;
    let dy = cell.1 - py;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance.is_nan() || distance >= INTERACTION_RADIUS {
        return Displacement::None;
    }

    let angle = dy.atan2(dx);
    match mode {
        InteractionMode::None => Displacement::None,
        InteractionMode::Push => {
            let push = (INTERACTION_RADIUS - distance) * PUSH_STRENGTH;
            Displacement::Offset {
                dx: angle.cos() * push,
                dy: angle.sin() * push,
            }
        }
        InteractionMode::Revolve => {
            let phase = angle + (wall.as_secs_f64() % std::f64::consts::TAU) as f32;
            Displacement::Override {
                x: px + phase.cos() * ORBIT_RADIUS,
                y: py + phase.sin() * ORBIT_RADIUS,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    proptest! {
        #[test]
        fn no_effect_at_or_beyond_the_radius(
            px in 0.0f32..2000.0,
            py in 0.0f32..2000.0,
            angle in 0.0f32..std::f32::consts::TAU,
            extra in 0.0f32..1000.0,
            secs in 0u64..100_000,
        ) {
            let d = INTERACTION_RADIUS + extra;
            let cell = (px + angle.cos() * d, py + angle.sin() * d);
            let dist = ((cell.0 - px).powi(2) + (cell.1 - py).powi(2)).sqrt();
            prop_assume!(dist >= INTERACTION_RADIUS);
            for mode in InteractionMode::ALL {
                let got = displace(PointerState::at(px, py), cell, mode, Duration::from_secs(secs));
                prop_assert_eq!(got, Displacement::None);
            }
        }
    }

    #[test]
    fn inactive_pointer_or_none_mode_is_identity() {
        let cell = (10.0, 10.0);
        assert_eq!(
            displace(PointerState::Inactive, cell, InteractionMode::Push, Duration::ZERO),
            Displacement::None
        );
        assert_eq!(
            displace(PointerState::at(12.0, 10.0), cell, InteractionMode::None, Duration::ZERO),
            Displacement::None
        );
        assert_eq!(PointerState::at(-1000.0, -1000.0), PointerState::Inactive);
    }

    #[test]
    fn push_moves_cell_away_from_pointer() {
        let d = displace(
            PointerState::at(100.0, 100.0),
            (140.0, 100.0),
            InteractionMode::Push,
            Duration::ZERO,
        );
        let Displacement::Offset { dx, dy } = d else {
            panic!("expected offset, got {d:?}");
        };
        assert!(close(dx, 30.0));
        assert!(close(dy, 0.0));
        let (x, y) = d.apply(140.0, 100.0);
        assert!(close(x, 170.0) && close(y, 100.0));
    }

    #[test]
    fn push_decays_towards_the_boundary() {
        let near = displace(PointerState::at(0.0, 0.0), (0.0, 10.0), InteractionMode::Push, Duration::ZERO);
        let far = displace(PointerState::at(0.0, 0.0), (0.0, 99.0), InteractionMode::Push, Duration::ZERO);
        match (near, far) {
            (Displacement::Offset { dy: a, .. }, Displacement::Offset { dy: b, .. }) => {
                assert!(close(a, 45.0));
                assert!(close(b, 0.5));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn revolve_overrides_position_on_the_orbit() {
        let pointer = PointerState::at(200.0, 200.0);
        let d = displace(pointer, (200.0, 230.0), InteractionMode::Revolve, Duration::ZERO);
        let Displacement::Override { x, y } = d else {
            panic!("expected override, got {d:?}");
        };
        assert!(close(x, 200.0));
        assert!(close(y, 250.0));
        // the original position is discarded
        assert_eq!(d.apply(1.0, 2.0), (x, y));
    }

    #[test]
    fn revolve_advances_one_radian_per_second() {
        let pointer = PointerState::at(0.0, 0.0);
        let d = displace(pointer, (10.0, 0.0), InteractionMode::Revolve, Duration::from_secs(1));
        let Displacement::Override { x, y } = d else {
            panic!("expected override");
        };
        assert!(close(x, 1.0f32.cos() * ORBIT_RADIUS));
        assert!(close(y, 1.0f32.sin() * ORBIT_RADIUS));
    }
}
