use crate::vector::TouchVector;

/// Sticky first-wins arbitration over a group of flanking sensors.
///
/// Within the enabled group at most one sensor is reported as touched. Once a
/// sensor wins it keeps priority until it is released, regardless of which
/// other group members are touched meanwhile. When no winner is held the
/// lowest touched index wins. Sensors outside the group pass through.
#[derive(Debug, Default)]
pub struct FlankArbiter {
    latched: TouchVector,
}

impl FlankArbiter {
    pub const fn new() -> Self {
        Self {
            latched: TouchVector::EMPTY,
        }
    }

    /// The vector reported by the last call to `resolve`
    pub fn latched(&self) -> TouchVector {
        self.latched
    }

    /// Arbitrate one cycle's raw touch vector
    pub fn resolve(&mut self, current: TouchVector, enable: TouchVector) -> TouchVector {
        let candidates = current & enable;
        let held = self.latched & enable;

        // `held` is one-hot unless the group changed since the last call
        let still_held = candidates & held;
        let winner = if !still_held.is_empty() {
            still_held.lowest()
        } else {
            candidates.lowest()
        };

        let result = winner | (current & !enable);
        self.latched = result;
        result
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    const A: TouchVector = TouchVector(0b01);
    const B: TouchVector = TouchVector(0b10);
    const GROUP: TouchVector = TouchVector(0b11);

    #[test]
    fn test_sticky_priority() {
        let mut arb = FlankArbiter::new();

        assert_eq!(arb.resolve(A, GROUP), A);
        assert_eq!(arb.resolve(A | B, GROUP), A, "B must be suppressed while A is held");
        assert_eq!(arb.resolve(B, GROUP), B, "A's release must hand over to B");
    }

    #[test]
    fn test_held_winner_beats_lower_index() {
        let mut arb = FlankArbiter::new();

        assert_eq!(arb.resolve(B, GROUP), B);
        // A has the higher positional priority but B got there first
        assert_eq!(arb.resolve(A | B, GROUP), B);
        assert_eq!(arb.resolve(A, GROUP), A);
    }

    #[test]
    fn test_simultaneous_first_touch() {
        let mut arb = FlankArbiter::new();
        assert_eq!(arb.resolve(A | B, GROUP), A);
        assert_eq!(arb.latched(), A);
    }

    #[test]
    fn test_release_to_idle() {
        let mut arb = FlankArbiter::new();
        arb.resolve(B, GROUP);
        assert_eq!(arb.resolve(TouchVector::EMPTY, GROUP), TouchVector::EMPTY);
        assert!((arb.latched() & GROUP).is_empty());
    }

    #[test]
    fn test_pass_through() {
        let mut arb = FlankArbiter::new();
        let outside = TouchVector(0b1100);

        arb.resolve(A, GROUP);
        assert_eq!(arb.resolve(outside | B, GROUP), outside | B);
        assert_eq!(arb.resolve(outside, GROUP), outside);
        assert_eq!(arb.resolve(TouchVector(0b0100), GROUP), TouchVector(0b0100));
    }

    #[test]
    fn test_stable_when_unchanged() {
        let mut arb = FlankArbiter::new();
        let mask = TouchVector(0b0111);
        let first = arb.resolve(TouchVector(0b1110), mask);
        for _ in 0..5 {
            assert_eq!(arb.resolve(first, mask), first);
        }
    }

    #[test]
    fn test_four_bit_example() {
        let mut arb = FlankArbiter::new();
        let mask = TouchVector(0b0111);

        assert_eq!(arb.resolve(TouchVector(0b1010), mask), TouchVector(0b1010));
        assert_eq!(arb.resolve(TouchVector(0b1110), mask), TouchVector(0b1010));
    }

    #[test]
    fn test_group_widening_keeps_reported_sensor() {
        let mut arb = FlankArbiter::new();

        // Index 2 is reported as a pass-through bit while outside the group
        arb.resolve(TouchVector(0b100), TouchVector(0b011));
        // Once it joins the group it is the sensor already reported as touched
        let result = arb.resolve(TouchVector(0b101), TouchVector(0b111));
        assert_eq!(result, TouchVector(0b100));

        // Narrowing the group drops the latch for sensors that leave it
        let result = arb.resolve(TouchVector(0b011), TouchVector(0b011));
        assert_eq!(result, TouchVector(0b001));
    }

    #[test]
    fn test_group_widening_over_several_pass_through_bits() {
        let mut arb = FlankArbiter::new();

        // Two pass-through bits reported while outside the group
        assert_eq!(arb.resolve(TouchVector(0b1100), TouchVector(0b0011)), TouchVector(0b1100));
        // Both join the group still touched; only one may be reported
        let result = arb.resolve(TouchVector(0b1100), TouchVector(0b1111));
        assert_eq!(result, TouchVector(0b0100));
        assert_eq!(arb.resolve(TouchVector(0b1100), TouchVector(0b1111)), TouchVector(0b0100));
    }

    #[test]
    fn test_one_hot_invariant_with_changing_group() {
        let mut arb = FlankArbiter::new();
        let masks = [TouchVector(0b0011), TouchVector(0b1111), TouchVector(0b0110), TouchVector(0xff)];

        let mut seed: u64 = 0x9e37_79b9;
        for i in 0..2000 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let mask = masks[i % masks.len()];
            let current = TouchVector((seed >> 40) & 0xff);
            let result = arb.resolve(current, mask);

            assert!((result & mask).count() <= 1);
            assert_eq!(result & mask & !current, TouchVector::EMPTY);
        }
    }

    #[test]
    fn test_one_hot_invariant() {
        let mut arb = FlankArbiter::new();
        let mask = TouchVector(0x00ff_00ff);

        // Simple LCG so the sequence is deterministic
        let mut seed: u64 = 0x1234_5678;
        for _ in 0..2000 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let current = TouchVector(seed >> 32);
            let result = arb.resolve(current, mask);

            assert!((result & mask).count() <= 1);
            assert_eq!(result & !mask, current & !mask);
            // Any reported group bit must be physically touched
            assert_eq!(result & mask & !current, TouchVector::EMPTY);
            // A touched group always yields a winner
            assert_eq!((current & mask).is_empty(), (result & mask).is_empty());
        }
    }
}
