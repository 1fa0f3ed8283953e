// Bounded random walk jitter for timing and velocity values.
//
// A `Walker` nudges each non-negative input by a random offset drawn from
// `[0, factor)` and keeps the signed running sum of all offsets it has
// applied (`position`). Once `position` reaches the band edge `±factor`, the
// next offset is forced back toward zero instead of being clamped, so drift
// corrects itself over a sequence without ever overshooting the band by more
// than one step. At the end of a track, the assembler reads `position` to
// compute a closing delta-time that puts the total back on the tick grid
// (see `assemble.rs`).
//
// Inputs at or below `factor` pass through untouched, which guarantees the
// output is never negative. A walker is plain single-threaded state; the
// assembler owns one per jittered quantity for the duration of one file.
//
// Randomness comes in through `OffsetSource` so tests can script exact
// offsets. The production source is `csv2midi_prng::SeqRng`.

use csv2midi_prng::SeqRng;

use crate::error::JitterError;

/// Upper bound on offset draws for a single adjustment. With a non-negative
/// input above `factor` the first draw is always admissible; the cap turns a
/// violated precondition into an error instead of a hang.
pub const MAX_OFFSET_DRAWS: u32 = 16;

/// Supplier of uniform offsets in `[0, bound)`.
pub trait OffsetSource {
    /// Draw a value in `[0, bound)`. Only called with `bound > 0`.
    fn draw_below(&mut self, bound: u32) -> u32;
}

impl OffsetSource for SeqRng {
    fn draw_below(&mut self, bound: u32) -> u32 {
        self.range_u32(0, bound)
    }
}

/// Jitter state for one quantity kind (timing or velocity).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Walker {
    factor: u32,
    position: i64,
}

impl Walker {
    pub fn new(factor: u32) -> Self {
        Self {
            factor,
            position: 0,
        }
    }

    /// Maximum single-step magnitude plus one; offsets are drawn from
    /// `[0, factor)`.
    pub fn factor(&self) -> u32 {
        self.factor
    }

    /// Signed sum of every offset applied so far.
    pub fn position(&self) -> i64 {
        self.position
    }

    /// Whether `position` sits on or beyond the band edge.
    fn at_boundary(&self) -> bool {
        let f = i64::from(self.factor);
        self.position <= -f || self.position >= f
    }

    /// Return `input` plus a random offset, updating `position`.
    ///
    /// Returns `input` unchanged (and leaves `position` alone) when the
    /// factor is zero or `input <= factor`.
    pub fn adjust<S: OffsetSource>(
        &mut self,
        input: u32,
        source: &mut S,
    ) -> Result<u32, JitterError> {
        if self.factor == 0 || input <= self.factor {
            return Ok(input);
        }

        let base = i64::from(input);
        let mut offset = None;
        for _ in 0..MAX_OFFSET_DRAWS {
            let candidate = i64::from(source.draw_below(self.factor));
            if base + candidate >= 0 {
                offset = Some(candidate);
                break;
            }
        }
        let Some(mut offset) = offset else {
            return Err(JitterError::DrawsExhausted {
                input,
                factor: self.factor,
                attempts: MAX_OFFSET_DRAWS,
            });
        };

        if self.at_boundary() {
            // Point the step back toward zero. Draws are never negative, so a
            // walker starting at 0 never reaches -factor; in practice this is
            // a plain negation at the upper edge.
            offset = -self.position.signum() * offset.abs();
        }
        self.position += offset;

        // input > factor > |offset|, so the sum is positive and at most
        // input + factor - 1.
        let adjusted = base + offset;
        tracing::trace!(input, adjusted, position = self.position, "jitter");
        Ok(u32::try_from(adjusted).unwrap_or(u32::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays a fixed list of offsets, then repeats the last one.
    struct Scripted {
        offsets: VecDeque<u32>,
        last: u32,
        draws: usize,
    }

    impl Scripted {
        fn new(offsets: &[u32]) -> Self {
            Self {
                offsets: offsets.iter().copied().collect(),
                last: 0,
                draws: 0,
            }
        }
    }

    impl OffsetSource for Scripted {
        fn draw_below(&mut self, bound: u32) -> u32 {
            self.draws += 1;
            if let Some(v) = self.offsets.pop_front() {
                self.last = v;
            }
            assert!(self.last < bound, "scripted offset {} >= {bound}", self.last);
            self.last
        }
    }

    #[test]
    fn zero_factor_is_identity() {
        let mut w = Walker::new(0);
        let mut src = Scripted::new(&[]);
        for input in [0, 1, 10, 960, u32::MAX] {
            assert_eq!(w.adjust(input, &mut src).unwrap(), input);
        }
        assert_eq!(w.position(), 0);
        assert_eq!(src.draws, 0);
    }

    #[test]
    fn inputs_at_or_below_factor_pass_through() {
        let mut w = Walker::new(10);
        let mut src = Scripted::new(&[9]);
        for input in 0..=10 {
            assert_eq!(w.adjust(input, &mut src).unwrap(), input);
        }
        assert_eq!(w.position(), 0);
        assert_eq!(src.draws, 0);
    }

    #[test]
    fn offset_is_added_and_tracked() {
        let mut w = Walker::new(5);
        let mut src = Scripted::new(&[3]);
        assert_eq!(w.adjust(100, &mut src).unwrap(), 103);
        assert_eq!(w.position(), 3);
    }

    #[test]
    fn boundary_forces_step_back_toward_zero() {
        let mut w = Walker::new(5);
        let mut src = Scripted::new(&[4, 2, 3, 1]);
        assert_eq!(w.adjust(100, &mut src).unwrap(), 104); // 4
        assert_eq!(w.adjust(100, &mut src).unwrap(), 102); // 6, past the edge
        assert_eq!(w.adjust(100, &mut src).unwrap(), 97); // pulled back to 3
        assert_eq!(w.position(), 3);
        assert_eq!(w.adjust(100, &mut src).unwrap(), 101);
        assert_eq!(w.position(), 4);
    }

    #[test]
    fn negative_edge_pulls_upward() {
        let mut w = Walker {
            factor: 5,
            position: -5,
        };
        let mut src = Scripted::new(&[3]);
        assert_eq!(w.adjust(50, &mut src).unwrap(), 53);
        assert_eq!(w.position(), -2);
    }

    #[test]
    fn position_stays_within_one_step_of_band() {
        for factor in [1u32, 2, 7, 30, 240] {
            let mut w = Walker::new(factor);
            let mut rng = SeqRng::new(u64::from(factor));
            let f = i64::from(factor);
            for i in 0..5_000u32 {
                w.adjust(factor + 1 + i % 500, &mut rng).unwrap();
                assert!(
                    w.position() > -f && w.position() < 2 * f,
                    "factor {factor}: position {} escaped the band",
                    w.position()
                );
            }
        }
    }

    #[test]
    fn outputs_stay_within_one_step_and_conserve_position() {
        let mut w = Walker::new(10);
        let mut rng = SeqRng::new(2024);
        let mut sum: i64 = 0;
        for input in 0..100u32 {
            let out = w.adjust(input, &mut rng).unwrap();
            assert!(
                out >= input.saturating_sub(9) && out <= input + 9,
                "{input} jittered to {out}"
            );
            if input <= 10 {
                assert_eq!(out, input);
            }
            sum += i64::from(out) - i64::from(input);
        }
        assert_eq!(sum, w.position());
    }

    #[test]
    fn closing_with_residual_lands_on_the_grid() {
        let division: i64 = 960;
        let mut w = Walker::new(40);
        let mut rng = SeqRng::new(7);
        let mut total: i64 = 0;
        for _ in 0..64 {
            total += i64::from(w.adjust(240, &mut rng).unwrap());
        }
        total += division - w.position();
        assert_eq!(total % division, 0);
    }

    #[test]
    fn same_seed_same_jitter() {
        let run = |seed| {
            let mut w = Walker::new(12);
            let mut rng = SeqRng::new(seed);
            (0..50)
                .map(|i| w.adjust(100 + i, &mut rng).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(3), run(3));
    }
}
