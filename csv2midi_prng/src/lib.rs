// Deterministic, portable pseudo-random number generator for csv2midi.
//
// Implements xoshiro256++ (Blackman & Vigna, 2019) with SplitMix64 seeding.
// The converter's jitter must be reproducible: the same input, factors, and
// `--seed` always produce byte-identical MIDI files on every platform. A
// hand-rolled generator pins the output stream; an external RNG crate is free
// to change its algorithm between releases.
//
// The only consumer is `csv2midi::jitter`, which draws bounded integer
// offsets through `range_u32`. No floating point anywhere in this module.

use serde::{Deserialize, Serialize};

/// Xoshiro256++ PRNG, the converter's sole source of randomness.
///
/// One `SeqRng` is created per conversion run and shared by the timing and
/// velocity walkers, which draw from it in record order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeqRng {
    s: [u64; 4],
}

impl SeqRng {
    /// Create a new PRNG seeded from a `u64`.
    ///
    /// SplitMix64 expands the seed into the 256-bit state, so even seeds
    /// like 0 and 1 give well-mixed, unrelated streams.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        let s = [
            splitmix64(&mut sm),
            splitmix64(&mut sm),
            splitmix64(&mut sm),
            splitmix64(&mut sm),
        ];
        Self { s }
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        let [s0, s1, s2, s3] = self.s;
        let result = s0.wrapping_add(s3).rotate_left(23).wrapping_add(s0);

        let t = s1 << 17;
        let s2 = s2 ^ s0;
        let s3 = s3 ^ s1;
        let s1 = s1 ^ s2;
        let s0 = s0 ^ s3;

        self.s = [s0, s1, s2 ^ t, s3.rotate_left(45)];
        result
    }

    /// Generate a `u32` from the upper half of a `u64`. The low bits of
    /// xoshiro output are the weakest, so they are discarded.
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniform integer in `[low, high)`, rejection-sampled to avoid modulo
    /// bias. Panics if `low >= high`.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let span = high - low;
        if span.is_power_of_two() {
            return low + (self.next_u64() & (span - 1));
        }
        // (2^64 - span) % span: values below this would bias the low residues.
        let threshold = span.wrapping_neg() % span;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + r % span;
            }
        }
    }

    /// Uniform `u32` in `[low, high)`. Panics if `low >= high`.
    pub fn range_u32(&mut self, low: u32, high: u32) -> u32 {
        self.range_u64(u64::from(low), u64::from(high)) as u32
    }
}

/// SplitMix64 step, used only to expand a single `u64` seed.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
