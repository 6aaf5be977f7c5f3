//! Deterministic island PRNG
//!
//! Mulberry32: a 32-bit state generator whose output depends only on the seed,
//! so every platform replays the same stream. All derived helpers are built on
//! [`IslandRng::next`] and inherit that reproducibility.

use rand::RngCore;

const MULBERRY_INCREMENT: u32 = 0x6D2B_79F5;
const TWO_POW_32: f64 = 4_294_967_296.0;

#[derive(Clone, Debug)]
pub struct IslandRng {
    state: u32,
}

impl IslandRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Current internal state; `IslandRng::new(state)` resumes the stream.
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Next raw 32-bit output.
    pub fn next_raw(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Uniform float in `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        self.next_raw() as f64 / TWO_POW_32
    }

    /// Uniform float in `[min, max)`.
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next() * (max - min)
    }

    /// Uniform integer in `[min, max)`. Returns `min` for an empty range.
    pub fn int(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        (self.range(min as f64, max as f64).floor() as i64).min(max - 1)
    }

    /// True with the given probability.
    pub fn bool(&mut self, probability: f64) -> bool {
        self.next() < probability
    }

    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.int(0, items.len() as i64) as usize;
        items.get(idx)
    }

    /// In-place Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.int(0, i as i64 + 1) as usize;
            items.swap(i, j);
        }
    }
}

/// Lets the island stream drive `rand` distributions when a caller needs them.
impl RngCore for IslandRng {
    fn next_u32(&mut self) -> u32 {
        self.next_raw()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.next_raw() as u64;
        let lo = self.next_raw() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_raw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_deterministic_stream() {
        let mut a = IslandRng::new(42);
        let mut b = IslandRng::new(42);
        for _ in 0..1000 {
            assert_eq!(a.next_raw(), b.next_raw());
        }
    }

    #[test]
    fn test_known_mulberry_values() {
        // Reference outputs of mulberry32(0)
        let mut rng = IslandRng::new(0);
        assert_eq!(rng.next_raw(), 1_144_304_738);
        assert_eq!(rng.next_raw(), 1_416_247);
    }

    #[test]
    fn test_next_in_unit_interval() {
        let mut rng = IslandRng::new(7);
        for _ in 0..10_000 {
            let v = rng.next();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_int_bounds() {
        let mut rng = IslandRng::new(99);
        let mut seen = [false; 5];
        for _ in 0..1000 {
            let v = rng.int(3, 8);
            assert!((3..8).contains(&v));
            seen[(v - 3) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
        assert_eq!(rng.int(4, 4), 4);
    }

    #[test]
    fn test_shuffle_is_permutation_and_repeatable() {
        let mut a: Vec<u32> = (0..20).collect();
        let mut b = a.clone();
        IslandRng::new(5).shuffle(&mut a);
        IslandRng::new(5).shuffle(&mut b);
        assert_eq!(a, b);
        let mut sorted = a.clone();
        sorted.sort();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_choice() {
        let mut rng = IslandRng::new(1);
        let empty: [u8; 0] = [];
        assert_eq!(rng.choice(&empty), None);
        let items = ["a", "b", "c"];
        assert!(items.contains(rng.choice(&items).unwrap()));
    }

    #[test]
    fn test_rand_bridge() {
        let mut rng = IslandRng::new(11);
        let v: f32 = rng.gen_range(2.0..3.0);
        assert!((2.0..3.0).contains(&v));
        let mut buf = [0u8; 7];
        rng.fill_bytes(&mut buf);
    }
}
