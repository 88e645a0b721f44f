use super::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution as _, Normal};

/// Rejection-sample a normal distribution until the draw lands in `[lo, hi)`,
/// capping attempts at 100 and falling back to a clamped draw past that.
const MAX_REJECTIONS: u32 = 100;

pub struct TruncatedNormalDistribution {
    rng: StdRng,
    normal: Normal<f64>,
    lo: f64,
    hi: f64,
}

impl TruncatedNormalDistribution {
    pub fn new(seed: u64, mean: f64, stddev: f64, lo: f64, hi: f64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            normal: Normal::new(mean, stddev).expect("stddev must be finite and positive"),
            lo,
            hi,
        }
    }

    fn sample_bounded(&mut self) -> f64 {
        for _ in 0..MAX_REJECTIONS {
            let v = self.normal.sample(&mut self.rng);
            if v >= self.lo && v < self.hi {
                return v;
            }
        }
        self.normal.sample(&mut self.rng).clamp(self.lo, self.hi)
    }
}

impl Distribution for TruncatedNormalDistribution {
    fn next_index(&mut self, n: usize) -> usize {
        let span = n as f64;
        let v = ((self.sample_bounded() - self.lo) / (self.hi - self.lo) * span) as usize;
        v.min(n.saturating_sub(1))
    }

    fn next_long(&mut self, lo: i64, hi: i64) -> i64 {
        let saved = (self.lo, self.hi);
        self.lo = lo as f64;
        self.hi = hi as f64;
        let v = self.sample_bounded().floor() as i64;
        (self.lo, self.hi) = saved;
        v.clamp(lo, hi - 1)
    }

    fn next_double(&mut self, lo: f64, hi: f64) -> f64 {
        let saved = (self.lo, self.hi);
        self.lo = lo;
        self.hi = hi;
        let v = self.sample_bounded();
        (self.lo, self.hi) = saved;
        v
    }

    fn next_bool(&mut self) -> bool {
        self.sample_bounded() >= (self.lo + self.hi) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_within_bounds() {
        let mut d = TruncatedNormalDistribution::new(1, 0.0, 1.0, -2.0, 2.0);
        for _ in 0..500 {
            let v = d.next_double(-2.0, 2.0);
            assert!((-2.0..2.0).contains(&v), "{v} out of bounds");
        }
    }
}
