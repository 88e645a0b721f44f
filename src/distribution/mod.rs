//! Distribution interface: a minimal sampling surface with two concrete,
//! constructed-per-node implementations. No global shared PRNG state; each
//! node owns its own seeded `rand::rngs::StdRng`.

mod truncated_normal;
mod uniform;

pub use truncated_normal::TruncatedNormalDistribution;
pub use uniform::UniformDistribution;

/// Sampling primitives every `Value` kind needing randomness draws from.
pub trait Distribution {
    /// Uniformly-indexed pick among `n` alternatives, `n > 0`.
    fn next_index(&mut self, n: usize) -> usize;
    fn next_long(&mut self, lo: i64, hi: i64) -> i64;
    fn next_double(&mut self, lo: f64, hi: f64) -> f64;
    fn next_bool(&mut self) -> bool;
}
