mod indirect;
mod light;

pub use self::indirect::*;
pub use self::light::*;

use crate::WhiteNoise;

/// Weighted reservoir holding a single sample chosen out of a stream of
/// candidates.
///
/// - `w_sum` is the running sum of candidate weights,
/// - `m` is the number of candidates seen so far,
/// - `w` is the unbiased contribution weight, valid after
///   [`Self::normalize()`].
#[derive(Clone, Copy, Default, Debug, PartialEq)]
pub struct Reservoir<T> {
    pub sample: T,
    pub w_sum: f32,
    pub m: u32,
    pub w: f32,
}

impl<T> Reservoir<T>
where
    T: Clone + Copy + Default,
{
    pub fn update(
        &mut self,
        wnoise: &mut WhiteNoise,
        sample: T,
        weight: f32,
    ) -> bool {
        self.update_with(wnoise.sample(), sample, weight)
    }

    /// Same as [`Self::update()`], but with an explicit uniform random number
    /// in range `<0.0, 1.0)`.
    ///
    /// Negative and non-finite weights count as zero: the candidate bumps `m`,
    /// but can never get selected.
    pub fn update_with(&mut self, u: f32, sample: T, weight: f32) -> bool {
        let weight = if weight.is_finite() && weight > 0.0 {
            weight
        } else {
            0.0
        };

        self.m += 1;
        self.w_sum += weight;

        if weight > 0.0 && u * self.w_sum < weight {
            self.sample = sample;
            true
        } else {
            false
        }
    }

    /// Streams another reservoir into this one.
    ///
    /// `p_hat` must be the target function of `rhs.sample` evaluated at the
    /// pixel doing the merging, not at the pixel `rhs` comes from.
    pub fn merge(
        &mut self,
        wnoise: &mut WhiteNoise,
        rhs: &Self,
        p_hat: f32,
    ) -> bool {
        self.merge_with(wnoise.sample(), rhs, p_hat)
    }

    pub fn merge_with(&mut self, u: f32, rhs: &Self, p_hat: f32) -> bool {
        if rhs.m == 0 {
            return false;
        }

        let selected =
            self.update_with(u, rhs.sample, p_hat * rhs.w * rhs.m as f32);

        self.m += rhs.m - 1;
        selected
    }

    /// Combines two reservoirs into a fresh, normalized one.
    ///
    /// `p_a` and `p_b` are target functions of the respective samples at the
    /// consuming pixel; a single random number suffices, since the first
    /// non-empty candidate is always selected.
    pub fn combine(a: &Self, b: &Self, p_a: f32, p_b: f32, u: f32) -> Self {
        let mut out = Self::default();
        let mut p_hat = 0.0;

        if out.merge_with(u, a, p_a) {
            p_hat = p_a;
        }

        if out.merge_with(u, b, p_b) {
            p_hat = p_b;
        }

        out.normalize(p_hat);
        out
    }

    /// Computes `w` for the currently selected sample, given its target
    /// function.
    pub fn normalize(&mut self, p_hat: f32) {
        let t = self.m as f32 * p_hat;

        self.w = if t > 0.0 { self.w_sum / t } else { 0.0 };
    }

    /// Limits how many candidates this reservoir remembers; `w_sum` gets
    /// scaled along so that `w` stays unchanged.
    pub fn clamp_m(&mut self, max: u32) {
        if self.m > max {
            self.w_sum *= max as f32 / self.m as f32;
            self.m = max;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.m == 0
    }
}
