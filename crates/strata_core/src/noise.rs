//! Coherent noise used by terrain synthesis.
//!
//! The heightfield only needs a turbulence query, so it is written against the
//! [`Turbulence`] trait. [`Perlin`] is the gradient-lattice implementation the
//! terrain builder uses by default; it is fully determined by its seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strata_math::DVec3;

/// Number of lattice gradients and permutation entries.
const POINT_COUNT: usize = 256;

/// Multi-octave noise source.
pub trait Turbulence {
    /// Absolute value of `depth` octaves of noise summed at `p`, each octave
    /// at double the frequency and half the weight of the previous one.
    fn turb(&self, p: DVec3, depth: u32) -> f64;
}

/// Gradient-lattice Perlin noise.
#[derive(Clone, Debug)]
pub struct Perlin {
    gradients: Vec<DVec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    /// Build the gradient and permutation tables from `rng`.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let gradients = (0..POINT_COUNT)
            .map(|_| {
                DVec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                )
                .normalize_or_zero()
            })
            .collect();

        Self {
            gradients,
            perm_x: generate_perm(rng),
            perm_y: generate_perm(rng),
            perm_z: generate_perm(rng),
        }
    }

    /// Build reproducible tables from a seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(&mut StdRng::seed_from_u64(seed))
    }

    /// Single-octave noise in roughly `[-1, 1]`.
    pub fn noise(&self, p: DVec3) -> f64 {
        let u = p.x - p.x.floor();
        let v = p.y - p.y.floor();
        let w = p.z - p.z.floor();

        let i = p.x.floor() as i64;
        let j = p.y.floor() as i64;
        let k = p.z.floor() as i64;

        let mut c = [[[DVec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, corner) in row.iter_mut().enumerate() {
                    let index = self.perm_x[wrap(i + di as i64)]
                        ^ self.perm_y[wrap(j + dj as i64)]
                        ^ self.perm_z[wrap(k + dk as i64)];
                    *corner = self.gradients[index];
                }
            }
        }

        perlin_interp(&c, u, v, w)
    }
}

impl Turbulence for Perlin {
    fn turb(&self, p: DVec3, depth: u32) -> f64 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accum.abs()
    }
}

#[inline]
fn wrap(i: i64) -> usize {
    (i & (POINT_COUNT as i64 - 1)) as usize
}

/// Fisher-Yates shuffle of `0..POINT_COUNT`.
fn generate_perm<R: Rng + ?Sized>(rng: &mut R) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..POINT_COUNT).collect();
    for i in (1..POINT_COUNT).rev() {
        let target = rng.gen_range(0..=i);
        perm.swap(i, target);
    }
    perm
}

/// Hermite-smoothed trilinear blend of the corner gradient contributions.
fn perlin_interp(c: &[[[DVec3; 2]; 2]; 2], u: f64, v: f64, w: f64) -> f64 {
    let uu = u * u * (3.0 - 2.0 * u);
    let vv = v * v * (3.0 - 2.0 * v);
    let ww = w * w * (3.0 - 2.0 * w);

    let mut accum = 0.0;
    for (i, plane) in c.iter().enumerate() {
        let fi = i as f64;
        for (j, row) in plane.iter().enumerate() {
            let fj = j as f64;
            for (k, gradient) in row.iter().enumerate() {
                let fk = k as f64;
                let weight_v = DVec3::new(u - fi, v - fj, w - fk);
                accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * gradient.dot(weight_v);
            }
        }
    }
    accum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perlin_seed_is_reproducible() {
        let a = Perlin::with_seed(42);
        let b = Perlin::with_seed(42);
        let p = DVec3::new(1.3, -7.25, 0.5);

        assert_eq!(a.noise(p).to_bits(), b.noise(p).to_bits());
        assert_eq!(a.turb(p, 7).to_bits(), b.turb(p, 7).to_bits());
    }

    #[test]
    fn test_perlin_different_seeds_differ() {
        let a = Perlin::with_seed(1);
        let b = Perlin::with_seed(2);
        let differs = (0..32).any(|i| {
            let p = DVec3::new(i as f64 * 0.37 + 0.1, i as f64 * 0.11 + 0.2, 0.3);
            a.noise(p) != b.noise(p)
        });
        assert!(differs);
    }

    #[test]
    fn test_permutation_is_complete() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut perm = generate_perm(&mut rng);
        perm.sort_unstable();
        assert_eq!(perm, (0..POINT_COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn test_noise_vanishes_on_lattice_points() {
        // Every gradient is dotted with a zero offset at its own corner.
        let perlin = Perlin::with_seed(3);
        for p in [DVec3::ZERO, DVec3::new(4.0, -2.0, 9.0), DVec3::new(-300.0, 17.0, 0.0)] {
            assert!(perlin.noise(p).abs() < 1e-12);
        }
    }

    #[test]
    fn test_noise_bounded() {
        let perlin = Perlin::with_seed(11);
        for i in 0..500 {
            let p = DVec3::new(i as f64 * 0.173, i as f64 * -0.091, i as f64 * 0.057);
            assert!(perlin.noise(p).abs() <= 1.5);
        }
    }

    #[test]
    fn test_turb_non_negative_and_zero_depth() {
        let perlin = Perlin::with_seed(5);
        let p = DVec3::new(2.7, 0.4, 0.0);
        assert!(perlin.turb(p, 7) >= 0.0);
        assert_eq!(perlin.turb(p, 0), 0.0);
        assert_eq!(perlin.turb(p, 1), perlin.noise(p).abs());
    }
}
