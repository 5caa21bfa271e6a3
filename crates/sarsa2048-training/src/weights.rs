//! Weight vector operations for linear action-value learning.
//!
//! - **Initialization**: [`zeros`] and [`gaussian`]
//! - **Update**: [`add_scaled`] performs the in-place step `w += scale · x`
//! - **Convergence**: [`l2_distance`] between successive snapshots
//! - **Persistence**: [`write_flat`] / [`read_flat`], one value per line in feature order

use std::{
    io::{self, BufRead, Write},
    iter,
    num::ParseFloatError,
};

use rand::Rng;
use rand_distr::Normal;

/// Creates a weight vector by applying a function to each index.
///
/// ```
/// use sarsa2048_training::weights;
///
/// let weights = weights::from_fn(|i| 1.0 / (i as f64 + 1.0), 4);
/// assert_eq!(weights, [1.0, 0.5, 1.0 / 3.0, 0.25]);
/// ```
pub fn from_fn<F>(mut f: F, len: usize) -> Vec<f64>
where
    F: FnMut(usize) -> f64,
{
    let mut values = Vec::with_capacity(len);
    for i in 0..len {
        values.push(f(i));
    }
    values
}

#[must_use]
pub fn zeros(len: usize) -> Vec<f64> {
    vec![0.0; len]
}

/// Standard deviation that is negative or not finite.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
#[display("invalid standard deviation {sigma}: expected a finite value >= 0")]
pub struct InvalidSigmaError {
    pub sigma: f64,
}

/// Samples every weight independently from `N(0, sigma)`.
pub fn gaussian<R>(rng: &mut R, sigma: f64, len: usize) -> Result<Vec<f64>, InvalidSigmaError>
where
    R: Rng + ?Sized,
{
    if !(sigma.is_finite() && sigma >= 0.0) {
        return Err(InvalidSigmaError { sigma });
    }
    let normal = Normal::new(0.0, sigma).map_err(|_| InvalidSigmaError { sigma })?;
    Ok(from_fn(|_| rng.sample(normal), len))
}

/// `weights += scale * direction`, element-wise.
///
/// # Panics
///
/// Panics if the slices have different lengths.
pub fn add_scaled(weights: &mut [f64], scale: f64, direction: &[f64]) {
    assert_eq!(weights.len(), direction.len());
    for (w, x) in iter::zip(weights, direction) {
        *w += scale * x;
    }
}

#[must_use]
pub fn l2_distance(a: &[f64], b: &[f64]) -> f64 {
    iter::zip(a, b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[must_use]
pub fn is_finite(weights: &[f64]) -> bool {
    weights.iter().all(|w| w.is_finite())
}

/// Writes one weight per line.
///
/// Values use Rust's shortest round-trip formatting, so [`read_flat`] restores them exactly.
pub fn write_flat<W>(weights: &[f64], mut writer: W) -> io::Result<()>
where
    W: Write,
{
    for w in weights {
        writeln!(writer, "{w:?}")?;
    }
    writer.flush()
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ReadWeightsError {
    #[display("cannot read weights: {_0}")]
    Io(io::Error),
    #[display("invalid weight on line {line}: {source}")]
    Parse { line: usize, source: ParseFloatError },
}

impl From<io::Error> for ReadWeightsError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Reads weights written by [`write_flat`]. Blank lines are skipped.
pub fn read_flat<R>(reader: R) -> Result<Vec<f64>, ReadWeightsError>
where
    R: BufRead,
{
    let mut weights = vec![];
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let w = line.parse().map_err(|source| ReadWeightsError::Parse {
            line: i + 1,
            source,
        })?;
        weights.push(w);
    }
    Ok(weights)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_add_scaled() {
        let mut w = vec![1.0, -2.0, 0.5];
        add_scaled(&mut w, 0.5, &[2.0, 2.0, -1.0]);
        assert_eq!(w, [2.0, -1.0, 0.0]);
    }

    #[test]
    fn test_l2_distance() {
        assert_eq!(l2_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(l2_distance(&[1.5], &[1.5]), 0.0);
    }

    #[test]
    fn test_gaussian_init() {
        let mut rng = Pcg32::seed_from_u64(0);
        let w = gaussian(&mut rng, 0.1, 1_000).unwrap();
        assert_eq!(w.len(), 1_000);
        assert!(is_finite(&w));
        let mean = w.iter().sum::<f64>() / 1_000.0;
        assert!(mean.abs() < 0.02, "{mean}");
    }

    #[test]
    fn test_gaussian_rejects_bad_sigma() {
        let mut rng = Pcg32::seed_from_u64(0);
        assert_eq!(
            gaussian(&mut rng, -1.0, 3),
            Err(InvalidSigmaError { sigma: -1.0 })
        );
        assert!(gaussian(&mut rng, f64::NAN, 3).is_err());
        assert!(gaussian(&mut rng, f64::INFINITY, 3).is_err());
        assert_eq!(gaussian(&mut rng, 0.0, 2), Ok(vec![0.0, 0.0]));
    }

    #[test]
    fn test_is_finite() {
        assert!(is_finite(&zeros(3)));
        assert!(!is_finite(&[1.0, f64::NAN]));
        assert!(!is_finite(&[f64::INFINITY]));
    }

    #[test]
    fn test_flat_text_roundtrip_is_exact() {
        let weights = vec![0.1, -1.0e-7, 12_345.678_9, 1.0 / 3.0, 0.0];
        let mut buf = vec![];
        write_flat(&weights, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf.clone()).unwrap().lines().count(), 5);
        assert_eq!(read_flat(buf.as_slice()).unwrap(), weights);
    }

    #[test]
    fn test_read_flat_reports_line() {
        let err = read_flat("1.0\n\nabc\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ReadWeightsError::Parse { line: 3, .. }), "{err}");
    }
}
