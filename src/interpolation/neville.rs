//! Neville's polynomial interpolation
use crate::InterpolationError;

/// Scratch area of the Neville tableau. Keep one around
/// to interpolate repeatedly without allocating.
#[derive(Debug, Default, Clone)]
pub struct Tableau {
    c: Vec<f64>,
    d: Vec<f64>,
}

impl Tableau {
    /// Builds a [Tableau] that will not reallocate for up to
    /// `samples` samples of up to 3 components.
    pub fn with_capacity(samples: usize) -> Self {
        let len = samples.saturating_mul(3);
        Self {
            c: Vec::with_capacity(len),
            d: Vec::with_capacity(len),
        }
    }
    fn prepare(&mut self, len: usize) {
        self.c.clear();
        self.c.resize(len, 0.0);
        self.d.clear();
        self.d.resize(len, 0.0);
    }
}

/// Runs the tableau walk for N components sharing the same abscissas.
/// Component k lives in `c[k*mm..(k+1)*mm]` (`d` likewise).
fn walk<const N: usize>(
    x: f64,
    t: &[f64],
    y: [&[f64]; N],
    from: usize,
    mm: usize,
    tableau: &mut Tableau,
) -> Result<([f64; N], [f64; N]), InterpolationError> {
    let available = y.iter().fold(t.len(), |len, y| len.min(y.len()));
    if mm == 0 || from + mm > available {
        return Err(InterpolationError::NotEnoughSamples {
            required: mm,
            from,
            available,
        });
    }

    let t = &t[from..from + mm];
    tableau.prepare(N * mm);
    for (k, y) in y.iter().enumerate() {
        let y = &y[from..from + mm];
        tableau.c[k * mm..(k + 1) * mm].copy_from_slice(y);
        tableau.d[k * mm..(k + 1) * mm].copy_from_slice(y);
    }

    // start from the nearest sample
    let mut nearest = 0;
    let mut gap = (x - t[0]).abs();
    for (i, ti) in t.iter().enumerate().skip(1) {
        let dt = (x - ti).abs();
        if dt < gap {
            nearest = i;
            gap = dt;
        }
    }

    let mut value = [0.0_f64; N];
    let mut error = [0.0_f64; N];
    for k in 0..N {
        value[k] = y[k][from + nearest];
    }

    let mut ns = nearest as isize - 1;

    for m in 1..mm {
        for i in 0..mm - m {
            let ho = t[i] - x;
            let hp = t[i + m] - x;
            let den = ho - hp;
            if den == 0.0 {
                return Err(InterpolationError::CoincidentAbscissas);
            }
            for k in 0..N {
                let offset = k * mm;
                let w = tableau.c[offset + i + 1] - tableau.d[offset + i];
                tableau.d[offset + i] = hp * w / den;
                tableau.c[offset + i] = ho * w / den;
            }
        }
        // stay centered on x: go up (c) or down (d) the tableau
        let upwards = 2 * (ns + 1) < (mm - m) as isize;
        for k in 0..N {
            let offset = k * mm;
            let dy = if upwards {
                tableau.c[offset + (ns + 1) as usize]
            } else {
                tableau.d[offset + ns as usize]
            };
            value[k] += dy;
            error[k] = dy;
        }
        if !upwards {
            ns -= 1;
        }
    }
    Ok((value, error))
}

/// Interpolates `y(x)` from the `mm` samples `(t[from..], y[from..])`.
/// Returns the interpolated value and its error estimate, which is
/// the last correction applied.
pub fn neville_interpolation(
    x: f64,
    t: &[f64],
    y: &[f64],
    from: usize,
    mm: usize,
    tableau: &mut Tableau,
) -> Result<(f64, f64), InterpolationError> {
    let (value, error) = walk::<1>(x, t, [y], from, mm, tableau)?;
    Ok((value[0], error[0]))
}

/// Interpolates 3 components sharing the same abscissas at once.
/// Each component has its own tableau: results are identical to
/// three [neville_interpolation] calls.
pub fn neville_interpolation3(
    x: f64,
    t: &[f64],
    y: [&[f64]; 3],
    from: usize,
    mm: usize,
    tableau: &mut Tableau,
) -> Result<([f64; 3], [f64; 3]), InterpolationError> {
    walk::<3>(x, t, y, from, mm, tableau)
}

/// [neville_interpolation] with a temporary [Tableau].
pub fn interpolate(
    x: f64,
    t: &[f64],
    y: &[f64],
    from: usize,
    mm: usize,
) -> Result<(f64, f64), InterpolationError> {
    neville_interpolation(x, t, y, from, mm, &mut Tableau::with_capacity(mm))
}

/// [neville_interpolation3] with a temporary [Tableau].
pub fn interpolate3(
    x: f64,
    t: &[f64],
    y: [&[f64]; 3],
    from: usize,
    mm: usize,
) -> Result<([f64; 3], [f64; 3]), InterpolationError> {
    neville_interpolation3(x, t, y, from, mm, &mut Tableau::with_capacity(mm))
}
