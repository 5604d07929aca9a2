//! Radial pair-distribution functions from scattering intensities.
//!
//! Given a scattering intensity $`I(q)`$ sampled on a uniform grid of momentum transfers $`q`$
//! (atomic units), the pair-distribution function is obtained by the sine transform
//!
//! ```math
//! P(r) = \frac{r}{\pi} \int_0^{q_{\mathrm{max}}} I(q) \sin(rq) q \, \mathrm{d}q,
//! ```
//!
//! evaluated on a grid of $`n`$ points spanning $`[0, 1/\Delta q]`$, where $`n`$ is the number of
//! $`q`$ samples. The electron–electron interaction energy follows as
//! $`V_{ee} = \int P(r)/r \, \mathrm{d}r`$.

use std::f64::consts::PI;
use std::fmt;

use anyhow::{self, ensure};
use derive_builder::Builder;
use ndarray::{Array1, ArrayView1, ArrayView2, Zip};
use serde::{Deserialize, Serialize};


/// Integrates uniformly spaced samples with the composite trapezoidal rule.
///
/// # Arguments
///
/// * `y` - The sampled function values.
/// * `dx` - The spacing between consecutive samples.
///
/// # Returns
///
/// The integral, which is zero if there are fewer than two samples.
pub fn trapezoid(y: ArrayView1<f64>, dx: f64) -> f64 {
    let n = y.len();
    if n < 2 {
        return 0.0;
    }
    dx * (y.sum() - 0.5 * (y[0] + y[n - 1]))
}

/// A structure containing a pair-distribution function and its derived quantities.
#[derive(Builder, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairDistribution {
    /// The radial grid.
    pub r: Array1<f64>,

    /// The pair-distribution function on [`Self::r`].
    pub pdf: Array1<f64>,

    /// The integrand of the electron–electron interaction energy, $`P(r)/r`$, set to zero at
    /// $`r = 0`$.
    pub vee_integrand: Array1<f64>,

    /// The integral of the pair-distribution function over [`Self::r`].
    pub integral: f64,

    /// The electron–electron interaction energy.
    pub v_ee: f64,
}

impl PairDistribution {
    /// Returns a builder to construct a new pair distribution.
    fn builder() -> PairDistributionBuilder {
        PairDistributionBuilder::default()
    }

    /// Returns the spacing of the radial grid.
    pub fn dr(&self) -> f64 {
        if self.r.len() < 2 {
            0.0
        } else {
            self.r[1] - self.r[0]
        }
    }

    /// Returns the rows `r pdf vee_integrand` of the pair distribution as text.
    pub fn table_lines(&self) -> Vec<String> {
        std::iter::once(format!(
            "# {:>20} {:>22} {:>22}",
            "r", "pdf", "vee_integrand"
        ))
        .chain(
            Zip::from(&self.r)
                .and(&self.pdf)
                .and(&self.vee_integrand)
                .map_collect(|r, p, v| format!("{r:>22.14e} {p:>22.14e} {v:>22.14e}"))
                .into_raw_vec(),
        )
        .collect()
    }
}

impl fmt::Display for PairDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Radial grid points: {}", self.r.len())?;
        if let Some(r_max) = self.r.iter().last() {
            writeln!(
                f,
                "Radial grid: [{:.6}, {r_max:.6}] (dr = {:.6e})",
                self.r[0],
                self.dr()
            )?;
        }
        writeln!(f, "Integral = {:10.8}", self.integral)?;
        writeln!(f, "V_ee     = {:10.8}", self.v_ee)?;
        Ok(())
    }
}

/// Computes the pair-distribution function of a scattering intensity.
///
/// # Arguments
///
/// * `data` - A two-column table with the momentum transfers $`q`$ in the first column and the
/// intensities $`I(q)`$ in the second. The $`q`$ values must be uniformly spaced and increasing.
///
/// # Errors
///
/// Errors if the table does not have exactly two columns, has fewer than two rows, or if the
/// $`q`$ spacing is not positive and finite.
pub fn calc_pdf(data: ArrayView2<f64>) -> Result<PairDistribution, anyhow::Error> {
    ensure!(
        data.ncols() == 2,
        "Scattering data must have exactly two columns, but {} were found.",
        data.ncols()
    );
    ensure!(
        data.nrows() >= 2,
        "Scattering data must have at least two rows, but {} were found.",
        data.nrows()
    );
    let q = data.column(0);
    let intensity = data.column(1);
    let dq = q[1] - q[0];
    ensure!(
        dq.is_finite() && dq > 0.0,
        "The q spacing must be positive and finite, but {dq} was found."
    );

    let n = q.len();
    let r = Array1::linspace(0.0, 1.0 / dq, n);
    let iq = &intensity * &q;
    let pdf = r.mapv(|rr| {
        let integrand = Zip::from(&iq)
            .and(q)
            .map_collect(|iqi, qi| iqi * (rr * qi).sin());
        rr / PI * trapezoid(integrand.view(), dq)
    });
    let dr = r[1] - r[0];
    let integral = trapezoid(pdf.view(), dr);
    log::debug!("Integral of pair-distribution function: {integral:10.8}");

    let vee_integrand = Zip::from(&pdf)
        .and(&r)
        .map_collect(|&p, &rr| if rr == 0.0 { 0.0 } else { p / rr });
    let v_ee = trapezoid(vee_integrand.view(), dr);
    log::debug!("Electron-electron interaction energy: {v_ee:10.8}");

    PairDistribution::builder()
        .r(r)
        .pdf(pdf)
        .vee_integrand(vee_integrand)
        .integral(integral)
        .v_ee(v_ee)
        .build()
        .map_err(|err| anyhow::format_err!(err))
}

/// Computes the elementwise percentage difference $`|a - b| / a \times 100`$.
///
/// No special treatment is given to zeros in `a`, which yield infinities or NaNs.
///
/// # Errors
///
/// Errors if `a` and `b` have different lengths.
pub fn percentage_difference(
    a: ArrayView1<f64>,
    b: ArrayView1<f64>,
) -> Result<Array1<f64>, anyhow::Error> {
    ensure!(
        a.len() == b.len(),
        "Cannot compare arrays of lengths {} and {}.",
        a.len(),
        b.len()
    );
    Ok(Zip::from(&a)
        .and(&b)
        .map_collect(|&x, &y| (x - y).abs() / x * 100.0))
}

/// A structure containing the comparison of two scattering calculations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScatteringComparison {
    /// The momentum transfers of the reference calculation.
    pub q: Array1<f64>,

    /// The percentage difference of the intensities relative to the reference.
    pub intensity_difference: Array1<f64>,

    /// The percentage difference of the pair-distribution functions relative to the reference.
    pub pdf_difference: Array1<f64>,
}

impl ScatteringComparison {
    /// Returns the rows `q intensity_difference r pdf_difference` of the comparison as text.
    pub fn table_lines(&self, r: ArrayView1<f64>) -> Vec<String> {
        std::iter::once(format!(
            "# {:>20} {:>22} {:>22} {:>22}",
            "q", "intensity_diff_%", "r", "pdf_diff_%"
        ))
        .chain(
            Zip::from(&self.q)
                .and(&self.intensity_difference)
                .and(&r)
                .and(&self.pdf_difference)
                .map_collect(|q, di, r, dp| {
                    format!("{q:>22.14e} {di:>22.14e} {r:>22.14e} {dp:>22.14e}")
                })
                .into_raw_vec(),
        )
        .collect()
    }
}

/// Compares two scattering calculations sampled on the same grid.
///
/// # Arguments
///
/// * `reference` - The two-column scattering table of the reference calculation.
/// * `other` - The two-column scattering table of the other calculation.
/// * `pdf_reference` - The pair distribution of the reference calculation.
/// * `pdf_other` - The pair distribution of the other calculation.
pub fn compare(
    reference: ArrayView2<f64>,
    other: ArrayView2<f64>,
    pdf_reference: &PairDistribution,
    pdf_other: &PairDistribution,
) -> Result<ScatteringComparison, anyhow::Error> {
    ensure!(
        reference.nrows() == other.nrows(),
        "Scattering tables have different numbers of rows: {} and {}.",
        reference.nrows(),
        other.nrows()
    );
    let intensity_difference = percentage_difference(reference.column(1), other.column(1))?;
    let pdf_difference = percentage_difference(pdf_reference.pdf.view(), pdf_other.pdf.view())?;
    Ok(ScatteringComparison {
        q: reference.column(0).to_owned(),
        intensity_difference,
        pdf_difference,
    })
}
