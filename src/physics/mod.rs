//! Shared physics support: SI constants and small closed-form helpers
//! used by more than one module builder.

/// Standard gravity (m/s^2).
pub const G: f64 = 9.806_65;
/// Elementary charge (C).
pub const E_CHARGE: f64 = 1.602_176_634e-19;
/// Proton mass (kg).
pub const M_P: f64 = 1.672_621_923_69e-27;
/// Speed of light in vacuum (m/s).
pub const C_LIGHT: f64 = 299_792_458.0;
/// Vacuum permeability (N/A^2).
pub const MU_0: f64 = 4e-7 * std::f64::consts::PI;

/// Degrees to radians.
#[must_use]
pub fn deg_to_rad(deg: f64) -> f64 {
    deg.to_radians()
}

/// Radians to degrees.
#[must_use]
pub fn rad_to_deg(rad: f64) -> f64 {
    rad.to_degrees()
}

/// Clamp `x` into `[lo, hi]`.
#[must_use]
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    x.max(lo).min(hi)
}

/// Damping classification of a series RLC circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DampingRegime {
    /// alpha < omega0
    Under,
    /// alpha ≈ omega0 (within 0.1%)
    Critical,
    /// alpha > omega0
    Over,
}

/// Series RLC characterization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesRlc {
    /// Resistance (ohm).
    pub r: f64,
    /// Inductance (H).
    pub l: f64,
    /// Capacitance (F).
    pub c: f64,
}

impl SeriesRlc {
    /// Undamped angular frequency `1/sqrt(LC)`.
    #[must_use]
    pub fn omega0(&self) -> f64 {
        1.0 / (self.l * self.c).sqrt()
    }

    /// Damping coefficient `R/(2L)`.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.r / (2.0 * self.l)
    }

    /// Damping regime relative to resonance.
    #[must_use]
    pub fn regime(&self) -> DampingRegime {
        let a = self.alpha();
        let w0 = self.omega0();
        if ((a - w0) / w0).abs() < 1e-3 {
            DampingRegime::Critical
        } else if a > w0 {
            DampingRegime::Over
        } else {
            DampingRegime::Under
        }
    }

    /// Normalized discharge waveforms for V0 = 1 over a uniform time axis.
    ///
    /// Returns `(i, q, j1, j2)` where `i` is the current (A per V), `q` the
    /// cumulative charge, `j1 = ∫i² dt` and `j2 = ∫j1 dt`. These feed the
    /// launcher module's force and energy integrals; the caller rescales by
    /// the actual V0 since the circuit is linear.
    #[must_use]
    pub fn normalized_discharge(&self, t: &[f64]) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
        let alpha = self.alpha();
        let w0 = self.omega0();
        let n = t.len();
        let mut vc = vec![0.0; n];
        let mut i = vec![0.0; n];

        if alpha < w0 * (1.0 - 1e-6) {
            let wd = (w0 * w0 - alpha * alpha).sqrt();
            for (k, &tt) in t.iter().enumerate() {
                let env = (-alpha * tt).exp();
                vc[k] = env * ((wd * tt).cos() + (alpha / wd) * (wd * tt).sin());
                i[k] = (1.0 / (self.l * wd)) * env * (wd * tt).sin();
            }
        } else if ((alpha - w0) / w0).abs() <= 1e-6 {
            for (k, &tt) in t.iter().enumerate() {
                let env = (-alpha * tt).exp();
                vc[k] = env * (1.0 + alpha * tt);
                i[k] = (tt / self.l) * env;
            }
        } else {
            let beta = (alpha * alpha - w0 * w0).sqrt();
            let s1 = -alpha + beta;
            let s2 = -alpha - beta;
            for (k, &tt) in t.iter().enumerate() {
                vc[k] = (s2 * (s1 * tt).exp() - s1 * (s2 * tt).exp()) / (s2 - s1);
                i[k] = (1.0 / self.l) * ((s1 * tt).exp() - (s2 * tt).exp()) / (s1 - s2);
            }
        }

        // q = C*(1 - vc) for V0 = 1
        let q: Vec<f64> = vc.iter().map(|&v| self.c * (1.0 - v)).collect();

        let dt = if n >= 2 { t[1] - t[0] } else { 0.0 };
        let i2: Vec<f64> = i.iter().map(|&x| x * x).collect();
        let j1 = crate::numeric::cumulative_trapezoid(&i2, dt);
        let j2 = crate::numeric::cumulative_trapezoid(&j1, dt);
        (i, q, j1, j2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::linspace;

    #[test]
    fn angle_conversions_round_trip() {
        assert!((deg_to_rad(180.0) - std::f64::consts::PI).abs() < 1e-12);
        assert!((rad_to_deg(std::f64::consts::PI) - 180.0).abs() < 1e-12);
    }

    #[test]
    fn clamp_bounds() {
        assert!((clamp(5.0, 0.0, 1.0) - 1.0).abs() < 1e-12);
        assert!((clamp(-5.0, 0.0, 1.0)).abs() < 1e-12);
        assert!((clamp(0.5, 0.0, 1.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn rlc_regimes() {
        let under = SeriesRlc { r: 1.0, l: 1e-3, c: 1e-6 };
        assert_eq!(under.regime(), DampingRegime::Under);
        let over = SeriesRlc { r: 1000.0, l: 1e-3, c: 1e-6 };
        assert_eq!(over.regime(), DampingRegime::Over);
        // critical: R = 2*sqrt(L/C)
        let rc = 2.0 * (1e-3f64 / 1e-6).sqrt();
        let crit = SeriesRlc { r: rc, l: 1e-3, c: 1e-6 };
        assert_eq!(crit.regime(), DampingRegime::Critical);
    }

    #[test]
    fn discharge_initial_conditions() {
        let rlc = SeriesRlc { r: 0.008, l: 30e-6, c: 2e-3 };
        let t = linspace(0.0, 0.02, 520);
        let (i, q, j1, j2) = rlc.normalized_discharge(&t);
        assert!(i[0].abs() < 1e-12, "current starts at zero");
        assert!(q[0].abs() < 1e-12, "no charge transferred at t=0");
        assert!(j1[0].abs() < 1e-12);
        assert!(j2[0].abs() < 1e-12);
        // integrals are monotone non-decreasing
        assert!(j1.windows(2).all(|w| w[1] >= w[0]));
        assert!(j2.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn discharge_underdamped_oscillates() {
        let rlc = SeriesRlc { r: 0.002, l: 60e-6, c: 0.5e-3 };
        assert_eq!(rlc.regime(), DampingRegime::Under);
        let t = linspace(0.0, 0.02, 2000);
        let (i, _, _, _) = rlc.normalized_discharge(&t);
        // an underdamped discharge swings negative
        assert!(i.iter().any(|&x| x < 0.0));
    }

    #[test]
    fn discharge_overdamped_stays_positive() {
        let rlc = SeriesRlc { r: 0.030, l: 10e-6, c: 5e-3 };
        assert_eq!(rlc.regime(), DampingRegime::Over);
        let t = linspace(0.0, 0.02, 2000);
        let (i, _, _, _) = rlc.normalized_discharge(&t);
        assert!(i.iter().all(|&x| x >= -1e-12));
    }
}
