// Local Crate Imports
use crate::{GnpsError, Result, Tolerances};

// Public API ==========================================================================================================

impl Tolerances {
    pub fn new(mass: impl Into<f64>, retention_time: impl Into<f64>) -> Result<Self> {
        let mass = mass.into();
        let retention_time = retention_time.into();

        // NOTE: Written so that NaN fails both checks, as well as zero, negative and infinite widths
        let valid = |tolerance: f64| tolerance.is_finite() && tolerance > 0.0;
        if valid(mass) && valid(retention_time) {
            Ok(Self {
                mass,
                retention_time,
            })
        } else {
            Err(GnpsError::InvalidTolerances {
                mass,
                retention_time,
            })
        }
    }

    #[must_use]
    pub const fn mass(&self) -> f64 {
        self.mass
    }

    #[must_use]
    pub const fn retention_time(&self) -> f64 {
        self.retention_time
    }

    /// Strict containment: a value exactly one tolerance away from the query is *outside* of the window
    pub(crate) fn mass_contains(&self, query: f64, value: f64) -> bool {
        (value - query).abs() < self.mass
    }

    pub(crate) fn retention_time_contains(&self, query: f64, value: f64) -> bool {
        (value - query).abs() < self.retention_time
    }
}

// Module Tests ========================================================================================================
