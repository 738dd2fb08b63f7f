//! GMM Backends
//!
//! The mixture fit is delegated to an external library. A backend turns an
//! [`OptionSet`] into a configured model ([`GmmBackend::prepare`]); calling
//! [`PreparedFit::fit`] on that model is the only part of a run that is timed.
//!
//! ## Backends
//!
//! - [`LinfaBackend`]: `linfa-clustering`'s `GaussianMixtureModel`. Honors
//!   every option but only implements the `full` covariance structure.
//! - `AprenderBackend` (feature `aprender`, on by default): `aprender`'s
//!   `GaussianMixture`, which implements all four covariance structures.
//!   Component count, covariance type, `max_iter`, `tol` and seed are
//!   forwarded; `reg_covar`, `n_init` and `init_params` have no counterpart.
//! - [`LibraryBackend`]: default dispatch. `full` goes to linfa, the other
//!   structures go to aprender. Built without `aprender`, linfa gets them and
//!   rejects them as unsupported.

use crate::options::{CovarianceType, InitMethod, OptionSet};
use linfa::DatasetBase;
use linfa::ParamGuard;
use linfa::traits::Fit;
use linfa_clustering::{GaussianMixtureModel, GmmCovarType, GmmError, GmmInitMethod, GmmValidParams};
use ndarray::Array2;
use rand_xoshiro::Xoshiro256Plus;
use rand_xoshiro::rand_core::SeedableRng;
use thiserror::Error;

/// Failure while building or fitting a model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FitError {
    /// The backend does not implement the requested parameter value
    #[error("{backend} does not support {parameter} = {value}")]
    Unsupported {
        /// Backend name
        backend: &'static str,
        /// Option name
        parameter: &'static str,
        /// Requested value
        value: String,
    },

    /// The library's parameter validation refused the configuration
    #[error("Parameters rejected: {0}")]
    Rejected(String),

    /// EM stopped at `max_iter` without reaching `tol`
    #[error("Did not converge: {0}")]
    NotConverged(String),

    /// Any other library error
    #[error("Fit failed: {0}")]
    Library(String),
}

/// A configured model, ready to be fit once.
pub trait PreparedFit {
    /// Fit the model to `data` (`n_samples x n_features`), discarding the fitted parameters.
    fn fit(self: Box<Self>, data: Array2<f64>) -> Result<(), FitError>;
}

/// Factory for configured GMM models.
pub trait GmmBackend: Send + Sync {
    /// Short backend name used in logs and reports
    fn name(&self) -> &'static str;

    /// Build a model from `options`. Parameters the library cannot honor are rejected here.
    fn prepare(&self, options: &OptionSet) -> Result<Box<dyn PreparedFit>, FitError>;
}

// ─── linfa ───────────────────────────────────────────────────────────────────

/// `linfa-clustering` Gaussian mixture
#[derive(Debug, Default, Clone, Copy)]
pub struct LinfaBackend;

impl GmmBackend for LinfaBackend {
    fn name(&self) -> &'static str {
        "linfa"
    }

    fn prepare(&self, options: &OptionSet) -> Result<Box<dyn PreparedFit>, FitError> {
        if options.covariance_type != CovarianceType::Full {
            return Err(FitError::Unsupported {
                backend: self.name(),
                parameter: "covariance_type",
                value: options.covariance_type.to_string(),
            });
        }

        let init_method = match options.init_params {
            InitMethod::KMeans => GmmInitMethod::KMeans,
            InitMethod::Random => GmmInitMethod::Random,
        };

        let params = GaussianMixtureModel::<f64>::params(options.components)
            .covariance_type(GmmCovarType::Full)
            .tolerance(options.tol)
            .reg_covariance(options.reg_covar)
            .max_n_iterations(options.max_iter)
            .n_runs(options.n_init)
            .init_method(init_method)
            .with_rng(Xoshiro256Plus::seed_from_u64(options.seed))
            .check()
            .map_err(classify_linfa_error)?;

        Ok(Box::new(LinfaFit { params }))
    }
}

struct LinfaFit {
    params: GmmValidParams<f64, Xoshiro256Plus>,
}

impl PreparedFit for LinfaFit {
    fn fit(self: Box<Self>, data: Array2<f64>) -> Result<(), FitError> {
        let dataset = DatasetBase::from(data);
        self.params
            .fit(&dataset)
            .map(|_model| ())
            .map_err(classify_linfa_error)
    }
}

fn classify_linfa_error(err: GmmError) -> FitError {
    match err {
        GmmError::InvalidValue(msg) => FitError::Rejected(msg),
        GmmError::NotConverged(msg) => FitError::NotConverged(msg),
        other => FitError::Library(other.to_string()),
    }
}

// ─── aprender ────────────────────────────────────────────────────────────────

#[cfg(feature = "aprender")]
pub use aprender_backend::AprenderBackend;

#[cfg(feature = "aprender")]
mod aprender_backend {
    use super::{FitError, GmmBackend, PreparedFit};
    use crate::options::{CovarianceType, OptionSet};
    use aprender::prelude as apr;
    use ndarray::Array2;

    /// `aprender` Gaussian mixture
    #[derive(Debug, Default, Clone, Copy)]
    pub struct AprenderBackend;

    impl GmmBackend for AprenderBackend {
        fn name(&self) -> &'static str {
            "aprender"
        }

        fn prepare(&self, options: &OptionSet) -> Result<Box<dyn PreparedFit>, FitError> {
            let config = AprenderConfig::from_options(options)?;
            tracing::debug!(
                reg_covar = options.reg_covar,
                n_init = options.n_init,
                init_params = %options.init_params,
                "aprender uses its own defaults for these options"
            );
            Ok(Box::new(AprenderFit {
                model: config.build(),
            }))
        }
    }

    /// Settings handed to `GaussianMixture`
    #[derive(Debug, Clone, Copy, PartialEq)]
    struct AprenderConfig {
        components: usize,
        covariance: CovarianceType,
        max_iter: usize,
        tol: f32,
        seed: u64,
    }

    impl AprenderConfig {
        fn from_options(options: &OptionSet) -> Result<Self, FitError> {
            if options.components == 0 {
                return Err(FitError::Rejected(
                    "number of components must be positive".to_string(),
                ));
            }
            if options.max_iter == 0 {
                return Err(FitError::Rejected("max_iter must be positive".to_string()));
            }
            let max_iter = usize::try_from(options.max_iter).map_err(|_| {
                FitError::Rejected(format!("max_iter {} exceeds usize", options.max_iter))
            })?;

            // aprender computes in f32
            let tol = options.tol as f32;
            if !(tol.is_finite() && tol > 0.0) {
                return Err(FitError::Rejected(format!(
                    "tol must be a positive f32, got {}",
                    options.tol
                )));
            }

            Ok(Self {
                components: options.components,
                covariance: options.covariance_type,
                max_iter,
                tol,
                seed: options.seed,
            })
        }

        fn build(self) -> apr::GaussianMixture {
            let covariance = match self.covariance {
                CovarianceType::Full => apr::CovarianceType::Full,
                CovarianceType::Tied => apr::CovarianceType::Tied,
                CovarianceType::Diag => apr::CovarianceType::Diag,
                CovarianceType::Spherical => apr::CovarianceType::Spherical,
            };
            apr::GaussianMixture::new(self.components, covariance)
                .with_max_iter(self.max_iter)
                .with_tol(self.tol)
                .with_random_state(self.seed)
        }
    }

    struct AprenderFit {
        model: apr::GaussianMixture,
    }

    impl PreparedFit for AprenderFit {
        fn fit(self: Box<Self>, data: Array2<f64>) -> Result<(), FitError> {
            let (rows, cols) = data.dim();
            let values: Vec<f32> = data.iter().map(|&v| v as f32).collect();
            let matrix = apr::Matrix::from_vec(rows, cols, values)
                .map_err(|e| FitError::Library(e.to_string()))?;

            let mut model = self.model;
            {
                use aprender::prelude::*;
                model.fit(&matrix).map_err(|e| FitError::Library(e.to_string()))
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_config_forwards_iteration_limits() {
            let options = OptionSet {
                components: 3,
                covariance_type: CovarianceType::Diag,
                max_iter: 5,
                tol: 1e-9,
                seed: 11,
                ..OptionSet::default()
            };
            let config = AprenderConfig::from_options(&options).unwrap();
            assert_eq!(
                config,
                AprenderConfig {
                    components: 3,
                    covariance: CovarianceType::Diag,
                    max_iter: 5,
                    tol: 1e-9,
                    seed: 11,
                }
            );
        }

        #[test]
        fn test_default_options_keep_defaults() {
            let config = AprenderConfig::from_options(&OptionSet::default()).unwrap();
            assert_eq!(config.max_iter, 100);
            assert_eq!(config.tol, 0.001);
        }

        #[test]
        fn test_rejects_unusable_limits() {
            for options in [
                OptionSet {
                    max_iter: 0,
                    ..OptionSet::default()
                },
                OptionSet {
                    tol: 0.0,
                    ..OptionSet::default()
                },
                OptionSet {
                    tol: -1.0,
                    ..OptionSet::default()
                },
                OptionSet {
                    components: 0,
                    ..OptionSet::default()
                },
            ] {
                let err = AprenderBackend.prepare(&options).err();
                assert!(matches!(err, Some(FitError::Rejected(_))), "{options:?}");
            }
        }
    }
}

// ─── dispatch ────────────────────────────────────────────────────────────────

/// Default backend: picks the library implementing the requested covariance structure.
#[derive(Debug, Default, Clone, Copy)]
pub struct LibraryBackend;

impl LibraryBackend {
    fn select(covariance: CovarianceType) -> &'static dyn GmmBackend {
        match covariance {
            CovarianceType::Full => &LinfaBackend,
            #[cfg(feature = "aprender")]
            _ => &AprenderBackend,
            #[cfg(not(feature = "aprender"))]
            _ => &LinfaBackend,
        }
    }
}

impl GmmBackend for LibraryBackend {
    fn name(&self) -> &'static str {
        "library"
    }

    fn prepare(&self, options: &OptionSet) -> Result<Box<dyn PreparedFit>, FitError> {
        let backend = Self::select(options.covariance_type);
        tracing::debug!(backend = backend.name(), covariance_type = %options.covariance_type, "selected GMM backend");
        backend.prepare(options)
    }
}
