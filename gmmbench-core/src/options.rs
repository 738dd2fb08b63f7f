//! GMM Option Parsing
//!
//! Turns a flat option string such as `-g 3 --covariance_type diag --tol 1e-4`
//! into a typed [`OptionSet`]. Every flag is optional and falls back to its
//! default.
//!
//! | flag                | field             | default  |
//! |---------------------|-------------------|----------|
//! | `-g`                | `components`      | 1        |
//! | `-n`                | `iterations`      | 250      |
//! | `-s`                | `seed`            | 0        |
//! | `--covariance_type` | `covariance_type` | `full`   |
//! | `--tol`             | `tol`             | 0.001    |
//! | `--reg_covar`       | `reg_covar`       | 1e-6     |
//! | `--max_iter`        | `max_iter`        | 100      |
//! | `--n_init`          | `n_init`          | 1        |
//! | `--init_params`     | `init_params`     | `kmeans` |
//!
//! Tokens are whitespace separated. A flag takes the next token as its value,
//! and `--flag=value` is accepted too. Unknown tokens are ignored and the
//! first occurrence of a repeated flag wins.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Validation failure in an option string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    /// `--covariance_type` outside full/tied/diag/spherical
    #[error("Invalid covariance type: {0}. Must be either full, tied, diag or spherical")]
    InvalidCovarianceType(String),

    /// `--init_params` outside kmeans/random
    #[error("Invalid init_params: {0}. Must be either kmeans or random")]
    InvalidInitMethod(String),

    /// A flag was the last token, or followed by another flag
    #[error("Missing value for option {0}")]
    MissingValue(&'static str),

    /// A numeric flag's value does not parse
    #[error("Invalid value for option {flag}: {value:?}")]
    InvalidValue {
        /// Flag as written
        flag: &'static str,
        /// Offending value
        value: String,
    },
}

/// Structure of the per-component covariance matrices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CovarianceType {
    /// Each component has its own general covariance matrix
    #[default]
    Full,
    /// All components share one general covariance matrix
    Tied,
    /// Each component has its own diagonal covariance matrix
    Diag,
    /// Each component has its own single variance
    Spherical,
}

impl CovarianceType {
    /// Option value as written on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            CovarianceType::Full => "full",
            CovarianceType::Tied => "tied",
            CovarianceType::Diag => "diag",
            CovarianceType::Spherical => "spherical",
        }
    }
}

impl FromStr for CovarianceType {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(CovarianceType::Full),
            "tied" => Ok(CovarianceType::Tied),
            "diag" => Ok(CovarianceType::Diag),
            "spherical" => Ok(CovarianceType::Spherical),
            other => Err(OptionError::InvalidCovarianceType(other.to_string())),
        }
    }
}

impl fmt::Display for CovarianceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy used to initialize the components before EM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InitMethod {
    /// Responsibilities from a k-means clustering
    #[default]
    KMeans,
    /// Random responsibilities
    Random,
}

impl InitMethod {
    /// Option value as written on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            InitMethod::KMeans => "kmeans",
            InitMethod::Random => "random",
        }
    }
}

impl FromStr for InitMethod {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kmeans" => Ok(InitMethod::KMeans),
            "random" => Ok(InitMethod::Random),
            other => Err(OptionError::InvalidInitMethod(other.to_string())),
        }
    }
}

impl fmt::Display for InitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognized flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Flag {
    Components,
    Iterations,
    Seed,
    CovarianceType,
    Tol,
    RegCovar,
    MaxIter,
    NInit,
    InitParams,
}

impl Flag {
    const ALL: [Flag; 9] = [
        Flag::Components,
        Flag::Iterations,
        Flag::Seed,
        Flag::CovarianceType,
        Flag::Tol,
        Flag::RegCovar,
        Flag::MaxIter,
        Flag::NInit,
        Flag::InitParams,
    ];

    fn name(self) -> &'static str {
        match self {
            Flag::Components => "-g",
            Flag::Iterations => "-n",
            Flag::Seed => "-s",
            Flag::CovarianceType => "--covariance_type",
            Flag::Tol => "--tol",
            Flag::RegCovar => "--reg_covar",
            Flag::MaxIter => "--max_iter",
            Flag::NInit => "--n_init",
            Flag::InitParams => "--init_params",
        }
    }

    fn lookup(token: &str) -> Option<Flag> {
        Self::ALL.into_iter().find(|flag| flag.name() == token)
    }
}

/// Typed GMM configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSet {
    /// Number of mixture components (`-g`)
    pub components: usize,
    /// Legacy iteration count (`-n`); the EM cap is `max_iter`
    pub iterations: u64,
    /// Random seed (`-s`)
    pub seed: u64,
    /// Covariance structure (`--covariance_type`)
    pub covariance_type: CovarianceType,
    /// Convergence threshold on the lower bound gain (`--tol`)
    pub tol: f64,
    /// Non-negative regularization added to covariance diagonals (`--reg_covar`)
    pub reg_covar: f64,
    /// Maximum EM iterations (`--max_iter`)
    pub max_iter: u64,
    /// Number of initializations; the best one is kept (`--n_init`)
    pub n_init: u64,
    /// Initialization strategy (`--init_params`)
    pub init_params: InitMethod,
}

impl Default for OptionSet {
    fn default() -> Self {
        Self {
            components: 1,
            iterations: 250,
            seed: 0,
            covariance_type: CovarianceType::Full,
            tol: 0.001,
            reg_covar: 1e-6,
            max_iter: 100,
            n_init: 1,
            init_params: InitMethod::KMeans,
        }
    }
}

impl OptionSet {
    /// Parse an option string, applying defaults for absent flags.
    pub fn parse(options: &str) -> Result<Self, OptionError> {
        let raw = collect_flags(options)?;
        let mut set = OptionSet::default();

        for (flag, value) in raw {
            match flag {
                Flag::Components => set.components = parse_value(flag, value)?,
                Flag::Iterations => set.iterations = parse_value(flag, value)?,
                Flag::Seed => set.seed = parse_value(flag, value)?,
                Flag::CovarianceType => set.covariance_type = value.parse()?,
                Flag::Tol => set.tol = parse_value(flag, value)?,
                Flag::RegCovar => set.reg_covar = parse_value(flag, value)?,
                Flag::MaxIter => set.max_iter = parse_value(flag, value)?,
                Flag::NInit => set.n_init = parse_value(flag, value)?,
                Flag::InitParams => set.init_params = value.parse()?,
            }
        }

        Ok(set)
    }
}

/// Split the option string into raw flag values, keeping the first occurrence.
fn collect_flags(options: &str) -> Result<BTreeMap<Flag, &str>, OptionError> {
    let tokens: Vec<&str> = options.split_whitespace().collect();
    let mut raw = BTreeMap::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i];
        i += 1;

        let (flag, value) = if let Some(flag) = Flag::lookup(token) {
            match tokens.get(i) {
                Some(next) if Flag::lookup(next).is_none() && !is_assignment(next) => {
                    i += 1;
                    (flag, *next)
                }
                _ => return Err(OptionError::MissingValue(flag.name())),
            }
        } else if let Some((name, value)) = token.split_once('=') {
            match Flag::lookup(name) {
                Some(flag) if value.is_empty() => {
                    return Err(OptionError::MissingValue(flag.name()));
                }
                Some(flag) => (flag, value),
                None => {
                    tracing::debug!(token, "ignoring unrecognized option");
                    continue;
                }
            }
        } else {
            tracing::debug!(token, "ignoring unrecognized option");
            continue;
        };

        if raw.contains_key(&flag) {
            tracing::warn!(flag = flag.name(), value, "repeated option ignored");
        } else {
            raw.insert(flag, value);
        }
    }

    Ok(raw)
}

fn is_assignment(token: &str) -> bool {
    token
        .split_once('=')
        .is_some_and(|(name, _)| Flag::lookup(name).is_some())
}

fn parse_value<T: FromStr>(flag: Flag, value: &str) -> Result<T, OptionError> {
    value.parse().map_err(|_| OptionError::InvalidValue {
        flag: flag.name(),
        value: value.to_string(),
    })
}
