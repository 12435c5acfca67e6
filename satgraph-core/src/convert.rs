//! Converter configuration and pipeline entry point.
//!
//! [`ConverterBuilder`] holds the tunables and [`Converter`] runs the full
//! pipeline for one formula/backbone pair: parse, build the unified graph,
//! split into per-component samples.

use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::backbone::Backbone;
use crate::deadline::Deadline;
use crate::error::{ConvertError, Result};
use crate::graph::UnifiedGraph;
use crate::sample::GraphSample;

/// Default wall-clock budget for one formula.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1000);

/// Configures and constructs [`Converter`] instances.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use satgraph_core::ConverterBuilder;
///
/// let converter = ConverterBuilder::new()
///     .with_timeout(Duration::from_secs(30))
///     .build();
/// assert_eq!(converter.timeout(), Duration::from_secs(30));
/// ```
#[derive(Clone, Debug)]
pub struct ConverterBuilder {
    timeout: Duration,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ConverterBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the per-formula wall-clock budget.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the configured budget.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Constructs the converter.
    #[must_use]
    pub const fn build(self) -> Converter {
        Converter {
            timeout: self.timeout,
        }
    }
}

/// Entry point for converting one formula/backbone pair into graph samples.
///
/// # Examples
/// ```
/// use satgraph_core::ConverterBuilder;
///
/// let converter = ConverterBuilder::new().build();
/// let samples = converter
///     .convert("p cnf 2 2\n1 2 0\n-1 -2 0\n", "1 0\n")
///     .expect("conversion must succeed");
/// assert_eq!(samples.len(), 1);
/// assert_eq!(samples[0].node_count(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct Converter {
    timeout: Duration,
}

impl Converter {
    /// Returns the per-formula budget.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs the full pipeline under a fresh deadline.
    ///
    /// # Errors
    /// Returns [`ConvertError::Parse`] for malformed input,
    /// [`ConvertError::EmptyBackbone`] when the backbone file forces
    /// nothing, [`ConvertError::IrrelevantBackbone`] when it labels no
    /// present variable, [`ConvertError::Timeout`] when the budget is
    /// exhausted, and [`ConvertError::Inconsistency`] on internal structural
    /// failures.
    #[instrument(
        name = "convert.run",
        err,
        skip(self, cnf, backbone),
        fields(cnf_bytes = cnf.len(), timeout = ?self.timeout),
    )]
    pub fn convert(&self, cnf: &str, backbone: &str) -> Result<Vec<GraphSample>> {
        let deadline = Deadline::after(self.timeout);

        let backbone = Backbone::parse(backbone).map_err(ConvertError::from)?;
        if backbone.is_empty() {
            warn!("backbone contains no non-zero literals");
            return Err(ConvertError::EmptyBackbone);
        }

        let graph = UnifiedGraph::build(cnf, &backbone, &deadline)?;
        let samples = graph.into_samples(&deadline)?;
        info!(samples = samples.len(), "conversion completed");
        Ok(samples)
    }
}
