//! Per-occurrence gauge selection.

use std::sync::Arc;

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

use super::Gauge;
use crate::error::{CompileError, CompileResult};

/// Tolerance on the sum of an explicit probability vector.
const PROBABILITY_SUM_TOLERANCE: f64 = 1e-9;

/// How a [`GaugeSelector`] chooses among its gauges.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Selection {
    /// Every gauge equally likely.
    #[default]
    Uniform,
    /// Proportional to [`Gauge::weight`].
    Weighted,
    /// Explicit probabilities, one per gauge, summing to one.
    Probabilities(Vec<f64>),
}

/// An ordered list of gauges plus a selection policy.
///
/// The selector holds no random state; callers pass the generator in and
/// each call to [`GaugeSelector::select`] consumes exactly one draw.
#[derive(Debug, Clone)]
pub struct GaugeSelector {
    gauges: Vec<Arc<dyn Gauge>>,
    selection: Selection,
    index: Option<WeightedIndex<f64>>,
}

impl GaugeSelector {
    /// Create a selector, validating the policy against the gauges.
    pub fn new(gauges: Vec<Arc<dyn Gauge>>, selection: Selection) -> CompileResult<Self> {
        if gauges.is_empty() {
            return Err(CompileError::InvalidConfiguration(
                "gauge selector needs at least one gauge".into(),
            ));
        }
        let index = match &selection {
            Selection::Uniform => None,
            Selection::Weighted => {
                let weights: Vec<f64> = gauges.iter().map(|g| g.weight()).collect();
                Some(weighted_index(&weights)?)
            }
            Selection::Probabilities(probs) => {
                if probs.len() != gauges.len() {
                    return Err(CompileError::InvalidDistribution(format!(
                        "{} probabilities for {} gauges",
                        probs.len(),
                        gauges.len()
                    )));
                }
                let sum: f64 = probs.iter().sum();
                if (sum - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
                    return Err(CompileError::InvalidDistribution(format!(
                        "probabilities sum to {sum}, expected 1"
                    )));
                }
                Some(weighted_index(probs)?)
            }
        };
        Ok(Self {
            gauges,
            selection,
            index,
        })
    }

    /// A uniform selector.
    pub fn uniform(gauges: Vec<Arc<dyn Gauge>>) -> CompileResult<Self> {
        Self::new(gauges, Selection::Uniform)
    }

    /// A selector weighted by each gauge's own weight.
    pub fn weighted(gauges: Vec<Arc<dyn Gauge>>) -> CompileResult<Self> {
        Self::new(gauges, Selection::Weighted)
    }

    /// Pick a gauge for one occurrence.
    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> &dyn Gauge {
        let i = match &self.index {
            Some(index) => index.sample(rng),
            None => rng.gen_range(0..self.gauges.len()),
        };
        self.gauges[i].as_ref()
    }

    /// The candidate gauges, in order.
    pub fn gauges(&self) -> &[Arc<dyn Gauge>] {
        &self.gauges
    }

    /// The selection policy.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selection probability of each gauge.
    pub fn probabilities(&self) -> Vec<f64> {
        let n = self.gauges.len();
        match &self.selection {
            Selection::Uniform => vec![1.0 / n as f64; n],
            Selection::Weighted => {
                let total: f64 = self.gauges.iter().map(|g| g.weight()).sum();
                self.gauges.iter().map(|g| g.weight() / total).collect()
            }
            Selection::Probabilities(probs) => probs.clone(),
        }
    }

    /// Number of gauges.
    pub fn len(&self) -> usize {
        self.gauges.len()
    }

    /// Always false; selectors are never empty.
    pub fn is_empty(&self) -> bool {
        self.gauges.is_empty()
    }
}

fn weighted_index(weights: &[f64]) -> CompileResult<WeightedIndex<f64>> {
    if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(CompileError::InvalidDistribution(format!(
            "weight {w} is not a non-negative number"
        )));
    }
    WeightedIndex::new(weights).map_err(|e| CompileError::InvalidDistribution(e.to_string()))
}
