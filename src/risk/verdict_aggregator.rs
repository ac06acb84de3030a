// Verdict Aggregator - turns one observable's analyzer verdicts into a likelihood
use std::collections::HashSet;
use tracing::debug;

use crate::models::{AnalyzerResult, ConsensusConfig, RiskEngineConfig, VerdictLevel, VerdictWeights};
use crate::risk::{MAX_LIKELIHOOD, MIN_LIKELIHOOD};

/// Weighted-mean likelihood with a consensus boost.
///
/// 1. Map each verdict level to its configured weight (unrecognized levels weigh 0.0).
/// 2. Take the arithmetic mean over every verdict.
/// 3. If enough *distinct* analyzers report "malicious", multiply by the boost.
/// 4. Clamp to [0.0, 1.0].
///
/// Distinct analyzers are counted, not taxonomy entries, so a single analyzer
/// emitting several malicious taxonomies cannot trigger the boost on its own.
#[derive(Debug, Clone)]
pub struct VerdictAggregator {
    weights: VerdictWeights,
    consensus: ConsensusConfig,
}

impl VerdictAggregator {
    pub fn new(config: &RiskEngineConfig) -> Self {
        Self {
            weights: config.verdict_weights.clone(),
            consensus: config.consensus.clone(),
        }
    }

    pub fn compute_likelihood(&self, results: &[AnalyzerResult]) -> f64 {
        if results.is_empty() {
            return 0.0;
        }

        let total: f64 = results
            .iter()
            .map(|result| {
                if !result.level.is_canonical() {
                    debug!(
                        analyzer = %result.analyzer_name,
                        "Unrecognized verdict level, weighting as 0.0"
                    );
                }
                self.weights.weight_of(result.level)
            })
            .sum();
        let mut likelihood = total / results.len() as f64;

        let malicious_analyzers = Self::distinct_malicious_analyzers(results);
        if malicious_analyzers >= self.consensus.threshold {
            likelihood *= self.consensus.boost;
            debug!(
                malicious_analyzers,
                boost = self.consensus.boost,
                "Consensus boost applied"
            );
        }

        likelihood.clamp(MIN_LIKELIHOOD, MAX_LIKELIHOOD)
    }

    /// Number of distinct analyzer identities that reported "malicious"
    pub fn distinct_malicious_analyzers(results: &[AnalyzerResult]) -> usize {
        results
            .iter()
            .filter(|result| result.level == VerdictLevel::Malicious)
            .map(|result| result.analyzer_name.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(analyzer: &str, level: VerdictLevel) -> AnalyzerResult {
        AnalyzerResult::new(analyzer, level)
    }

    #[test]
    fn test_empty_verdicts_give_zero() {
        let aggregator = VerdictAggregator::new(&RiskEngineConfig::default());
        assert_eq!(aggregator.compute_likelihood(&[]), 0.0);
    }

    #[test]
    fn test_mean_without_consensus() {
        let aggregator = VerdictAggregator::new(&RiskEngineConfig::default());
        let results = vec![
            verdict("VirusTotal", VerdictLevel::Malicious),
            verdict("AbuseIPDB", VerdictLevel::Suspicious),
            verdict("Shodan", VerdictLevel::Safe),
            verdict("Whois", VerdictLevel::Info),
        ];
        // (1.0 + 0.5 + 0.0 + 0.0) / 4
        assert!((aggregator.compute_likelihood(&results) - 0.375).abs() < 1e-12);
    }

    #[test]
    fn test_consensus_boost_is_clamped() {
        let aggregator = VerdictAggregator::new(&RiskEngineConfig::default());
        let results = vec![
            verdict("VirusTotal", VerdictLevel::Malicious),
            verdict("OTXQuery", VerdictLevel::Malicious),
        ];
        // mean 1.0, boosted to 1.2, clamped to 1.0
        assert_eq!(aggregator.compute_likelihood(&results), 1.0);
    }

    #[test]
    fn test_consensus_boost_below_one() {
        let aggregator = VerdictAggregator::new(&RiskEngineConfig::default());
        let results = vec![
            verdict("VirusTotal", VerdictLevel::Malicious),
            verdict("OTXQuery", VerdictLevel::Malicious),
            verdict("Shodan", VerdictLevel::Safe),
            verdict("Whois", VerdictLevel::Info),
        ];
        // 0.5 * 1.2
        assert!((aggregator.compute_likelihood(&results) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_single_verbose_analyzer_gets_no_boost() {
        let aggregator = VerdictAggregator::new(&RiskEngineConfig::default());
        let results = vec![
            verdict("VirusTotal", VerdictLevel::Malicious),
            verdict("VirusTotal", VerdictLevel::Malicious),
            verdict("VirusTotal", VerdictLevel::Malicious),
            verdict("Shodan", VerdictLevel::Safe),
        ];
        assert_eq!(VerdictAggregator::distinct_malicious_analyzers(&results), 1);
        assert!((aggregator.compute_likelihood(&results) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_unrecognized_level_counts_as_zero_weight() {
        let aggregator = VerdictAggregator::new(&RiskEngineConfig::default());
        let results = vec![
            verdict("VirusTotal", VerdictLevel::Suspicious),
            verdict("Custom", VerdictLevel::Unrecognized),
        ];
        // the unknown verdict still counts in the denominator
        assert!((aggregator.compute_likelihood(&results) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_boosting_zero_stays_zero() {
        let mut config = RiskEngineConfig::default();
        config.verdict_weights.malicious = 0.0;
        let aggregator = VerdictAggregator::new(&config);
        let results = vec![
            verdict("VirusTotal", VerdictLevel::Malicious),
            verdict("OTXQuery", VerdictLevel::Malicious),
        ];
        assert_eq!(aggregator.compute_likelihood(&results), 0.0);
    }
}
