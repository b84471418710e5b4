use super::{FeatureVector, FEATURE_NAMES};

/// Structure-level statistics of the per-site features
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize)]
pub struct StructureSummary {
    /// Average of each feature over the sites. This is the structure-level
    /// summary row.
    pub mean: FeatureVector,
    /// Smallest value of each feature over the sites
    pub min: FeatureVector,
    /// Largest value of each feature over the sites
    pub max: FeatureVector,
}

/// Summarize the features of all sites in a structure.
///
/// Isolated sites are ignored, as well as undefined (NaN) values of the
/// remaining sites. Features which are undefined for every site stay
/// undefined in the summary.
pub fn summarize(features: &[FeatureVector]) -> StructureSummary {
    let mut mean = FeatureVector::undefined();
    let mut min = FeatureVector::undefined();
    let mut max = FeatureVector::undefined();

    for name in FEATURE_NAMES {
        let values = features.iter()
            .filter(|site| !site.is_isolated())
            .map(|site| site[name])
            .filter(|value| !value.is_nan())
            .collect::<Vec<_>>();

        if values.is_empty() {
            continue;
        }

        mean.set(name, values.iter().sum::<f64>() / values.len() as f64);
        min.set(name, values.iter().copied().fold(f64::INFINITY, f64::min));
        max.set(name, values.iter().copied().fold(f64::NEG_INFINITY, f64::max));
    }

    return StructureSummary {
        mean: mean,
        min: min,
        max: max,
    };
}
