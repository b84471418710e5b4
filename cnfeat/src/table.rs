//! Output of the feature computation: rows of features for each site in a
//! structure, and the [`FeatureSink`] receiving them.

use ndarray::Array2;

use crate::Error;
use crate::structure::Structure;
use crate::features::{summarize, FeatureVector, StructureSummary, FEATURE_NAMES};

/// Features of a single site
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize)]
pub struct SiteRow {
    /// identifier of the structure containing this site
    pub structure: String,
    /// index of the site in the structure
    pub site: usize,
    /// species label of the site
    pub species: String,
    /// features of this site
    pub features: FeatureVector,
}

/// All the rows produced for a single structure, emitted together
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize)]
pub struct StructureRows {
    /// identifier of the structure
    pub structure: String,
    /// features of every site, in site order
    pub sites: Vec<SiteRow>,
    /// structure-level summary of the site features
    pub summary: StructureSummary,
}

impl StructureRows {
    /// Create the rows for the structure with the given `identifier`, from
    /// the `features` of all its sites.
    pub fn new(identifier: &str, structure: &Structure, features: Vec<FeatureVector>) -> StructureRows {
        assert_eq!(structure.size(), features.len(), "expected one feature vector per site");

        let summary = summarize(&features);
        let sites = structure.sites().iter()
            .zip(features)
            .enumerate()
            .map(|(index, (site, features))| SiteRow {
                structure: identifier.to_owned(),
                site: index,
                species: site.species.clone(),
                features: features,
            })
            .collect();

        return StructureRows {
            structure: identifier.to_owned(),
            sites: sites,
            summary: summary,
        };
    }
}

/// A `FeatureSink` receives the features computed for each structure in a
/// batch, one structure at the time.
pub trait FeatureSink {
    /// Store the rows for a single structure
    fn write_structure(&mut self, rows: &StructureRows) -> Result<(), Error>;
}

/// In-memory feature table, keeping the structures in the order they were
/// written.
#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    structures: Vec<StructureRows>,
}

impl FeatureTable {
    /// Create an empty table
    pub fn new() -> FeatureTable {
        FeatureTable::default()
    }

    /// Get the rows of all structures in this table
    pub fn structures(&self) -> &[StructureRows] {
        &self.structures
    }

    /// Get the number of structures in this table
    pub fn len(&self) -> usize {
        self.structures.len()
    }

    /// Is this table empty?
    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    /// Iterate over all site rows, structure after structure
    pub fn site_rows(&self) -> impl Iterator<Item = &SiteRow> + '_ {
        self.structures.iter().flat_map(|structure| structure.sites.iter())
    }

    /// Get the summary row (average of the features over the sites) of each
    /// structure
    pub fn summary_rows(&self) -> Vec<(&str, &FeatureVector)> {
        self.structures.iter()
            .map(|structure| (structure.structure.as_str(), &structure.summary.mean))
            .collect()
    }

    /// Get all site features as a dense matrix, with one row per site and
    /// one column per feature (in the order of [`FEATURE_NAMES`]).
    pub fn to_array(&self) -> Array2<f64> {
        let n_rows = self.site_rows().count();
        let mut array = Array2::from_elem((n_rows, FEATURE_NAMES.len()), f64::NAN);
        for (mut row, site) in array.rows_mut().into_iter().zip(self.site_rows()) {
            for (value, (_, feature)) in row.iter_mut().zip(site.features.iter()) {
                *value = feature;
            }
        }
        return array;
    }

    /// Serialize this table to JSON. Undefined features are serialized as
    /// `null`.
    pub fn to_json(&self) -> Result<String, Error> {
        return Ok(serde_json::to_string_pretty(&self.structures)?);
    }
}

impl FeatureSink for FeatureTable {
    fn write_structure(&mut self, rows: &StructureRows) -> Result<(), Error> {
        self.structures.push(rows.clone());
        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use crate::Featurizer;
    use crate::structure::test_utils::test_structure;
    use super::*;

    fn table() -> FeatureTable {
        let featurizer = Featurizer::from_json(r#"{
            "search_radius": 4.0,
            "relative_tolerance": 0.05,
            "max_gap": 0.1
        }"#).unwrap();

        let mut table = FeatureTable::new();
        for name in ["CsCl", "isolated"] {
            let structure = test_structure(name);
            let features = featurizer.compute(&structure).unwrap();
            table.write_structure(&StructureRows::new(name, &structure, features)).unwrap();
        }
        return table;
    }

    #[test]
    fn rows() {
        let table = table();
        assert_eq!(table.len(), 2);

        let rows = table.site_rows().collect::<Vec<_>>();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].structure, "CsCl");
        assert_eq!(rows[0].site, 0);
        assert_eq!(rows[0].species, "Cl");
        assert_eq!(rows[1].site, 1);
        assert_eq!(rows[1].species, "Cs");
        assert_eq!(rows[2].structure, "isolated");
        assert!(rows[2].features.is_isolated());

        let summaries = table.summary_rows();
        assert_eq!(summaries[0].0, "CsCl");
        assert_eq!(summaries[0].1["coordination_number"], 8.0);
        assert_eq!(summaries[1].0, "isolated");
        assert!(summaries[1].1["coordination_number"].is_nan());
    }

    #[test]
    fn array() {
        let array = table().to_array();
        assert_eq!(array.shape(), [3, FEATURE_NAMES.len()]);
        assert_eq!(array[[0, 0]], 8.0);
        assert_eq!(array[[1, 0]], 8.0);
        assert_eq!(array[[2, 0]], 0.0);
        assert!(array[[2, 1]].is_nan());
    }

    #[test]
    fn json() {
        let json = table().to_json().unwrap();
        let value = serde_json::from_str::<serde_json::Value>(&json).unwrap();

        let structures = value.as_array().unwrap();
        assert_eq!(structures.len(), 2);
        assert_eq!(structures[0]["structure"], "CsCl");
        assert_eq!(structures[0]["sites"][1]["species"], "Cs");
        assert_eq!(structures[0]["sites"][1]["features"]["coordination_number"], 8.0);

        let isolated = &structures[1]["sites"][0]["features"];
        assert_eq!(isolated["coordination_number"], 0.0);
        assert!(isolated["distance_mean"].is_null());
    }
}
