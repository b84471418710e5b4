use crate::Error;
use crate::structure::Structure;
use crate::neighbors::NeighborList;
use crate::coordination::{resolve_shell, CoordinationParameters, CoordinationShell};
use crate::features::{extract_features, FeatureVector};

fn default_include_self_images() -> bool {
    true
}

/// Hyper-parameters controlling the neighbor search and the coordination
/// shells detection.
#[derive(Debug, Clone, Copy, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EngineParameters {
    /// Radius (in Angstrom) used to search for neighbors around each site.
    /// This should be a few times larger than the expected nearest neighbor
    /// distance, to be able to detect the end of the coordination shell.
    pub search_radius: f64,
    /// Neighbors with a distance up to `d1 * (1 + relative_tolerance)` are
    /// part of the coordination shell, where `d1` is the nearest neighbor
    /// distance.
    pub relative_tolerance: f64,
    /// Largest allowed jump (in Angstrom) between the distances of two
    /// consecutive neighbors in the coordination shell.
    pub max_gap: f64,
    /// Can a site be coordinated by its own periodic images?
    #[serde(default = "default_include_self_images")]
    pub include_self_images: bool,
}

impl EngineParameters {
    /// Parse parameters from their JSON representation
    pub fn from_json(json: &str) -> Result<EngineParameters, Error> {
        let parameters = serde_json::from_str::<EngineParameters>(json)?;
        parameters.validate()?;
        return Ok(parameters);
    }

    /// Get the parameters used to resolve coordination shells
    pub fn coordination(&self) -> CoordinationParameters {
        CoordinationParameters {
            relative_tolerance: self.relative_tolerance,
            max_gap: self.max_gap,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(self.search_radius.is_finite() && self.search_radius > 0.0) {
            return Err(Error::InvalidRadius(self.search_radius));
        }

        return self.coordination().validate();
    }
}

/// The `Featurizer` computes the features of all the sites in a structure,
/// by chaining neighbor search, coordination shell resolution and feature
/// extraction.
#[derive(Debug, Clone)]
pub struct Featurizer {
    parameters: EngineParameters,
}

impl Featurizer {
    /// Create a new featurizer with the given `parameters`
    pub fn new(parameters: EngineParameters) -> Result<Featurizer, Error> {
        parameters.validate()?;
        return Ok(Featurizer {
            parameters: parameters,
        });
    }

    /// Create a new featurizer with parameters given as JSON
    pub fn from_json(parameters: &str) -> Result<Featurizer, Error> {
        let parameters = EngineParameters::from_json(parameters)?;
        return Featurizer::new(parameters);
    }

    /// Get the parameters used by this featurizer
    pub fn parameters(&self) -> &EngineParameters {
        &self.parameters
    }

    fn neighbors(&self, structure: &Structure) -> Result<NeighborList, Error> {
        NeighborList::new(
            structure,
            self.parameters.search_radius,
            self.parameters.include_self_images,
        )
    }

    /// Get the coordination shell of all the sites in `structure`, in site
    /// order
    pub fn shells(&self, structure: &Structure) -> Result<Vec<CoordinationShell>, Error> {
        let neighbors = self.neighbors(structure)?;
        let coordination = self.parameters.coordination();

        let mut shells = Vec::with_capacity(structure.size());
        for center in 0..structure.size() {
            shells.push(resolve_shell(neighbors.neighbors_of(center), &coordination)?);
        }
        return Ok(shells);
    }

    /// Compute the features of all the sites in `structure`, in site order
    #[time_graph::instrument(name = "Featurizer::compute")]
    pub fn compute(&self, structure: &Structure) -> Result<Vec<FeatureVector>, Error> {
        let neighbors = self.neighbors(structure)?;
        let coordination = self.parameters.coordination();

        let mut features = Vec::with_capacity(structure.size());
        for center in 0..structure.size() {
            let neighbors = neighbors.neighbors_of(center);
            let shell = resolve_shell(neighbors, &coordination)?;
            features.push(extract_features(structure, center, neighbors, &shell));
        }
        return Ok(features);
    }
}

#[cfg(test)]
mod tests {
    use crate::structure::{Lattice, test_utils::test_structure};
    use super::*;

    const PARAMETERS: &str = r#"{
        "search_radius": 4.0,
        "relative_tolerance": 0.05,
        "max_gap": 0.1
    }"#;

    #[test]
    fn parameters() {
        let parameters = EngineParameters::from_json(PARAMETERS).unwrap();
        assert_eq!(parameters.search_radius, 4.0);
        assert_eq!(parameters.relative_tolerance, 0.05);
        assert_eq!(parameters.max_gap, 0.1);
        assert!(parameters.include_self_images);

        let parameters = EngineParameters::from_json(r#"{
            "search_radius": 4.0,
            "relative_tolerance": 0.05,
            "max_gap": 0.1,
            "include_self_images": false
        }"#).unwrap();
        assert!(!parameters.include_self_images);

        let result = EngineParameters::from_json(r#"{"search_radius": 4.0}"#);
        assert!(matches!(result, Err(Error::Json(_))));

        let result = EngineParameters::from_json(r#"{
            "search_radius": 4.0,
            "relative_tolerance": 0.05,
            "max_gap": 0.1,
            "cutoff": 3
        }"#);
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn invalid_parameters() {
        let parameters = EngineParameters {
            search_radius: -1.0,
            relative_tolerance: 0.05,
            max_gap: 0.1,
            include_self_images: true,
        };
        let error = Featurizer::new(parameters).unwrap_err();
        assert!(matches!(error, Error::InvalidRadius(_)));
        assert!(error.is_configuration_error());

        let parameters = EngineParameters {
            search_radius: 4.0,
            relative_tolerance: 0.05,
            max_gap: 0.0,
            include_self_images: true,
        };
        let error = Featurizer::new(parameters).unwrap_err();
        assert!(matches!(error, Error::UnresolvableCoordination(_)));
        assert!(error.is_configuration_error());
    }

    #[test]
    fn compute() {
        let featurizer = Featurizer::from_json(PARAMETERS).unwrap();

        let structure = test_structure("NaCl");
        let features = featurizer.compute(&structure).unwrap();
        assert_eq!(features.len(), 8);
        for site in &features {
            assert_eq!(site.coordination_number(), 6);
            assert_eq!(site["distance_min"], 2.0);
        }

        let shells = featurizer.shells(&structure).unwrap();
        assert_eq!(shells.len(), 8);
        for (shell, site) in shells.iter().zip(&features) {
            assert_eq!(shell.coordination_number(), site.coordination_number());
        }

        let structure = test_structure("isolated");
        let features = featurizer.compute(&structure).unwrap();
        assert_eq!(features.len(), 1);
        assert!(features[0].is_isolated());

        let empty = Structure::new(Lattice::cubic(4.0).unwrap(), Vec::new()).unwrap();
        assert!(featurizer.compute(&empty).unwrap().is_empty());
    }

    #[test]
    fn self_images() {
        let structure = test_structure("simple-cubic");

        let featurizer = Featurizer::from_json(PARAMETERS).unwrap();
        let features = featurizer.compute(&structure).unwrap();
        assert_eq!(features[0].coordination_number(), 6);

        let mut parameters = *featurizer.parameters();
        parameters.include_self_images = false;
        let featurizer = Featurizer::new(parameters).unwrap();
        let features = featurizer.compute(&structure).unwrap();
        assert!(features[0].is_isolated());
    }
}
