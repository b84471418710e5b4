use std::path::Path;

use crate::Error;
use crate::structure::{Lattice, ParsedStructure};
use super::StructureParser;

/// Lattice in a JSON structure file, either as the full matrix (with basis
/// vectors as rows) or as lattice parameters (lengths and angles in degrees).
#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
enum JsonLattice {
    Matrix([[f64; 3]; 3]),
    Parameters {
        a: f64,
        b: f64,
        c: f64,
        alpha: f64,
        beta: f64,
        gamma: f64,
    },
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct JsonSite {
    species: String,
    fractional: [f64; 3],
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct JsonStructure {
    lattice: JsonLattice,
    sites: Vec<JsonSite>,
}

/// Parser for structures stored as JSON documents, looking like
///
/// ```json
/// {
///     "lattice": [[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]],
///     "sites": [
///         {"species": "Cs", "fractional": [0.0, 0.0, 0.0]},
///         {"species": "Cl", "fractional": [0.5, 0.5, 0.5]}
///     ]
/// }
/// ```
///
/// The lattice can also be given by its parameters, as
/// `{"a": 4.0, "b": 4.0, "c": 4.0, "alpha": 90, "beta": 90, "gamma": 90}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStructureParser;

impl JsonStructureParser {
    /// Parse a structure from a JSON string
    pub fn parse_str(&self, json: &str) -> Result<ParsedStructure, Error> {
        let structure = serde_json::from_str::<JsonStructure>(json)
            .map_err(|e| Error::ParseFailure(e.to_string()))?;

        let lattice = match structure.lattice {
            JsonLattice::Matrix(matrix) => matrix,
            JsonLattice::Parameters { a, b, c, alpha, beta, gamma } => {
                let lattice = Lattice::from_parameters(a, b, c, alpha, beta, gamma)?;
                let matrix = lattice.matrix();
                [matrix[0], matrix[1], matrix[2]]
            }
        };

        return Ok(ParsedStructure {
            lattice: lattice,
            sites: structure.sites.into_iter().map(|site| (site.species, site.fractional)).collect(),
        });
    }
}

impl StructureParser for JsonStructureParser {
    fn parse(&self, path: &Path) -> Result<ParsedStructure, Error> {
        let json = std::fs::read_to_string(path).map_err(|e| Error::ParseFailure(
            format!("failed to read '{}': {}", path.display(), e)
        ))?;

        return self.parse_str(&json).map_err(|error| match error {
            Error::ParseFailure(e) => Error::ParseFailure(format!("'{}': {}", path.display(), e)),
            error => error,
        });
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::Structure;
    use super::*;

    #[test]
    fn matrix() {
        let parsed = JsonStructureParser.parse_str(r#"{
            "lattice": [[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]],
            "sites": [
                {"species": "Cs", "fractional": [0.0, 0.0, 0.0]},
                {"species": "Cl", "fractional": [0.5, 0.5, 0.5]}
            ]
        }"#).unwrap();

        assert_eq!(parsed.lattice, [[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]]);
        assert_eq!(parsed.sites, [
            ("Cs".to_string(), [0.0, 0.0, 0.0]),
            ("Cl".to_string(), [0.5, 0.5, 0.5]),
        ]);
    }

    #[test]
    fn parameters() {
        let parsed = JsonStructureParser.parse_str(r#"{
            "lattice": {"a": 3.0, "b": 4.0, "c": 5.0, "alpha": 90, "beta": 90, "gamma": 120},
            "sites": [{"species": "Mg1", "fractional": [0.0, 0.0, 0.0]}]
        }"#).unwrap();

        let structure = Structure::try_from(parsed).unwrap();
        let lattice = structure.lattice();
        assert_relative_eq!(lattice.a(), 3.0, max_relative = 1e-12);
        assert_relative_eq!(lattice.b(), 4.0, max_relative = 1e-12);
        assert_relative_eq!(lattice.c(), 5.0, max_relative = 1e-12);
        assert_relative_eq!(lattice.gamma(), 120.0, max_relative = 1e-12);
        assert_eq!(structure.sites()[0].element(), "Mg");
    }

    #[test]
    fn errors() {
        let result = JsonStructureParser.parse_str("{\"lattice\": [[1, 0, 0]]");
        assert!(matches!(result, Err(Error::ParseFailure(_))));

        let result = JsonStructureParser.parse_str(r#"{
            "lattice": [[4.0, 0.0, 0.0], [0.0, 4.0, 0.0]],
            "sites": []
        }"#);
        assert!(matches!(result, Err(Error::ParseFailure(_))));

        let result = JsonStructureParser.parse_str(r#"{
            "lattice": {"a": -3.0, "b": 4.0, "c": 5.0, "alpha": 90, "beta": 90, "gamma": 90},
            "sites": []
        }"#);
        assert!(matches!(result, Err(Error::InvalidStructure(_))));

        // misspelled keys are not silently ignored
        let result = JsonStructureParser.parse_str(r#"{
            "lattice": [[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]],
            "sites": [],
            "site": [{"species": "Cs", "fractional": [0.0, 0.0, 0.0]}]
        }"#);
        assert!(matches!(result, Err(Error::ParseFailure(_))));

        let folder = tempfile::tempdir().unwrap();
        let path = folder.path().join("missing.json");
        let error = JsonStructureParser.parse(&path).unwrap_err();
        assert!(matches!(error, Error::ParseFailure(_)));
        assert!(error.to_string().contains("missing.json"));
    }
}
