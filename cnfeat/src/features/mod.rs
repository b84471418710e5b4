//! Geometric features of the local environment of a site, computed from its
//! coordination shell.
//!
//! Every site gets the same set of features, listed in [`FEATURE_NAMES`].
//! Features which are not defined for a given environment (angles with less
//! than three neighbors, polyhedron metrics for flat environments, all
//! geometric features for isolated sites, ...) are set to NaN.

use indexmap::IndexMap;

use crate::{CellShift, Vector3D};
use crate::coordination::CoordinationShell;
use crate::neighbors::Neighbor;
use crate::structure::Structure;

mod distances;
pub use self::distances::{DistanceStatistics, ShortestDistances, SHORTEST_DISTANCE_WINDOW};

mod angles;
pub use self::angles::AngleStatistics;

mod polyhedron;
pub use self::polyhedron::Polyhedron;

mod summary;
pub use self::summary::{summarize, StructureSummary};

/// Value used for undefined features
pub const SENTINEL: f64 = f64::NAN;

/// Names of all the features, in the order they are stored
pub const FEATURE_NAMES: [&str; 22] = [
    "coordination_number",
    "distance_min",
    "distance_mean",
    "distance_max",
    "distance_std",
    "shortest_distance_count",
    "second_shortest_distance_count",
    "second_by_first_shortest",
    "shell_gap",
    "angle_mean",
    "angle_min",
    "angle_max",
    "angle_std",
    "homoatomic_count",
    "homoatomic_by_shortest",
    "neighbor_species_count",
    "center_offset",
    "polyhedron_volume",
    "polyhedron_faces",
    "polyhedron_edges",
    "inscribed_radius",
    "packing_efficiency",
];

/// Features counting neighbors, which are zero instead of undefined for
/// isolated sites
const COUNT_FEATURES: [&str; 5] = [
    "coordination_number",
    "shortest_distance_count",
    "second_shortest_distance_count",
    "homoatomic_count",
    "neighbor_species_count",
];

/// Values of all the features for a single site, stored in the same order as
/// [`FEATURE_NAMES`].
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize)]
#[serde(transparent)]
pub struct FeatureVector {
    values: IndexMap<&'static str, f64>,
}

impl FeatureVector {
    /// Create a feature vector with all features undefined
    fn undefined() -> FeatureVector {
        let values = FEATURE_NAMES.iter().map(|&name| (name, SENTINEL)).collect();
        return FeatureVector { values: values };
    }

    /// Get the feature vector of an isolated site, without any neighbor.
    /// Counts are set to zero, and all other features are undefined.
    pub fn isolated() -> FeatureVector {
        let mut features = FeatureVector::undefined();
        for name in COUNT_FEATURES {
            features.set(name, 0.0);
        }
        return features;
    }

    /// Get the value of the feature with the given `name`, or `None` if there
    /// is no such feature
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    fn set(&mut self, name: &'static str, value: f64) {
        debug_assert!(self.values.contains_key(name), "unknown feature {}", name);
        self.values.insert(name, value);
    }

    /// Iterate over (name, value) pairs, in the order of [`FEATURE_NAMES`]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&'static str, f64)> + '_ {
        self.values.iter().map(|(&name, &value)| (name, value))
    }

    /// Get all the feature values, in the order of [`FEATURE_NAMES`]
    pub fn values(&self) -> Vec<f64> {
        self.values.values().copied().collect()
    }

    /// Get the coordination number stored in this feature vector
    pub fn coordination_number(&self) -> usize {
        self["coordination_number"] as usize
    }

    /// Does this feature vector belong to an isolated site?
    pub fn is_isolated(&self) -> bool {
        self.coordination_number() == 0
    }
}

impl std::ops::Index<&str> for FeatureVector {
    type Output = f64;

    fn index(&self, name: &str) -> &f64 {
        match self.values.get(name) {
            Some(value) => value,
            None => panic!("unknown feature '{}'", name),
        }
    }
}

/// Compute the features of the site at index `center` in the `structure`.
///
/// `neighbors` is the full list of neighbors of the site, sorted by distance,
/// and `shell` the coordination shell resolved from it.
pub fn extract_features(
    structure: &Structure,
    center: usize,
    neighbors: &[Neighbor],
    shell: &CoordinationShell,
) -> FeatureVector {
    if shell.is_empty() {
        return FeatureVector::isolated();
    }

    let mut features = FeatureVector::undefined();
    features.set("coordination_number", shell.coordination_number() as f64);

    let distances = DistanceStatistics::new(shell.distances());
    features.set("distance_min", distances.min);
    features.set("distance_mean", distances.mean);
    features.set("distance_max", distances.max);
    features.set("distance_std", distances.std);

    let shortest = ShortestDistances::new(neighbors);
    features.set("shortest_distance_count", shortest.count as f64);
    features.set("second_shortest_distance_count", shortest.second_count as f64);
    features.set("second_by_first_shortest", shortest.second_by_first());

    if let Some(next) = shell.next_distance() {
        features.set("shell_gap", next - distances.max);
    }

    let origin = structure.cartesian(center, CellShift::default());
    let vectors = shell.neighbors().iter()
        .map(|neighbor| structure.cartesian(neighbor.site, neighbor.image) - origin)
        .collect::<Vec<_>>();

    if let Some(angles) = AngleStatistics::new(&vectors) {
        features.set("angle_mean", angles.mean);
        features.set("angle_min", angles.min);
        features.set("angle_max", angles.max);
        features.set("angle_std", angles.std);
    }

    let center_element = structure.sites()[center].element();
    let mut elements = Vec::new();
    let mut homoatomic = 0;
    for neighbor in shell.neighbors() {
        let element = structure.sites()[neighbor.site].element();
        if element == center_element {
            homoatomic += 1;
        }
        if !elements.contains(&element) {
            elements.push(element);
        }
    }
    features.set("homoatomic_count", homoatomic as f64);

    // closest neighbor of the same element, inside or outside of the shell
    let homoatomic_distance = neighbors.iter()
        .find(|neighbor| structure.sites()[neighbor.site].element() == center_element)
        .map(|neighbor| neighbor.distance);
    if let Some(distance) = homoatomic_distance {
        features.set("homoatomic_by_shortest", distance / shortest.first);
    }
    features.set("neighbor_species_count", elements.len() as f64);

    let centroid = vectors.iter().fold(Vector3D::zero(), |sum, v| sum + v) / vectors.len() as f64;
    features.set("center_offset", centroid.norm());

    if let Some(polyhedron) = Polyhedron::new(&vectors) {
        let volume = polyhedron.volume();
        let inscribed_radius = polyhedron.inscribed_radius();
        let sphere = 4.0 / 3.0 * std::f64::consts::PI * inscribed_radius.powi(3);

        features.set("polyhedron_volume", volume);
        features.set("polyhedron_faces", polyhedron.faces() as f64);
        features.set("polyhedron_edges", polyhedron.edges() as f64);
        features.set("inscribed_radius", inscribed_radius);
        features.set("packing_efficiency", sphere / volume);
    }

    return features;
}
