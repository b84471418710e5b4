//! Coordination shells are extracted from the sorted neighbor list of a site
//! with a distance-gap method: starting from the nearest neighbor, neighbors
//! are accepted as long as they are close to the nearest neighbor distance,
//! or close to the previously accepted neighbor.

use crate::Error;
use crate::neighbors::Neighbor;

/// Thresholds used to decide which neighbors belong to the coordination shell
/// of a site.
#[derive(Debug, Clone, Copy, PartialEq)]
#[derive(serde::Deserialize, serde::Serialize, schemars::JsonSchema)]
pub struct CoordinationParameters {
    /// Neighbors with a distance up to `d1 * (1 + relative_tolerance)` are
    /// always accepted, where `d1` is the nearest neighbor distance.
    pub relative_tolerance: f64,
    /// Largest allowed jump (in Angstrom) between the distances of two
    /// consecutive neighbors in the shell. A larger jump marks the end of the
    /// coordination shell.
    pub max_gap: f64,
}

impl CoordinationParameters {
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.relative_tolerance.is_finite() && self.relative_tolerance > 0.0) {
            return Err(Error::UnresolvableCoordination(format!(
                "expected a positive relative tolerance, got {}",
                self.relative_tolerance
            )));
        }

        if !(self.max_gap.is_finite() && self.max_gap > 0.0) {
            return Err(Error::UnresolvableCoordination(format!(
                "expected a positive maximal gap, got {}",
                self.max_gap
            )));
        }

        return Ok(());
    }
}

/// The coordination shell of a site: the neighbors accepted as coordinating
/// the site, sorted by distance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoordinationShell {
    neighbors: Vec<Neighbor>,
    next_distance: Option<f64>,
}

impl CoordinationShell {
    /// Get the neighbors in this shell
    pub fn neighbors(&self) -> &[Neighbor] {
        &self.neighbors
    }

    /// Get the coordination number, i.e. the number of neighbors in this shell
    pub fn coordination_number(&self) -> usize {
        self.neighbors.len()
    }

    /// Is this shell empty? This happens for sites without any neighbor
    /// inside the search radius.
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Get the distances of all neighbors in this shell, in increasing order
    pub fn distances(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.neighbors.iter().map(|neighbor| neighbor.distance)
    }

    /// Distance to the closest neighbor outside of this shell, if there was
    /// one inside the search radius.
    pub fn next_distance(&self) -> Option<f64> {
        self.next_distance
    }
}

/// Resolve the coordination shell from the full list of `neighbors` of a
/// site, which must be sorted by increasing distance (as produced by
/// [`crate::neighbors::find_neighbors`]).
///
/// The shell is always a prefix of the neighbor list: the first rejected
/// neighbor ends the shell.
pub fn resolve_shell(neighbors: &[Neighbor], parameters: &CoordinationParameters) -> Result<CoordinationShell, Error> {
    parameters.validate()?;

    let first = match neighbors.first() {
        Some(neighbor) => neighbor.distance,
        None => return Ok(CoordinationShell::default()),
    };

    let within_tolerance = first * (1.0 + parameters.relative_tolerance);
    let mut previous = first;
    let mut count = 0;
    for neighbor in neighbors {
        debug_assert!(neighbor.distance >= previous);
        if neighbor.distance <= within_tolerance || neighbor.distance <= previous + parameters.max_gap {
            previous = neighbor.distance;
            count += 1;
        } else {
            break;
        }
    }

    return Ok(CoordinationShell {
        neighbors: neighbors[..count].to_vec(),
        next_distance: neighbors.get(count).map(|neighbor| neighbor.distance),
    });
}
