use crate::neighbors::Neighbor;

/// Neighbors within this distance (in Angstrom) of the nearest neighbor are
/// all considered to be at the shortest distance.
pub const SHORTEST_DISTANCE_WINDOW: f64 = 1e-3;

/// Statistics on a set of distances. The standard deviation is the population
/// one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceStatistics {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
    pub std: f64,
}

impl DistanceStatistics {
    /// Compute statistics over the given `distances`. All values are NaN if
    /// `distances` is empty.
    pub fn new(distances: impl Iterator<Item = f64>) -> DistanceStatistics {
        let distances = distances.collect::<Vec<_>>();
        if distances.is_empty() {
            return DistanceStatistics {
                min: f64::NAN,
                mean: f64::NAN,
                max: f64::NAN,
                std: f64::NAN,
            };
        }

        let count = distances.len() as f64;
        let mean = distances.iter().sum::<f64>() / count;
        let variance = distances.iter().map(|d| (d - mean) * (d - mean)).sum::<f64>() / count;

        return DistanceStatistics {
            min: distances.iter().copied().fold(f64::INFINITY, f64::min),
            mean: mean,
            max: distances.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            std: variance.sqrt(),
        };
    }
}

/// Number of neighbors at the shortest and second shortest distance from a
/// site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShortestDistances {
    /// shortest neighbor distance
    pub first: f64,
    /// number of neighbors within `SHORTEST_DISTANCE_WINDOW` of `first`
    pub count: usize,
    /// the first distance outside of the window, if any
    pub second: Option<f64>,
    /// number of neighbors within `SHORTEST_DISTANCE_WINDOW` of `second`
    pub second_count: usize,
}

impl ShortestDistances {
    /// Find the shortest distances in a list of `neighbors`, sorted by
    /// increasing distance
    pub fn new(neighbors: &[Neighbor]) -> ShortestDistances {
        let first = match neighbors.first() {
            Some(neighbor) => neighbor.distance,
            None => {
                return ShortestDistances {
                    first: f64::NAN,
                    count: 0,
                    second: None,
                    second_count: 0,
                };
            }
        };

        let count = neighbors.iter()
            .take_while(|neighbor| neighbor.distance <= first + SHORTEST_DISTANCE_WINDOW)
            .count();

        let second = neighbors.get(count).map(|neighbor| neighbor.distance);
        let second_count = match second {
            Some(second) => neighbors[count..].iter()
                .take_while(|neighbor| neighbor.distance <= second + SHORTEST_DISTANCE_WINDOW)
                .count(),
            None => 0,
        };

        return ShortestDistances {
            first: first,
            count: count,
            second: second,
            second_count: second_count,
        };
    }

    /// Ratio of the second shortest distance to the shortest one, or NaN if
    /// there is no second shortest distance.
    pub fn second_by_first(&self) -> f64 {
        match self.second {
            Some(second) => second / self.first,
            None => f64::NAN,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_ulps_eq;

    use crate::CellShift;
    use super::*;

    #[test]
    fn statistics() {
        let stats = DistanceStatistics::new([2.0, 2.5, 3.0, 4.5].into_iter());
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 4.5);
        assert_eq!(stats.mean, 3.0);
        assert_ulps_eq!(stats.std, f64::sqrt(0.875));

        let stats = DistanceStatistics::new(std::iter::empty());
        assert!(stats.min.is_nan());
        assert!(stats.std.is_nan());
    }

    #[test]
    fn shortest() {
        let neighbors = [2.0, 2.0005, 2.002, 2.25, 3.0].iter().map(|&distance| Neighbor {
            site: 0,
            image: CellShift::default(),
            distance: distance,
        }).collect::<Vec<_>>();

        let shortest = ShortestDistances::new(&neighbors);
        assert_eq!(shortest.count, 2);
        assert_eq!(shortest.second, Some(2.002));
        assert_eq!(shortest.second_count, 1);

        let shortest = ShortestDistances::new(&neighbors[3..]);
        assert_eq!(shortest.count, 1);
        assert_eq!(shortest.second_count, 1);
        assert_eq!(shortest.second_by_first(), 3.0 / 2.25);

        let shortest = ShortestDistances::new(&neighbors[4..]);
        assert_eq!(shortest.count, 1);
        assert_eq!(shortest.second_count, 0);
        assert!(shortest.second_by_first().is_nan());

        let shortest = ShortestDistances::new(&[]);
        assert_eq!(shortest.count, 0);
        assert_eq!(shortest.second_count, 0);
        assert!(shortest.second_by_first().is_nan());
    }

    #[test]
    fn second_shell_window() {
        let neighbors = [1.5, 2.5, 2.5004, 2.5009, 2.6].iter().map(|&distance| Neighbor {
            site: 0,
            image: CellShift::default(),
            distance: distance,
        }).collect::<Vec<_>>();

        let shortest = ShortestDistances::new(&neighbors);
        assert_eq!(shortest.count, 1);
        assert_eq!(shortest.second, Some(2.5));
        assert_eq!(shortest.second_count, 3);
    }
}
