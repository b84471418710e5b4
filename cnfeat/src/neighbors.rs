use log::warn;
use rayon::prelude::*;

use crate::{Error, Vector3D};
use crate::structure::{Lattice, Structure};

/// Neighbors closer than this distance (in Angstrom) are considered to be the
/// same atom, and are never included in the neighbor lists.
pub const MINIMUM_DISTANCE: f64 = 1e-8;

/// Largest number of periodic images of the unit cell visited when searching
/// for the neighbors of a single site
pub const MAX_CELL_IMAGES: f64 = 1e6;

/// Distinct sites closer than this distance (in Angstrom) are reported as
/// overlapping atoms
const OVERLAP_DISTANCE: f64 = 1e-3;

/// A cell shift represents the displacement along cell axis between a site
/// inside the unit cell and one of its periodic images.
///
/// Cell shifts are ordered lexicographically, which is used to sort neighbors
/// at the same distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct CellShift([i32; 3]);

impl CellShift {
    /// Create a new cell shift from the number of periodic repetitions along
    /// each lattice vector
    pub fn new(shift: [i32; 3]) -> CellShift {
        CellShift(shift)
    }

    /// Is this the zero shift, i.e. the site itself and not one of its images?
    pub fn is_zero(&self) -> bool {
        self.0 == [0, 0, 0]
    }

    /// Get the components of this shift
    pub fn as_array(&self) -> [i32; 3] {
        self.0
    }

    /// Get this shift as a (fractional) vector
    pub fn as_vector(&self) -> Vector3D {
        Vector3D::new(self[0] as f64, self[1] as f64, self[2] as f64)
    }

    /// Compute the shift vector in cartesian coordinates, using the given
    /// `lattice`.
    pub fn cartesian(&self, lattice: &Lattice) -> Vector3D {
        lattice.cartesian(self.as_vector())
    }
}

impl From<[i32; 3]> for CellShift {
    fn from(shift: [i32; 3]) -> CellShift {
        CellShift(shift)
    }
}

impl std::ops::Add<CellShift> for CellShift {
    type Output = CellShift;

    fn add(mut self, rhs: CellShift) -> Self::Output {
        self.0[0] += rhs[0];
        self.0[1] += rhs[1];
        self.0[2] += rhs[2];
        return self;
    }
}

impl std::ops::Sub<CellShift> for CellShift {
    type Output = CellShift;

    fn sub(mut self, rhs: CellShift) -> Self::Output {
        self.0[0] -= rhs[0];
        self.0[1] -= rhs[1];
        self.0[2] -= rhs[2];
        return self;
    }
}

impl std::ops::Index<usize> for CellShift {
    type Output = i32;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// A neighbor of a central site: a periodic image of some site in the
/// structure, and the distance between this image and the central site.
///
/// The Cartesian vector from the center to the neighbor is
/// `structure.cartesian(site, image) - structure.cartesian(center, CellShift::default())`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// index of the neighbor site in the structure
    pub site: usize,
    /// periodic image of the site this neighbor corresponds to
    pub image: CellShift,
    /// distance between the central site and this neighbor
    pub distance: f64,
}

/// Find all the neighbors of the site at index `center` in the `structure`,
/// up to a distance of `radius` (included). Periodic images of all sites are
/// considered, including images of the central site itself unless
/// `include_self_images` is false.
///
/// Neighbors are sorted by distance, then site index, then cell shift. Exact
/// ties are kept as separate entries.
#[time_graph::instrument(name = "find_neighbors")]
pub fn find_neighbors(
    structure: &Structure,
    center: usize,
    radius: f64,
    include_self_images: bool,
) -> Result<Vec<Neighbor>, Error> {
    check_radius(radius)?;

    if structure.size() == 0 {
        return Ok(Vec::new());
    }

    if center >= structure.size() {
        return Err(Error::InvalidParameter(format!(
            "central site index {} is out of bounds for a structure with {} sites",
            center, structure.size()
        )));
    }

    let lattice = structure.lattice();
    let n_search = search_range(lattice, radius)?;
    let sites = structure.sites();
    let center_fractional = sites[center].fractional;

    let mut neighbors = Vec::new();
    for (index, site) in sites.iter().enumerate() {
        if index == center && !include_self_images {
            continue;
        }

        let delta = site.fractional - center_fractional;
        for shift_x in -n_search[0]..=n_search[0] {
            for shift_y in -n_search[1]..=n_search[1] {
                for shift_z in -n_search[2]..=n_search[2] {
                    let image = CellShift([shift_x, shift_y, shift_z]);
                    if index == center && image.is_zero() {
                        continue;
                    }

                    let distance = lattice.cartesian(delta + image.as_vector()).norm();
                    if index != center && distance < OVERLAP_DISTANCE {
                        warn!(
                            "sites {} and {} are very close to one another ({} A)",
                            center, index, distance
                        );
                    }

                    if distance > MINIMUM_DISTANCE && distance <= radius {
                        neighbors.push(Neighbor {
                            site: index,
                            image: image,
                            distance: distance,
                        });
                    }
                }
            }
        }
    }

    neighbors.sort_unstable_by(|a, b| {
        a.distance.total_cmp(&b.distance)
            .then(a.site.cmp(&b.site))
            .then(a.image.cmp(&b.image))
    });

    return Ok(neighbors);
}

fn check_radius(radius: f64) -> Result<(), Error> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidRadius(radius))
    }
}

/// Get the number of periodic images to search along each lattice vector to
/// find all neighbors up to `radius`.
///
/// Wrapped fractional coordinates differ by less than one cell along each
/// axis, so any image further than `ceil(radius / spacing)` cells from the
/// central one is also further than `radius` from the central site. Radii
/// requiring more than [`MAX_CELL_IMAGES`] images are rejected.
fn search_range(lattice: &Lattice, radius: f64) -> Result<[i32; 3], Error> {
    let spacing = lattice.distances_between_faces();
    let range = [
        f64::ceil(radius / spacing[0]),
        f64::ceil(radius / spacing[1]),
        f64::ceil(radius / spacing[2]),
    ];

    let n_images = range.iter().map(|n| 2.0 * n + 1.0).product::<f64>();
    if n_images > MAX_CELL_IMAGES {
        return Err(Error::InvalidRadius(radius));
    }

    return Ok([range[0] as i32, range[1] as i32, range[2] as i32]);
}

/// Neighbors of all the sites in a structure, up to a given radius.
#[derive(Clone, Debug)]
pub struct NeighborList {
    /// the search radius used to create this neighbor list
    pub radius: f64,
    /// were images of the central sites included when creating this list?
    pub include_self_images: bool,
    /// all neighbors of a given site, sorted as in [`find_neighbors`]
    neighbors_by_site: Vec<Vec<Neighbor>>,
}

impl NeighborList {
    /// Find the neighbors of all sites in `structure` up to `radius`
    #[time_graph::instrument(name = "NeighborList")]
    pub fn new(structure: &Structure, radius: f64, include_self_images: bool) -> Result<NeighborList, Error> {
        check_radius(radius)?;

        let neighbors_by_site = (0..structure.size())
            .into_par_iter()
            .map(|center| find_neighbors(structure, center, radius, include_self_images))
            .collect::<Result<Vec<_>, _>>()?;

        return Ok(NeighborList {
            radius: radius,
            include_self_images: include_self_images,
            neighbors_by_site: neighbors_by_site,
        });
    }

    /// Get the number of sites in this neighbor list
    pub fn size(&self) -> usize {
        self.neighbors_by_site.len()
    }

    /// Get the neighbors of the site at index `center`
    pub fn neighbors_of(&self, center: usize) -> &[Neighbor] {
        &self.neighbors_by_site[center]
    }
}
