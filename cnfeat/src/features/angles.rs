use crate::Vector3D;

/// Statistics on the angles (in degrees) between all pairs of neighbors, as
/// seen from the central site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleStatistics {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std: f64,
}

impl AngleStatistics {
    /// Compute angle statistics from the vectors going from the central site
    /// to each neighbor. This returns `None` with less than three neighbors.
    pub fn new(vectors: &[Vector3D]) -> Option<AngleStatistics> {
        if vectors.len() < 3 {
            return None;
        }

        let mut angles = Vec::with_capacity(vectors.len() * (vectors.len() - 1) / 2);
        for (i, first) in vectors.iter().enumerate() {
            for second in &vectors[(i + 1)..] {
                angles.push(angle(first, second));
            }
        }

        let count = angles.len() as f64;
        let mean = angles.iter().sum::<f64>() / count;
        let variance = angles.iter().map(|a| (a - mean) * (a - mean)).sum::<f64>() / count;

        return Some(AngleStatistics {
            mean: mean,
            min: angles.iter().copied().fold(f64::INFINITY, f64::min),
            max: angles.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            std: variance.sqrt(),
        });
    }
}

/// Angle between `u` and `v`, in degrees
fn angle(u: &Vector3D, v: &Vector3D) -> f64 {
    let cos = (u * v) / (u.norm() * v.norm());
    // rounding errors can bring cos slightly outside of [-1, 1]
    return f64::acos(cos.clamp(-1.0, 1.0)).to_degrees();
}
