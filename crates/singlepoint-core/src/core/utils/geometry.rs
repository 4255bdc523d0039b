use nalgebra::{Point3, Vector3};
use thiserror::Error;

const AXIS_NAMES: [char; 3] = ['x', 'y', 'z'];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BoxError {
    #[error("Box bounds along {axis} are inverted or empty (lo = {lo}, hi = {hi})")]
    InvertedBounds { axis: char, lo: f64, hi: f64 },
    #[error(
        "Cutoff {cutoff} must be smaller than half the shortest periodic box edge ({limit}) for the minimum-image convention"
    )]
    CutoffTooLarge { cutoff: f64, limit: f64 },
}

/// An orthogonal simulation box with an independent periodic flag per axis.
///
/// All pairwise displacements used by the potentials go through
/// [`PeriodicBox::minimum_image_delta`], never through raw coordinate differences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodicBox {
    lo: Vector3<f64>,
    hi: Vector3<f64>,
    periodic: [bool; 3],
}

impl PeriodicBox {
    pub fn new(lo: [f64; 3], hi: [f64; 3], periodic: [bool; 3]) -> Result<Self, BoxError> {
        for axis in 0..3 {
            if !(hi[axis] > lo[axis]) {
                return Err(BoxError::InvertedBounds {
                    axis: AXIS_NAMES[axis],
                    lo: lo[axis],
                    hi: hi[axis],
                });
            }
        }
        Ok(Self {
            lo: Vector3::from(lo),
            hi: Vector3::from(hi),
            periodic,
        })
    }

    /// Creates a box that is periodic along all three axes.
    pub fn fully_periodic(lo: [f64; 3], hi: [f64; 3]) -> Result<Self, BoxError> {
        Self::new(lo, hi, [true; 3])
    }

    /// The same bounds with different periodic flags.
    pub fn with_periodicity(self, periodic: [bool; 3]) -> Self {
        Self { periodic, ..self }
    }

    pub fn lo(&self) -> &Vector3<f64> {
        &self.lo
    }

    pub fn hi(&self) -> &Vector3<f64> {
        &self.hi
    }

    pub fn lengths(&self) -> Vector3<f64> {
        self.hi - self.lo
    }

    pub fn is_periodic(&self, axis: usize) -> bool {
        self.periodic[axis]
    }

    pub fn periodicity(&self) -> [bool; 3] {
        self.periodic
    }

    pub fn volume(&self) -> f64 {
        let lengths = self.lengths();
        lengths.x * lengths.y * lengths.z
    }

    pub fn min_periodic_length(&self) -> Option<f64> {
        let lengths = self.lengths();
        (0..3)
            .filter(|&axis| self.periodic[axis])
            .map(|axis| lengths[axis])
            .reduce(f64::min)
    }

    /// Checks the minimum-image validity condition for an interaction cutoff.
    ///
    /// The cutoff must be strictly smaller than half the shortest periodic edge,
    /// otherwise a pair could interact with more than one image of its partner.
    pub fn validate_cutoff(&self, cutoff: f64) -> Result<(), BoxError> {
        match self.min_periodic_length() {
            Some(min_length) if cutoff >= 0.5 * min_length => Err(BoxError::CutoffTooLarge {
                cutoff,
                limit: 0.5 * min_length,
            }),
            _ => Ok(()),
        }
    }

    /// Returns the displacement from `a` to the closest periodic image of `b`.
    #[inline]
    pub fn minimum_image_delta(&self, a: &Point3<f64>, b: &Point3<f64>) -> Vector3<f64> {
        let mut delta = b - a;
        let lengths = self.lengths();
        for axis in 0..3 {
            if self.periodic[axis] {
                let length = lengths[axis];
                delta[axis] -= length * (delta[axis] / length).round();
            }
        }
        delta
    }

    #[inline]
    pub fn distance(&self, a: &Point3<f64>, b: &Point3<f64>) -> f64 {
        self.minimum_image_delta(a, b).norm()
    }

    /// Maps a point into `[lo, hi)` along every periodic axis.
    pub fn wrap(&self, position: &Point3<f64>) -> Point3<f64> {
        let mut wrapped = *position;
        let lengths = self.lengths();
        for axis in 0..3 {
            if !self.periodic[axis] {
                continue;
            }
            let offset = (position[axis] - self.lo[axis]).rem_euclid(lengths[axis]);
            wrapped[axis] = self.lo[axis] + offset;
            // rem_euclid can round up to exactly the box length
            if wrapped[axis] >= self.hi[axis] {
                wrapped[axis] = self.lo[axis];
            }
        }
        wrapped
    }
}
