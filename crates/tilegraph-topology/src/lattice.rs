//! Integer lattice addresses shared by both grid topologies.
//!
//! Hex tiles use cube coordinates, where the three axes always sum to zero.
//! Square tiles use the first two components and keep `z` at zero.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Integer address of a tile on the lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LatticeCoord {
    /// First axis
    pub x: i32,
    /// Second axis
    pub y: i32,
    /// Third axis (cube constraint for hex, always zero for square)
    pub z: i32,
}

impl LatticeCoord {
    /// Origin of the lattice.
    pub const ORIGIN: Self = Self { x: 0, y: 0, z: 0 };

    /// Create a new coordinate.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Cube coordinate from its first two axes; `z = -x - y`.
    pub const fn cube(x: i32, y: i32) -> Self {
        Self { x, y, z: -x - y }
    }

    /// Planar coordinate for square grids (`z = 0`).
    pub const fn planar(x: i32, y: i32) -> Self {
        Self { x, y, z: 0 }
    }

    /// Whether the cube constraint `x + y + z = 0` holds.
    pub const fn is_cube(&self) -> bool {
        self.x + self.y + self.z == 0
    }

    /// Chebyshev (cube) distance: the largest absolute axis difference.
    pub fn chebyshev_distance(&self, other: &Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        let dz = self.z.abs_diff(other.z);
        dx.max(dy).max(dz)
    }

    /// Euclidean distance between the two lattice points.
    pub fn euclidean_distance(&self, other: &Self) -> f32 {
        let d = *self - *other;
        ((d.x * d.x + d.y * d.y + d.z * d.z) as f32).sqrt()
    }

    /// Squared length of the coordinate taken as a vector.
    pub const fn length_squared(&self) -> i32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Components as a tuple, handy for sorting and display.
    pub const fn to_tuple(self) -> (i32, i32, i32) {
        (self.x, self.y, self.z)
    }
}

impl Add for LatticeCoord {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl AddAssign for LatticeCoord {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for LatticeCoord {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for LatticeCoord {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Mul<i32> for LatticeCoord {
    type Output = Self;

    #[inline]
    fn mul(self, k: i32) -> Self {
        Self {
            x: self.x * k,
            y: self.y * k,
            z: self.z * k,
        }
    }
}

impl From<(i32, i32, i32)> for LatticeCoord {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self { x, y, z }
    }
}

impl std::fmt::Display for LatticeCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl std::str::FromStr for LatticeCoord {
    type Err = crate::Error;

    /// Parses `x,y,z` (whitespace and surrounding parentheses allowed).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('(').trim_end_matches(')');
        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        let [x, y, z] = parts.as_slice() else {
            return Err(crate::Error::MalformedCoord(s.to_string()));
        };
        let parse = |v: &str| {
            v.parse::<i32>()
                .map_err(|_| crate::Error::MalformedCoord(s.to_string()))
        };
        Ok(Self::new(parse(*x)?, parse(*y)?, parse(*z)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_zero() {
        let origin = LatticeCoord::ORIGIN;
        assert_eq!(origin.to_tuple(), (0, 0, 0));
        assert!(origin.is_cube());
    }

    #[test]
    fn cube_constructor_keeps_constraint() {
        for (x, y) in [(0, 0), (1, 0), (1, -1), (-3, 5), (7, 2)] {
            assert!(LatticeCoord::cube(x, y).is_cube());
        }
        assert!(!LatticeCoord::new(1, 1, 1).is_cube());
    }

    #[test]
    fn chebyshev_distance_is_largest_axis_gap() {
        let a = LatticeCoord::cube(0, 0);
        let b = LatticeCoord::cube(2, -3);
        assert_eq!(a.chebyshev_distance(&b), 3);
        assert_eq!(b.chebyshev_distance(&a), 3);
    }

    #[test]
    fn euclidean_distance_of_unit_diagonal() {
        let d = LatticeCoord::planar(0, 0).euclidean_distance(&LatticeCoord::planar(1, 1));
        assert!((d - std::f32::consts::SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn addition_subtraction() {
        let a = LatticeCoord::new(1, 2, 3);
        let b = LatticeCoord::new(4, -1, 2);

        assert_eq!(a + b, LatticeCoord::new(5, 1, 5));
        assert_eq!(a - b, LatticeCoord::new(-3, 3, 1));
        assert_eq!(a + (-b), a - b);
        assert_eq!(a * 2, a + a);
    }

    #[test]
    fn parses_from_text() {
        assert_eq!("1,-2,1".parse::<LatticeCoord>().ok(), Some(LatticeCoord::new(1, -2, 1)));
        assert_eq!("(0, 3, -3)".parse::<LatticeCoord>().ok(), Some(LatticeCoord::cube(0, 3)));
        assert!("1,2".parse::<LatticeCoord>().is_err());
        assert!("a,b,c".parse::<LatticeCoord>().is_err());
    }
}
