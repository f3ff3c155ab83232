use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Side length of a chunk column and of a vertical chunk band.
pub const CHUNK_SIZE: i32 = 16;
const CHUNK_SHIFT: i32 = 4;

/// Chunk coordinate of a world-space component.
///
/// Floors before shifting so negative fractional coordinates land in the
/// chunk their block actually belongs to.
#[inline(always)]
pub fn chunk_coord(v: f64) -> i32 {
    (v.floor() as i32) >> CHUNK_SHIFT
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vec3 { x, y, z }
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero-length vector.
    pub fn normalize(&self) -> Vec3 {
        let len = self.length();
        if len <= f64::EPSILON {
            return Vec3::ZERO;
        }
        Vec3::new(self.x / len, self.y / len, self.z / len)
    }

    pub fn component_min(&self, other: &Vec3) -> Vec3 {
        Vec3::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    pub fn component_max(&self, other: &Vec3) -> Vec3 {
        Vec3::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }

    /// `(chunkX, chunkY, chunkZ)` of the cell containing this point.
    pub fn chunk_cell(&self) -> (i32, i32, i32) {
        (chunk_coord(self.x), chunk_coord(self.y), chunk_coord(self.z))
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<(f64, f64, f64)> for Vec3 {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Vec3::new(x, y, z)
    }
}

impl From<(i32, i32, i32)> for Vec3 {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Vec3::new(x as f64, y as f64, z as f64)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Inclusive chunk-cell range covered by a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpan {
    pub min: (i32, i32, i32),
    pub max: (i32, i32, i32),
}

impl ChunkSpan {
    /// Iterates `(chunkX, chunkZ, chunkY)` for every covered cell.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, i32)> + '_ {
        let (min_x, min_y, min_z) = self.min;
        let (max_x, max_y, max_z) = self.max;
        (min_x..=max_x).flat_map(move |cx| {
            (min_z..=max_z).flat_map(move |cz| (min_y..=max_y).map(move |cy| (cx, cz, cy)))
        })
    }

    pub fn columns(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let (min_x, _, min_z) = self.min;
        let (max_x, _, max_z) = self.max;
        (min_x..=max_x).flat_map(move |cx| (min_z..=max_z).map(move |cz| (cx, cz)))
    }
}

/// Axis-aligned box with `min <= max` on every axis.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// Builds a box from two opposite corners given in any order.
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        BoundingBox {
            min: a.component_min(&b),
            max: a.component_max(&b),
        }
    }

    /// Inclusive on every face.
    #[inline(always)]
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    pub fn get_dimensions(&self) -> (f64, f64, f64) {
        (
            self.max.x - self.min.x,
            self.max.y - self.min.y,
            self.max.z - self.min.z,
        )
    }

    pub fn chunk_span(&self) -> ChunkSpan {
        ChunkSpan {
            min: self.min.chunk_cell(),
            max: self.max.chunk_cell(),
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.min, self.max)
    }
}
