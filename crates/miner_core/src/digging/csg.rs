//! Constructive solid geometry handed to the terrain engine.
//!
//! Shapes are signed distance expressions: negative inside, positive
//! outside. Nodes combine expressions with boolean operators and can be
//! evaluated at a point, so a modification can be checked without a
//! terrain engine.

use std::f32::consts::PI;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Signed distance expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Ball.
    Sphere {
        /// Centre.
        center: Vec3,
        /// Radius.
        radius: f32,
    },
    /// Axis-aligned box.
    Box {
        /// Centre.
        center: Vec3,
        /// Half extents along each axis.
        half_extents: Vec3,
    },
    /// Y-aligned cylinder.
    Cylinder {
        /// Centre.
        center: Vec3,
        /// Radius in the XZ plane.
        radius: f32,
        /// Half height along Y.
        half_height: f32,
    },
    /// Everything behind a plane: `dot(p - anchor, normal)`.
    HalfSpace {
        /// Point on the plane.
        anchor: Vec3,
        /// Unit normal pointing outside.
        normal: Vec3,
    },
    /// Maximum of the sub-expressions, which intersects them.
    Max(Vec<Expr>),
}

impl Expr {
    /// Signed distance at `p`.
    #[must_use]
    pub fn distance(&self, p: Vec3) -> f32 {
        match self {
            Self::Sphere { center, radius } => (p - *center).length() - radius,
            Self::Box {
                center,
                half_extents,
            } => {
                let q = (p - *center).abs() - *half_extents;
                q.max(Vec3::ZERO).length() + q.max_element().min(0.0)
            }
            Self::Cylinder {
                center,
                radius,
                half_height,
            } => {
                let d = p - *center;
                let radial = (d.x * d.x + d.z * d.z).sqrt() - radius;
                let axial = d.y.abs() - half_height;
                let outside = Vec3::new(radial.max(0.0), axial.max(0.0), 0.0).length();
                outside + radial.max(axial).min(0.0)
            }
            Self::HalfSpace { anchor, normal } => (p - *anchor).dot(*normal),
            Self::Max(parts) => parts
                .iter()
                .map(|e| e.distance(p))
                .fold(f32::NEG_INFINITY, f32::max),
        }
    }
}

/// Boolean composition of expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CsgNode {
    /// Leaf.
    Expression(Expr),
    /// Inside any child.
    Union(Vec<CsgNode>),
    /// Inside every child.
    Intersection(Vec<CsgNode>),
    /// Inside `base` and outside every node in `subtract`.
    Diff {
        /// Shape to cut from.
        base: Box<CsgNode>,
        /// Shapes removed from `base`.
        subtract: Vec<CsgNode>,
    },
}

impl CsgNode {
    /// Signed distance at `p`. An empty union is empty space and an empty
    /// intersection is all of space.
    #[must_use]
    pub fn distance(&self, p: Vec3) -> f32 {
        match self {
            Self::Expression(e) => e.distance(p),
            Self::Union(children) => children
                .iter()
                .map(|c| c.distance(p))
                .fold(f32::INFINITY, f32::min),
            Self::Intersection(children) => children
                .iter()
                .map(|c| c.distance(p))
                .fold(f32::NEG_INFINITY, f32::max),
            Self::Diff { base, subtract } => subtract
                .iter()
                .map(|c| -c.distance(p))
                .fold(base.distance(p), f32::max),
        }
    }

    /// Whether `p` lies inside the shape.
    #[must_use]
    pub fn contains(&self, p: Vec3) -> bool {
        self.distance(p) < 0.0
    }
}

impl From<Expr> for CsgNode {
    fn from(expr: Expr) -> Self {
        Self::Expression(expr)
    }
}

/// Bounding sphere limiting which terrain a modification touches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    /// Centre, also the reference point for drone constraints.
    pub center: Vec3,
    /// Radius.
    pub radius: f32,
}

/// Shape of a dig or placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DigShape {
    /// Ball.
    Sphere {
        /// Centre.
        center: Vec3,
        /// Radius.
        radius: f32,
    },
    /// Axis-aligned box.
    Box {
        /// Centre.
        center: Vec3,
        /// Half extents.
        half_extents: Vec3,
    },
    /// Y-aligned cylinder.
    Cylinder {
        /// Centre.
        center: Vec3,
        /// Radius.
        radius: f32,
        /// Half height.
        half_height: f32,
    },
}

impl DigShape {
    /// Signed distance expression of the shape.
    #[must_use]
    pub fn expression(&self) -> Expr {
        match *self {
            Self::Sphere { center, radius } => Expr::Sphere { center, radius },
            Self::Box {
                center,
                half_extents,
            } => Expr::Box {
                center,
                half_extents,
            },
            Self::Cylinder {
                center,
                radius,
                half_height,
            } => Expr::Cylinder {
                center,
                radius,
                half_height,
            },
        }
    }

    /// Enclosed volume in m³.
    #[must_use]
    pub fn volume(&self) -> f32 {
        match *self {
            Self::Sphere { radius, .. } => 4.0 / 3.0 * PI * radius.powi(3),
            Self::Box { half_extents, .. } => 8.0 * half_extents.x * half_extents.y * half_extents.z,
            Self::Cylinder {
                radius,
                half_height,
                ..
            } => PI * radius * radius * 2.0 * half_height,
        }
    }

    /// Smallest sphere around the shape.
    #[must_use]
    pub fn boundary(&self) -> Boundary {
        match *self {
            Self::Sphere { center, radius } => Boundary { center, radius },
            Self::Box {
                center,
                half_extents,
            } => Boundary {
                center,
                radius: half_extents.length(),
            },
            Self::Cylinder {
                center,
                radius,
                half_height,
            } => Boundary {
                center,
                radius: radius.hypot(half_height),
            },
        }
    }
}
