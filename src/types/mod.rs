//! Core data model shared by every pipeline stage

pub mod geometry;
pub mod hits;
pub mod points;
pub mod track;

/// A 3D position or displacement in detector coordinates.
pub type Position = nalgebra::Vector3<f64>;
