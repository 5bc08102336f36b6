//! Radial position of points relative to a nucleus outline.

use nalgebra as na;
use serde::Serialize;

use crate::geom::NucleusEllipse;

/// Output column names, in the order of `<[F; 4]>::from(PointMetrics)`.
pub const METRIC_NAMES: [&str; 4] = [
    "Distance_to_Center",
    "Center_to_Edge_Distance",
    "Distance_Ratio",
    "Distance_to_Periphery",
];

/// Radial measurements of one point against the nucleus ellipse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointMetrics<F: na::RealField + Copy> {
    /// Euclidean distance from the ellipse center
    pub distance_to_center: F,
    /// Distance from the center to the boundary along the ray through the point
    pub distance_to_edge: F,
    /// `distance_to_center / distance_to_edge`; 1 on the boundary
    pub ratio: F,
    /// Remaining distance outward to the boundary, zero once the point is on or outside it
    pub distance_to_periphery: F,
}

impl<F: na::RealField + Copy> PointMetrics<F> {
    pub fn is_inside(&self) -> bool {
        self.distance_to_center <= self.distance_to_edge
    }
}

impl<F: na::RealField + Copy> From<PointMetrics<F>> for [F; 4] {
    fn from(value: PointMetrics<F>) -> Self {
        [
            value.distance_to_center,
            value.distance_to_edge,
            value.ratio,
            value.distance_to_periphery,
        ]
    }
}

pub fn point_metrics<F: na::RealField + Copy>(
    ellipse: &NucleusEllipse<F>,
    point: &na::Point2<F>,
) -> PointMetrics<F> {
    let distance_to_center = ellipse.distance_to_center(point);
    let distance_to_edge = ellipse.radius_towards(point);

    // edge distance is strictly positive for a validated ellipse
    let ratio = distance_to_center / distance_to_edge;

    let distance_to_periphery = if distance_to_center <= distance_to_edge {
        distance_to_edge - distance_to_center
    } else {
        F::zero()
    };

    PointMetrics {
        distance_to_center,
        distance_to_edge,
        ratio,
        distance_to_periphery,
    }
}

/// Computes [`PointMetrics`] for every point, preserving input order.
pub fn compute_metrics<F: na::RealField + Copy>(
    ellipse: &NucleusEllipse<F>,
    points: &[na::Point2<F>],
) -> Vec<PointMetrics<F>> {
    points.iter().map(|p| point_metrics(ellipse, p)).collect()
}
