use nalgebra as na;

use crate::geom::NucleusEllipse;

/// Helper function to create points along the ellipse boundary for visualization.
///
/// Points are evenly spaced in the parametric angle, start on the positive local major axis
/// and run counter-clockwise.
pub fn sample_boundary<F: na::RealField + Copy>(
    ellipse: &NucleusEllipse<F>,
    num_points: usize,
) -> Vec<na::Point2<F>> {
    let step = if num_points == 0 {
        F::zero()
    } else {
        F::two_pi() / na::convert::<f64, F>(num_points as f64)
    };

    (0..num_points)
        .map(|i| {
            let t = step * na::convert::<f64, F>(i as f64);

            // Point in local frame
            let local = na::Point2::new(
                ellipse.semi_major() * t.cos(),
                ellipse.semi_minor() * t.sin(),
            );

            ellipse.from_local(&local)
        })
        .collect()
}
