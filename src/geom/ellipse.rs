use nalgebra as na;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EllipseError {
    #[error("Semi-major axis must be positive, got {0}")]
    NonPositiveSemiMajorAxis(f64),

    #[error("Semi-minor axis must be positive, got {0}")]
    NonPositiveSemiMinorAxis(f64),

    #[error("Ellipse parameter '{0}' is not finite")]
    NonFinite(&'static str),
}

/// The fitted outline of a nucleus: an ellipse in the image plane.
///
/// Rotation is stored in degrees, counter-clockwise from the x-axis, as it comes out of
/// Feret measurements. The semi-axes are kept as given, so `semi_minor > semi_major` is
/// representable and simply describes an ellipse elongated along the local y-axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NucleusEllipse<F: na::RealField + Copy> {
    center: na::Point2<F>,
    semi_major: F,
    semi_minor: F,
    rotation_deg: F,
    orientation: na::Rotation2<F>,
}

impl<F: na::RealField + Copy> NucleusEllipse<F> {
    pub fn new(
        center: na::Point2<F>,
        semi_major: F,
        semi_minor: F,
        rotation_deg: F,
    ) -> Result<Self, EllipseError> {
        if !(center.x.is_finite() && center.y.is_finite()) {
            return Err(EllipseError::NonFinite("center"));
        }
        if !semi_major.is_finite() {
            return Err(EllipseError::NonFinite("semi_major"));
        }
        if !semi_minor.is_finite() {
            return Err(EllipseError::NonFinite("semi_minor"));
        }
        if !rotation_deg.is_finite() {
            return Err(EllipseError::NonFinite("rotation"));
        }
        if semi_major <= F::zero() {
            return Err(EllipseError::NonPositiveSemiMajorAxis(
                semi_major.to_subset_unchecked(),
            ));
        }
        if semi_minor <= F::zero() {
            return Err(EllipseError::NonPositiveSemiMinorAxis(
                semi_minor.to_subset_unchecked(),
            ));
        }

        let radians = rotation_deg * F::pi() / na::convert::<f64, F>(180.0);

        Ok(Self {
            center,
            semi_major,
            semi_minor,
            rotation_deg,
            orientation: na::Rotation2::new(radians),
        })
    }

    /// Builds the ellipse from caliper measurements: `feret` and `min_feret` are full
    /// diameters, `feret_angle` is the orientation of the maximum diameter in degrees.
    pub fn from_feret(
        x: F,
        y: F,
        feret: F,
        min_feret: F,
        feret_angle: F,
    ) -> Result<Self, EllipseError> {
        let two = na::convert::<f64, F>(2.0);
        Self::new(
            na::Point2::new(x, y),
            feret / two,
            min_feret / two,
            feret_angle,
        )
    }

    pub fn center(&self) -> na::Point2<F> {
        self.center
    }

    pub fn semi_major(&self) -> F {
        self.semi_major
    }

    pub fn semi_minor(&self) -> F {
        self.semi_minor
    }

    /// Rotation in degrees
    pub fn rotation(&self) -> F {
        self.rotation_deg
    }

    pub fn area(&self) -> F {
        F::pi() * self.semi_major * self.semi_minor
    }

    /// Expresses a world point in the ellipse frame: translated to the center, then rotated
    /// by `-rotation` so the major axis lies on the local x-axis.
    pub fn to_local(&self, point: &na::Point2<F>) -> na::Point2<F> {
        na::Point2::from(
            self.orientation
                .inverse_transform_vector(&(point.coords - self.center.coords)),
        )
    }

    /// Inverse of [`NucleusEllipse::to_local`].
    pub fn from_local(&self, local: &na::Point2<F>) -> na::Point2<F> {
        self.center + self.orientation.transform_vector(&local.coords)
    }

    pub fn distance_to_center(&self, point: &na::Point2<F>) -> F {
        na::distance(&self.center, point)
    }

    /// Polar angle of `point` in the ellipse frame, in (-π, π].
    ///
    /// A point sitting on the center has no direction; it is assigned angle 0 (the local
    /// positive major axis) whatever the signs of its zero components.
    pub fn local_angle(&self, point: &na::Point2<F>) -> F {
        let local = self.to_local(point);
        if local.x == F::zero() && local.y == F::zero() {
            F::zero()
        } else {
            local.y.atan2(local.x)
        }
    }

    /// Distance from the center to the boundary along the ray at local polar angle `theta`:
    /// `r(θ) = ab / √((b cosθ)² + (a sinθ)²)`.
    pub fn polar_radius(&self, theta: F) -> F {
        let a = self.semi_major;
        let b = self.semi_minor;
        (a * b) / ((b * theta.cos()).powi(2) + (a * theta.sin()).powi(2)).sqrt()
    }

    /// Distance from the center to the boundary along the ray through `point`.
    pub fn radius_towards(&self, point: &na::Point2<F>) -> F {
        self.polar_radius(self.local_angle(point))
    }

    /// Inclusive of the boundary.
    pub fn contains(&self, point: &na::Point2<F>) -> bool {
        self.distance_to_center(point) <= self.radius_towards(point)
    }
}
