use nalgebra as na;
use nucleorad::{compute_metrics, NucleusEllipse};

fn main() -> Result<(), nucleorad::Error> {
    // Nucleus 20 x 10 units, major axis tilted by 30 degrees
    let nucleus = NucleusEllipse::from_feret(50.0, 40.0, 20.0, 10.0, 30.0)?;

    let centromeres = [
        na::Point2::new(50.0, 40.0),
        na::Point2::new(55.0, 43.0),
        na::Point2::new(48.0, 45.0),
        na::Point2::new(62.0, 40.0),
    ];

    for (p, m) in centromeres.iter().zip(compute_metrics(&nucleus, &centromeres)) {
        println!(
            "({:>5.1}, {:>5.1})  center {:.3}  edge {:.3}  ratio {:.3}  periphery {:.3}",
            p.x, p.y, m.distance_to_center, m.distance_to_edge, m.ratio, m.distance_to_periphery
        );
    }

    Ok(())
}
