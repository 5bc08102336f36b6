use std::fs;

use anyhow::Result;
use approx::assert_relative_eq;
use nucleorad::summary::DEFAULT_BINS;
use nucleorad::utils::sampling::sample_boundary;
use nucleorad::{compute_metrics, table, MetricsSummary};

const MEASUREMENTS: &str = "\
Label,Area,X,Y,Feret,MinFeret,FeretAngle
1,0.2,10,0,1.1,0.9,12
2,0.3,0,2.5,1.0,0.8,40
3,0.2,0,12,0.9,0.9,3
4,157.1,0,0,20,10,0
";

#[test]
fn test_csv_round_trip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("cell.csv");
    fs::write(&input, MEASUREMENTS)?;

    let df = table::read_table(&input)?;
    let (ellipse, points) = table::split_table(&df)?;
    assert_eq!(points.len(), 3);
    assert_eq!(ellipse.semi_major(), 10.0);

    let metrics = compute_metrics(&ellipse, &points);
    let mut augmented = table::augment_table(&df, &metrics)?;

    let output = dir.path().join("out").join("cell_radial.csv");
    table::write_table(&output, &mut augmented)?;

    let written = table::read_table(&output)?;
    assert_eq!(written.height(), 4);
    assert!(written.column("Area").is_ok());

    let edge = written.column("Center_to_Edge_Distance")?.f64()?;
    assert_relative_eq!(edge.get(0).unwrap(), 10.0, epsilon = 1e-9);
    assert_relative_eq!(edge.get(1).unwrap(), 5.0, epsilon = 1e-9);
    assert_eq!(edge.get(3), None);

    let periphery = written.column("Distance_to_Periphery")?.f64()?;
    assert_relative_eq!(periphery.get(1).unwrap(), 2.5, epsilon = 1e-9);
    assert_eq!(periphery.get(2), Some(0.0));

    // re-running on the output keeps the nucleus row last and replaces the metric columns
    let (_, again) = table::split_table(&written)?;
    let rerun = table::augment_table(&written, &compute_metrics(&ellipse, &again))?;
    assert_eq!(rerun.width(), written.width());

    Ok(())
}

#[test]
fn test_summary_serializes() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("cell.csv");
    fs::write(&input, MEASUREMENTS)?;

    let df = table::read_table(&input)?;
    let (ellipse, points) = table::split_table(&df)?;
    let summary = MetricsSummary::new(&ellipse, &compute_metrics(&ellipse, &points), DEFAULT_BINS)?;

    let json: serde_json::Value = serde_json::from_str(&serde_json::to_string(&summary)?)?;
    assert_eq!(json["points"], 3);
    assert_eq!(json["inside"], 2);
    assert_eq!(json["metrics"][2]["name"], "Distance_Ratio");
    assert_eq!(json["metrics"][0]["describe"]["count"], 3);
    assert_eq!(
        json["metrics"][0]["histogram"]["counts"].as_array().map(|c| c.len()),
        Some(DEFAULT_BINS)
    );
    Ok(())
}

#[test]
fn test_boundary_table() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let df = table::read_table(&{
        let input = dir.path().join("cell.csv");
        fs::write(&input, MEASUREMENTS)?;
        input
    })?;
    let (ellipse, _) = table::split_table(&df)?;

    let mut boundary = table::points_table(&sample_boundary(&ellipse, 90))?;
    let path = dir.path().join("boundary.csv");
    table::write_table(&path, &mut boundary)?;

    let written = table::read_table(&path)?;
    assert_eq!(written.height(), 90);
    assert_eq!(written.width(), 2);
    Ok(())
}

#[test]
fn test_missing_file() {
    let err = table::read_table(std::path::Path::new("/nonexistent/cell.csv"));
    assert!(err.is_err());
}
