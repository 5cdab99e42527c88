//! Carve demo: builds a cube brush from six planes, slices a corner
//! off, and prints the resulting topology and a pick result.
//!
//! Usage:
//! ```text
//! cargo run --example carve
//! RUST_LOG=polycarve=trace cargo run --example carve
//! ```

use polycarve::geometry::{Aabb, Plane, Ray};
use polycarve::math::{Point3, Vector3};
use polycarve::operations::creation::FromPlanes;
use polycarve::operations::modification::{ClipPlane, ClipResult};
use polycarve::operations::query::RayPick;
use polycarve::Polyhedron;

fn main() -> polycarve::Result<()> {
    // Default: WARN for everything, DEBUG for polycarve.
    // Override with RUST_LOG (e.g. RUST_LOG=polycarve=trace).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("polycarve=debug".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let world = Aabb::new(
        Point3::new(-1024.0, -1024.0, -1024.0),
        Point3::new(1024.0, 1024.0, 1024.0),
    );
    let planes = vec![
        Plane::from_point_normal(Point3::new(64.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0))?,
        Plane::from_point_normal(Point3::new(0.0, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0))?,
        Plane::from_point_normal(Point3::new(0.0, 64.0, 0.0), Vector3::new(0.0, 1.0, 0.0))?,
        Plane::from_point_normal(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, -1.0, 0.0))?,
        Plane::from_point_normal(Point3::new(0.0, 0.0, 64.0), Vector3::new(0.0, 0.0, 1.0))?,
        Plane::from_point_normal(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0))?,
    ];

    let mut brush: Polyhedron = FromPlanes::new(planes, world).execute();
    print_stats("cube brush", &brush);

    let cut = Plane::from_point_normal(
        Point3::new(64.0, 64.0, 32.0),
        Vector3::new(1.0, 1.0, 1.0),
    )?;
    match ClipPlane::new(cut).execute(&mut brush) {
        ClipResult::Clipped(cap) => {
            let normal = brush.face_normal(cap)?;
            println!(
                "carved corner; cap face has {} vertices, normal ({:.3}, {:.3}, {:.3})",
                brush.face(cap)?.vertex_count(),
                normal.x,
                normal.y,
                normal.z
            );
        }
        other => println!("clip result: {other:?}"),
    }
    print_stats("carved brush", &brush);

    let ray = Ray::new(Point3::new(128.0, 32.0, 32.0), Vector3::new(-1.0, 0.0, 0.0))?;
    match RayPick::new(ray).execute(&brush) {
        Some(hit) => println!(
            "pick from +x: face {:?} at distance {:.1}",
            hit.face, hit.distance
        ),
        None => println!("pick from +x: miss"),
    }

    Ok(())
}

fn print_stats(label: &str, poly: &Polyhedron) {
    println!(
        "{label}: {} faces, {} vertices, {} edges (valid: {})",
        poly.face_count(),
        poly.vertex_count(),
        poly.edge_count(),
        poly.is_valid()
    );
}
