use point_cloud_raster::{
    Point, PointCloud, Projection, RasterContext, RenderSettings, render_mesh, triangulate,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn unit_square() -> PointCloud {
    PointCloud::new(vec![
        Point::new(0.0, 1.0, 0.0),
        Point::new(1.0, 1.0, -1.0),
        Point::new(0.0, 0.0, -1.0),
        Point::new(1.0, 0.0, -2.0),
    ])
}

#[test]
fn unit_square_paints_every_cell_with_monotone_colours() {
    let mut cloud = unit_square();
    let bounds = cloud.project(&Projection::Planar);
    assert_eq!(bounds.min_depth, 0.0);
    assert_eq!(bounds.max_depth, -2.0);

    let ctx = RasterContext::new(4, 4, &bounds, &RenderSettings::default()).unwrap();
    let indices = triangulate(cloud.coords()).unwrap();
    assert_eq!(indices.len(), 6);

    let raster = render_mesh(cloud.points(), cloud.coords(), &indices, &ctx, false).unwrap();
    assert_eq!(raster.filter.rejected, 0);
    assert_eq!(raster.report.pixels_painted, 16);
    assert_eq!(raster.report.pixels_clamped, 0);

    let colors = raster.buffer.colors();
    for row in 0..4 {
        for col in 0..4 {
            let here = colors[row * 4 + col];
            assert_ne!(here, ctx.default_color);
            // depth = y - 1 - x decreases eastward and southward
            if col > 0 {
                assert!(here >= colors[row * 4 + col - 1]);
            }
            if row > 0 {
                assert!(here >= colors[(row - 1) * 4 + col]);
            }
        }
    }

    // top-left centre (0.125, 0.875) sits at depth -0.25
    let expected = 0.25 / 2.0 * ctx.nb_colors as f64;
    assert!((colors[0] as f64 - expected).abs() <= 1.0, "{}", colors[0]);

    // both triangles share one plane, hence one shade
    let illumination = raster.buffer.illumination();
    for value in illumination {
        assert!((0.5..=1.0).contains(value));
        assert!((value - illumination[0]).abs() < 1e-12);
    }
}

#[test]
fn parallel_rendering_is_identical_on_random_surveys() {
    let mut rng = StdRng::seed_from_u64(42);
    let points: Vec<Point> = (0..500)
        .map(|_| {
            let x = rng.gen_range(0.0..250.0);
            let y = rng.gen_range(0.0..120.0);
            Point::new(x, y, -(x * 0.02 + y * 0.05) - rng.gen_range(0.0..1.5))
        })
        .collect();
    let mut cloud = PointCloud::new(points);
    let bounds = cloud.project(&Projection::Planar);
    let ctx = RasterContext::new(97, 53, &bounds, &RenderSettings::default()).unwrap();
    let indices = triangulate(cloud.coords()).unwrap();

    let sequential = render_mesh(cloud.points(), cloud.coords(), &indices, &ctx, false).unwrap();
    let parallel = render_mesh(cloud.points(), cloud.coords(), &indices, &ctx, true).unwrap();

    assert_eq!(sequential.buffer, parallel.buffer);
    assert_eq!(sequential.report, parallel.report);
    assert!(sequential.report.pixels_painted > 97 * 53 / 2);
}

#[test]
fn lambert_projection_yields_metric_bounds() {
    let mut cloud = PointCloud::new(vec![
        Point::new(-3.02, 48.19, 10.0),
        Point::new(-3.00, 48.19, 12.0),
        Point::new(-3.01, 48.21, 15.0),
    ]);
    let bounds = cloud.project(&Projection::default());
    let (width, height) = bounds.extent();

    // 0.02° of longitude at 48.2°N is about 1.48 km, 0.02° of latitude 2.22 km
    assert!((width - 1484.0).abs() < 20.0, "{width}");
    assert!((height - 2224.0).abs() < 20.0, "{height}");
    assert_eq!(bounds.min_depth, -10.0);
    assert_eq!(bounds.max_depth, -15.0);
}
