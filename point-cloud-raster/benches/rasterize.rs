use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use point_cloud_raster::rasterizer::build_triangles;
use point_cloud_raster::{
    PixelBuffer, Point, PointCloud, Projection, RasterContext, Rasterizer, RenderSettings,
    filter_triangles, triangulate,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random survey of a gently sloping seabed
fn survey(count: usize) -> PointCloud {
    let mut rng = StdRng::seed_from_u64(1);
    let points = (0..count)
        .map(|_| {
            let x = rng.gen_range(0.0..2000.0);
            let y = rng.gen_range(0.0..1500.0);
            Point::new(x, y, -(10.0 + x * 0.01 + y * 0.02) - rng.gen_range(0.0..0.5))
        })
        .collect();
    let mut cloud = PointCloud::new(points);
    cloud.project(&Projection::Planar);
    cloud
}

/// Sequential against parallel rasterization of the same mesh
fn bench_rasterize(c: &mut Criterion) {
    let cloud = survey(20_000);
    let ctx = RasterContext::new(1024, 768, &cloud.bounds(), &RenderSettings::default()).unwrap();
    let indices = triangulate(cloud.coords()).unwrap();
    let filter = filter_triangles(cloud.coords(), &indices);
    let (triangles, _) = build_triangles(cloud.points(), &filter.kept, &ctx);
    let rasterizer = Rasterizer::new(&ctx);

    let mut group = c.benchmark_group("rasterize_1024x768");
    group.bench_function(BenchmarkId::new("sequential", triangles.len()), |b| {
        b.iter(|| {
            let mut buffer = PixelBuffer::new(&ctx);
            rasterizer.rasterize(black_box(&triangles), &mut buffer)
        })
    });
    group.bench_function(BenchmarkId::new("parallel", triangles.len()), |b| {
        b.iter(|| {
            let mut buffer = PixelBuffer::new(&ctx);
            rasterizer.rasterize_parallel(black_box(&triangles), &mut buffer)
        })
    });
    group.finish();
}

/// Delaunay triangulation plus boundary filtering
fn bench_mesh(c: &mut Criterion) {
    let cloud = survey(20_000);
    c.bench_function("triangulate_and_filter_20k", |b| {
        b.iter(|| {
            let indices = triangulate(black_box(cloud.coords())).unwrap();
            filter_triangles(cloud.coords(), &indices)
        })
    });
}

criterion_group!(benches, bench_rasterize, bench_mesh);
criterion_main!(benches);
