use criterion::{Criterion, black_box, criterion_group, criterion_main};
use orbis_camera::GlobeCamera;
use orbis_lod::{LodSelector, MAX_DEPTH, order_visible};
use orbis_tiles::{GroundRect, Quadtree, sane_earth};

fn earth_trees() -> Vec<Quadtree> {
    sane_earth(2)
        .divisible
        .into_iter()
        .map(Quadtree::web_mercator)
        .collect()
}

fn camera_at(altitude: f64) -> GlobeCamera {
    let mut camera = GlobeCamera::new(60.0, 1280, 720);
    camera.go_to_lon_lat(-122.444_872, 37.756_605, altitude);
    camera
}

fn bench_select_high(c: &mut Criterion) {
    let mut trees = earth_trees();
    let camera = camera_at(1000.0);
    let selector = LodSelector::new(4.0, MAX_DEPTH);
    c.bench_function("select_1000km", |bencher| {
        bencher.iter(|| black_box(selector.select(&mut trees, &camera)))
    });
}

fn bench_select_low(c: &mut Criterion) {
    let mut trees = earth_trees();
    let camera = camera_at(2.0);
    let selector = LodSelector::new(4.0, MAX_DEPTH);
    c.bench_function("select_2km", |bencher| {
        bencher.iter(|| {
            let mut visible = selector.select(&mut trees, &camera);
            order_visible(&mut visible, 32);
            black_box(visible)
        })
    });
}

fn bench_intersect_rect(c: &mut Criterion) {
    let camera = camera_at(100.0);
    let rect = GroundRect::new(4100.0, -13700.0, 200.0, 200.0);
    c.bench_function("intersect_rect", |bencher| {
        bencher.iter(|| {
            let mut points = [glam::DVec3::ZERO; orbis_camera::MAX_INTERSECTIONS];
            black_box(camera.frustum().intersect_rect(black_box(&rect), &mut points))
        })
    });
}

criterion_group!(
    benches,
    bench_select_high,
    bench_select_low,
    bench_intersect_rect,
);
criterion_main!(benches);
