use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use flexcam::camera::Camera;
use flexcam::controls::FlexibleControls;
use flexcam::damped::{DampedSpherical, DampedVector3};
use flexcam::geometry::Spherical;
use flexcam::input::{InputEvent, MouseButton, PointerEvent};
use flexcam::options::{CameraManagerOptions, ControlsType};
use flexcam::util::easing::EasingFunction;
use glam::{DVec2, DVec3};

const DT: f64 = 1.0 / 60.0;

fn controls(controls_type: ControlsType) -> FlexibleControls {
    let mut camera = Camera::default();
    camera.set_viewport(1280.0, 720.0);
    let options = CameraManagerOptions {
        controls_type,
        ..CameraManagerOptions::default()
    };
    let mut controls = FlexibleControls::new(camera, options);
    controls.set_state(DVec3::new(0.0, 2.0, 10.0), DVec3::ZERO);
    controls
}

fn easing_benchmark(c: &mut Criterion) {
    let f = EasingFunction::CubicHermite { c1: 0.33, c2: 1.0 };
    c.bench_function("cubic_hermite_easing", |b| {
        b.iter(|| black_box(f.evaluate(black_box(0.5))))
    });
}

fn spherical_damping_benchmark(c: &mut Criterion) {
    let mut damped = DampedSpherical::default();
    damped.copy(DVec3::new(0.0, 0.0, 10.0));
    damped.end = Spherical::from_vector(DVec3::new(7.0, 3.0, -4.0));
    c.bench_function("spherical_damp_as_vector", |b| {
        b.iter(|| {
            let mut d = damped;
            let mut center = DampedVector3::new(DVec3::ZERO);
            black_box(d.damp_as_vector_and_center(&mut center, black_box(0.3)))
        })
    });
}

fn drag_update_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag_update");

    for controls_type in [
        ControlsType::FirstPerson,
        ControlsType::Orbit,
        ControlsType::OrbitInCenter,
    ] {
        group.bench_function(format!("{controls_type:?}"), |b| {
            let mut controls = controls(controls_type);
            let start = DVec2::new(640.0, 360.0);
            let _ = controls.handle_event(&InputEvent::PointerDown(PointerEvent::mouse(
                MouseButton::Left,
                start,
            )));
            let mut x = 0.0;
            b.iter(|| {
                x += 1.0;
                let position = start + DVec2::new(x % 200.0, 0.0);
                let _ = controls.handle_event(&InputEvent::PointerMove(PointerEvent::mouse(
                    MouseButton::Left,
                    position,
                )));
                black_box(controls.update(DT, false))
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    easing_benchmark,
    spherical_damping_benchmark,
    drag_update_benchmark
);
criterion_main!(benches);
