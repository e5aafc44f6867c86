use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use flexcam::camera::Camera;
use flexcam::geometry::{Aabb, Ray};
use flexcam::input::{InputEvent, MouseButton, PointerEvent};
use flexcam::manager::{CameraManager, FlexibleCameraManager, DEFAULT_FIT_RADIUS_FACTOR};
use flexcam::options::CameraManagerOptions;
use flexcam::picking::{PickQuery, PickResult};
use flexcam::util::clock::{FrameTimer, ManualClock};
use glam::{DVec2, DVec3};
use web_time::Duration;

const FRAME: Duration = Duration::from_millis(16);
const SPHERE_RADIUS: f64 = 1.0;

/// Nearest hit of `ray` with the unit sphere at the origin.
fn intersect_sphere(ray: &Ray) -> Option<DVec3> {
    let b = ray.origin.dot(ray.direction);
    let c = ray.origin.length_squared() - SPHERE_RADIUS * SPHERE_RADIUS;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let t = -b - discriminant.sqrt();
    (t > 0.0).then(|| ray.at(t))
}

fn load_options(path: Option<&str>) -> CameraManagerOptions {
    let Some(path) = path else {
        return CameraManagerOptions::default();
    };
    match CameraManagerOptions::load(Path::new(path)) {
        Ok(options) => {
            log::info!("loaded options from {path}");
            options
        }
        Err(e) => {
            log::error!("{e}, using defaults");
            CameraManagerOptions::default()
        }
    }
}

fn scripted_input() -> Vec<(usize, InputEvent)> {
    let center = DVec2::new(640.0, 360.0);
    let left = |position| PointerEvent::mouse(MouseButton::Left, position);
    let right = |position| PointerEvent::mouse(MouseButton::Right, position);
    let mut script = vec![
        (10, InputEvent::PointerDown(left(center))),
        (30, InputEvent::PointerUp(left(center))),
        (32, InputEvent::PointerDown(left(center))),
        (34, InputEvent::PointerUp(left(center))),
        (90, InputEvent::PointerDown(left(center))),
    ];
    for step in 1..=20_i32 {
        let offset = DVec2::new(f64::from(step) * 8.0, f64::from(step) * 2.0);
        script.push((90 + step as usize, InputEvent::PointerMove(left(center + offset))));
    }
    script.push((111, InputEvent::PointerUp(left(center + DVec2::new(160.0, 40.0)))));
    script.push((130, InputEvent::PointerDown(right(center))));
    script.push((131, InputEvent::PointerMove(right(center + DVec2::new(-80.0, 0.0)))));
    script.push((132, InputEvent::PointerUp(right(center + DVec2::new(-80.0, 0.0)))));
    for frame in 150..160 {
        script.push((
            frame,
            InputEvent::Wheel {
                position: center,
                delta: -1.0,
            },
        ));
    }
    script.push((
        180,
        InputEvent::KeyDown {
            code: "KeyW".to_owned(),
        },
    ));
    script.push((
        200,
        InputEvent::KeyUp {
            code: "KeyW".to_owned(),
        },
    ));
    script
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let options = load_options(args.get(1).map(String::as_str));

    let mut camera = Camera::default();
    camera.set_viewport(1280.0, 720.0);
    let snapshot = Rc::new(RefCell::new(camera.clone()));
    let picker_view = Rc::clone(&snapshot);
    let scene = Aabb::new(DVec3::splat(-SPHERE_RADIUS), DVec3::splat(SPHERE_RADIUS));

    let clock = ManualClock::new();
    let mut manager = FlexibleCameraManager::new(camera, options)
        .with_clock(Rc::new(clock.clone()))
        .with_picker(move |query: PickQuery| {
            let camera = picker_view.borrow();
            let hit = camera
                .ray_through_pixel(query.pixel)
                .and_then(|ray| intersect_sphere(&ray));
            let mut result = match hit {
                Some(point) => PickResult::hit(point, camera.position, scene),
                None => PickResult::miss(scene),
            };
            if query.want_bounding_box && hit.is_some() {
                result.picked_bounding_box = Some(scene);
            }
            result
        });

    let _ = manager.on_camera_stop(Box::new(|| log::info!("camera stopped")));
    manager.fit_camera_to_bounding_box(&scene, None, DEFAULT_FIT_RADIUS_FACTOR);

    let script = scripted_input();
    let mut timer = FrameTimer::new(&clock);
    for frame in 0..260 {
        for (_, event) in script.iter().filter(|(at, _)| *at == frame) {
            let _ = manager.handle_event(event);
        }
        clock.advance(FRAME);
        let dt = timer.tick(&clock);
        manager.update(dt, &scene);
        snapshot.borrow_mut().clone_from(manager.camera());

        if frame % 20 == 0 {
            let state = manager.camera_state();
            log::info!(
                "frame {frame:3} {:?} position {} target {} near {:.3} far {:.3}",
                manager.controls_type(),
                state.position,
                state.target,
                manager.camera().near,
                manager.camera().far,
            );
        }
    }

    match toml::to_string_pretty(manager.options()) {
        Ok(text) => log::debug!("final options:\n{text}"),
        Err(e) => log::error!("failed to serialize options: {e}"),
    }
}
