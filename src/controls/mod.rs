//! Interactive camera controls.
//!
//! [`FlexibleControls`] owns the damped camera state and the live
//! [`Camera`]. Input handlers only write the `end` side of the damped
//! values; [`update`](FlexibleControls::update) blends the rendered side
//! toward it once per frame and writes the camera transform.
//!
//! The camera position is always `target + translation + camera_vector`:
//!
//! - `target` is the rotation pivot.
//! - `translation` offsets the look-at point from the pivot (always zero
//!   when orbiting in center).
//! - `camera_vector` is the spherical offset from the look-at point to the
//!   camera.

mod gesture;
pub mod rotator;
pub mod translator;

use std::f64::consts::FRAC_PI_2;

use glam::{DQuat, DVec2, DVec3};

use self::gesture::{ButtonAction, Gesture, TouchCache};
pub use self::rotator::Rotator;
pub use self::translator::Translator;
use crate::camera::Camera;
use crate::damped::{damping_factor, DampedSpherical, DampedVector3, TARGET_FPS};
use crate::geometry;
use crate::input::{InputEvent, Keyboard, PointerEvent, PointerKind};
use crate::manager::events::{CameraChangeListener, EventTrigger, SubscriptionId};
use crate::options::{CameraManagerOptions, ControlsType, NavigationAction, WheelZoomType};

/// Distance of the initial target in front of the camera.
const INITIAL_TARGET_DISTANCE: f64 = 10.0;

/// Closest camera/look-at distance accepted by [`FlexibleControls::set_state`].
const MIN_CAMERA_DISTANCE: f64 = 1e-9;

/// Pinch never brings the look-at point closer than this fraction of the
/// sensitivity.
const PINCH_MIN_RADIUS_FRACTION: f64 = 0.2;

/// Damped orbit / pan / fly controls driving one [`Camera`].
pub struct FlexibleControls {
    camera: Camera,
    options: CameraManagerOptions,
    target: DampedVector3,
    translation: DampedVector3,
    camera_vector: DampedSpherical,
    /// Rotation applied verbatim instead of looking at the look-at point.
    raw_rotation: Option<DQuat>,
    /// Pointer rotation (azimuth, polar) not yet applied.
    accumulated_rotation: DVec2,
    /// World point the wheel zooms toward, resolved by picking.
    scroll_cursor: Option<DVec3>,
    picker_available: bool,
    keyboard: Keyboard,
    keyboard_suspended: bool,
    touches: TouchCache,
    gesture: Gesture,
    pan_session: u64,
    /// Projection-only changes (zoom, viewport) still count as a change.
    projection_dirty: bool,
    change: EventTrigger<CameraChangeListener>,
    enabled: bool,
    disposed: bool,
}

impl std::fmt::Debug for FlexibleControls {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlexibleControls")
            .field("controls_type", &self.options.controls_type)
            .field("target", &self.target)
            .field("translation", &self.translation)
            .field("camera_vector", &self.camera_vector)
            .field("gesture", &self.gesture)
            .field("enabled", &self.enabled)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl FlexibleControls {
    /// Controls for `camera`, looking at a point straight ahead of it.
    #[must_use]
    pub fn new(camera: Camera, options: CameraManagerOptions) -> Self {
        let position = camera.position;
        let target = position + camera.forward() * INITIAL_TARGET_DISTANCE;
        let mut controls = Self {
            camera,
            options,
            target: DampedVector3::default(),
            translation: DampedVector3::default(),
            camera_vector: DampedSpherical::default(),
            raw_rotation: None,
            accumulated_rotation: DVec2::ZERO,
            scroll_cursor: None,
            picker_available: false,
            keyboard: Keyboard::new(),
            keyboard_suspended: false,
            touches: TouchCache::default(),
            gesture: Gesture::Idle,
            pan_session: 0,
            projection_dirty: false,
            change: EventTrigger::default(),
            enabled: true,
            disposed: false,
        };
        controls.set_state(position, target);
        controls
    }

    // -- Accessors --

    /// The live camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable access for projection parameters (near/far, fov, aspect).
    /// Position and rotation are overwritten on the next update.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Camera as it will be once damping settles.
    #[must_use]
    pub fn end_camera(&self) -> Camera {
        let mut camera = self.camera.clone();
        camera.position = self.position_end();
        camera.rotation = self.raw_rotation.unwrap_or_else(|| {
            geometry::look_rotation(self.look_at_point_end() - camera.position, camera.up)
                .unwrap_or(self.camera.rotation)
        });
        camera
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &CameraManagerOptions {
        &self.options
    }

    /// Mutable options. Changes apply from the next event or update.
    pub fn options_mut(&mut self) -> &mut CameraManagerOptions {
        &mut self.options
    }

    /// Active navigation mode.
    #[must_use]
    pub fn controls_type(&self) -> ControlsType {
        self.options.controls_type
    }

    /// Rendered camera position.
    #[must_use]
    pub fn position(&self) -> DVec3 {
        self.target.value + self.translation.value + self.camera_vector.vector()
    }

    /// Commanded camera position.
    #[must_use]
    pub fn position_end(&self) -> DVec3 {
        self.target.end + self.translation.end + self.camera_vector.vector_end()
    }

    /// Rendered rotation pivot.
    #[must_use]
    pub fn target(&self) -> DVec3 {
        self.target.value
    }

    /// Commanded rotation pivot.
    #[must_use]
    pub fn target_end(&self) -> DVec3 {
        self.target.end
    }

    /// Rendered point at the screen center.
    #[must_use]
    pub fn look_at_point(&self) -> DVec3 {
        self.target.value + self.translation.value
    }

    /// Commanded point at the screen center.
    #[must_use]
    pub fn look_at_point_end(&self) -> DVec3 {
        self.target.end + self.translation.end
    }

    /// Commanded spherical offset from the look-at point to the camera.
    #[must_use]
    pub fn camera_vector_end(&self) -> crate::geometry::Spherical {
        self.camera_vector.end
    }

    /// Rotation applied verbatim, if one is set.
    #[must_use]
    pub fn raw_rotation(&self) -> Option<DQuat> {
        self.raw_rotation
    }

    /// Whether input is processed.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled && !self.disposed
    }

    /// Whether [`dispose`](Self::dispose) was called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Whether any damped quantity is still moving.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        let epsilon = self.options.damping.epsilon;
        self.target.is_changed(epsilon)
            || self.translation.is_changed(epsilon)
            || self.camera_vector.is_changed(epsilon)
    }

    /// Held-key state.
    #[must_use]
    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    // -- Configuration --

    /// Switch navigation mode.
    ///
    /// Entering orbit-in-center or leaving first person folds the
    /// translation into the target, so the pivot becomes the point at the
    /// screen center.
    pub fn set_controls_type(&mut self, controls_type: ControlsType) {
        let current = self.options.controls_type;
        if current == controls_type {
            return;
        }
        if controls_type == ControlsType::OrbitInCenter || current == ControlsType::FirstPerson {
            self.target.add(&self.translation);
            self.translation.clear();
        }
        log::debug!("controls type {current:?} -> {controls_type:?}");
        self.options.controls_type = controls_type;
    }

    /// Enable or disable input handling. Disabling ends the current
    /// gesture and forgets held keys; the pose is preserved.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.end_gesture();
            self.keyboard.clear();
        }
        self.enabled = enabled;
    }

    /// Ignore held keys, e.g. while an animation runs.
    pub fn set_keyboard_suspended(&mut self, suspended: bool) {
        self.keyboard_suspended = suspended;
    }

    /// Whether held keys are ignored.
    #[must_use]
    pub fn is_keyboard_suspended(&self) -> bool {
        self.keyboard_suspended
    }

    /// Tell the controls whether cursor picks can be expected. Resolves
    /// [`WheelZoomType::Auto`].
    pub fn set_picker_available(&mut self, available: bool) {
        self.picker_available = available;
    }

    /// World point the wheel zooms toward, or `None` to zoom along the
    /// cursor ray.
    pub fn set_scroll_cursor(&mut self, point: Option<DVec3>) {
        self.scroll_cursor = point.filter(|p| p.is_finite());
    }

    /// Current wheel zoom point.
    #[must_use]
    pub fn scroll_cursor(&self) -> Option<DVec3> {
        self.scroll_cursor
    }

    /// Update the viewport size.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.camera.set_viewport(width, height);
        self.projection_dirty = true;
    }

    /// Subscribe to `camera_change(position, look_at_point)`.
    pub fn on_change(&mut self, listener: Box<CameraChangeListener>) -> SubscriptionId {
        self.change.subscribe(listener)
    }

    /// Unsubscribe a change listener.
    pub fn off_change(&mut self, id: SubscriptionId) -> bool {
        self.change.unsubscribe(id)
    }

    /// Drop listeners and input state. Later calls are no-ops.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.end_gesture();
        self.keyboard.clear();
        self.change.clear();
        self.disposed = true;
    }

    // -- State --

    /// Snap to a pose without damping. Any translation or raw rotation is
    /// discarded and a change is reported.
    pub fn set_state(&mut self, position: DVec3, target: DVec3) {
        if self.disposed {
            return;
        }
        if !position.is_finite() || !target.is_finite() {
            log::warn!("ignoring non-finite camera state {position} -> {target}");
            return;
        }
        let min_squared = MIN_CAMERA_DISTANCE * MIN_CAMERA_DISTANCE;
        let too_close = position.distance_squared(target) < min_squared;
        let target = if too_close {
            position + self.camera.forward() * INITIAL_TARGET_DISTANCE
        } else {
            target
        };
        self.translation.clear();
        self.target.copy(target);
        self.camera_vector.copy(position - target);
        self.raw_rotation = None;
        self.accumulated_rotation = DVec2::ZERO;
        let _ = self.update(0.0, true);
    }

    /// Snap to a pose given by an explicit rotation. The target is placed
    /// along the new look direction at the previous target distance and the
    /// rotation is applied verbatim until the next gesture or state set.
    pub fn set_position_and_rotation(&mut self, position: DVec3, rotation: DQuat) {
        if !rotation.is_finite() {
            log::warn!("ignoring non-finite camera rotation");
            return;
        }
        let target = crate::camera::helper::calculate_new_target_from_rotation(
            &self.camera,
            rotation,
            self.look_at_point_end(),
            position,
        );
        self.set_state(position, target);
        if !self.disposed {
            self.raw_rotation = Some(rotation.normalize());
            let _ = self.update(0.0, true);
        }
    }

    /// `end := value` for every damped quantity, stopping pending motion.
    pub fn synchronize_end(&mut self) {
        self.target.synchronize_end();
        self.translation.synchronize_end();
        self.camera_vector.synchronize_end();
    }

    // -- Per frame --

    /// Advance damping by `delta_time_s` and write the camera.
    ///
    /// Returns whether the camera changed, in which case change listeners
    /// were notified. Disabled controls only update when `force` is set.
    pub fn update(&mut self, delta_time_s: f64, force: bool) -> bool {
        if self.disposed || (!self.enabled && !force) {
            return false;
        }
        self.flush_rotation();
        let keyboard_moved = self.handle_keyboard(delta_time_s);

        // Keyboard flight is never damped.
        let position = if self.is_moving() && !keyboard_moved {
            let damping = &self.options.damping;
            let factor = damping_factor(damping.factor, delta_time_s, damping.enabled);
            let mut center = self.target;
            center.add(&self.translation);
            let position = self.camera_vector.damp_as_vector_and_center(&mut center, factor);
            self.target.damp(factor);
            self.translation.damp(factor);
            position
        } else {
            self.target.synchronize();
            self.translation.synchronize();
            self.camera_vector.synchronize();
            self.position()
        };
        self.write_camera(position, force)
    }

    fn write_camera(&mut self, position: DVec3, force: bool) -> bool {
        let look_at = self.look_at_point();
        let rotation = match self.raw_rotation {
            Some(rotation) => rotation,
            None => geometry::look_rotation(look_at - position, self.camera.up)
                .unwrap_or(self.camera.rotation),
        };
        if !position.is_finite() || !rotation.is_finite() {
            log::warn!("skipping non-finite camera pose {position} / {rotation}");
            return false;
        }
        let changed = force
            || std::mem::take(&mut self.projection_dirty)
            || position != self.camera.position
            || rotation != self.camera.rotation;
        self.camera.position = position;
        self.camera.rotation = rotation;
        if changed {
            self.change.fire(position, look_at);
        }
        changed
    }

    fn flush_rotation(&mut self) {
        let delta = std::mem::take(&mut self.accumulated_rotation);
        if delta.length_squared() == 0.0 {
            return;
        }
        let compensation = self.azimuth_compensation();
        self.rotate_by_angles(delta.x * compensation, delta.y);
    }

    /// Azimuth slows down toward the poles so horizontal rotation feels
    /// uniform.
    fn azimuth_compensation(&self) -> f64 {
        let phi = self.camera_vector.end.phi;
        (FRAC_PI_2 - (phi - FRAC_PI_2).abs()).sin()
    }

    /// Rotate the camera vector by azimuth/polar deltas (radians).
    ///
    /// The result is clamped to the legal angles. First person keeps the
    /// camera in place; orbit pivots around the target and re-projects the
    /// translation with the delta rotation so the pivot keeps its screen
    /// position; orbit-in-center simply swings around the target.
    pub fn rotate_by_angles(&mut self, delta_azimuth: f64, delta_polar: f64) {
        if delta_azimuth == 0.0 && delta_polar == 0.0 {
            return;
        }
        if !delta_azimuth.is_finite() || !delta_polar.is_finite() {
            return;
        }
        let rotation = &self.options.rotation;
        let old = self.camera_vector.end;
        let mut new = old;
        new.theta = rotation.legal_azimuth(old.theta + delta_azimuth);
        new.phi = rotation.legal_polar(old.phi + delta_polar);
        new.make_safe();
        self.camera_vector.end = new;

        let old_vector = old.to_vector();
        let new_vector = new.to_vector();
        match self.options.controls_type {
            ControlsType::FirstPerson => {
                self.translation.end += old_vector - new_vector;
            }
            ControlsType::Orbit => {
                let up = self.camera.up;
                if let (Some(from), Some(to)) = (
                    geometry::look_rotation(-old_vector, up),
                    geometry::look_rotation(-new_vector, up),
                ) {
                    let delta = to * from.inverse();
                    self.translation.end =
                        delta * (self.translation.end + old_vector) - new_vector;
                }
            }
            ControlsType::OrbitInCenter => {}
        }
    }

    /// Move the camera (and look-at point) by a world-space offset. Orbit
    /// in center moves the target; the other modes move the translation.
    pub fn translate(&mut self, delta: DVec3) {
        if !delta.is_finite() {
            return;
        }
        if self.options.controls_type == ControlsType::OrbitInCenter {
            self.target.end += delta;
        } else {
            self.translation.end += delta;
        }
    }

    /// World units per pixel on the plane through the look-at point.
    fn pixel_scale(&self, camera: &Camera) -> f64 {
        let height = camera.viewport.y.max(1.0);
        if camera.is_perspective() {
            2.0 * self.camera_vector.end.radius * camera.half_fov_radians().tan() / height
        } else {
            2.0 * camera.ortho_half_extents().y / height
        }
    }

    /// Pan by a pixel delta along the camera's local X/Y axes so the scene
    /// follows the cursor.
    pub fn pan(&mut self, delta_px: DVec2, speed: f64) {
        let camera = self.end_camera();
        let scale = self.pixel_scale(&camera) * speed;
        let delta = (camera.local_up() * delta_px.y - camera.right() * delta_px.x) * scale;
        self.translate(delta);
    }

    /// Move along the view direction; positive is forward.
    ///
    /// Orbiting in center shrinks the radius instead, stopping at the
    /// minimum zoom distance or pushing the target ahead when the target is
    /// dynamic.
    pub fn dolly(&mut self, amount: f64) {
        if !amount.is_finite() || amount == 0.0 {
            return;
        }
        if self.options.controls_type == ControlsType::OrbitInCenter {
            let radius = self.camera_vector.end.radius;
            self.set_radius_in_center(radius - amount);
        } else {
            let forward = self.end_camera().forward();
            self.translate(forward * amount);
        }
    }

    fn set_radius_in_center(&mut self, radius: f64) {
        let zoom = &self.options.zoom;
        let min = zoom.min_zoom_distance;
        let current = self.camera_vector.end.radius;
        if radius >= min || radius >= current {
            self.camera_vector.end.radius = radius;
            return;
        }
        // Never back away while zooming in: a camera already inside the
        // minimum keeps its radius.
        let floor = current.min(min);
        if zoom.dynamic_target {
            let forward = -self.camera_vector.vector_end().normalize_or_zero();
            self.target.end += forward * (floor - radius);
        }
        self.camera_vector.end.radius = floor;
    }

    /// Point behind `pixel` whose depth along the view direction is
    /// `distance`, seen from the commanded camera.
    #[must_use]
    pub fn point_behind_pixel(&self, pixel: DVec2, distance: f64) -> Option<DVec3> {
        let camera = self.end_camera();
        let ray = camera.ray_through_pixel(pixel)?;
        let depth = ray.direction.dot(camera.forward());
        if depth <= 1e-9 || !distance.is_finite() {
            return None;
        }
        Some(ray.at(distance / depth))
    }

    // -- Input --

    /// Feed an input event. Returns whether the event was consumed.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        if !self.is_enabled() {
            return false;
        }
        match event {
            InputEvent::PointerDown(pointer) => {
                self.pointer_down(pointer);
                true
            }
            InputEvent::PointerMove(pointer) => self.pointer_move(pointer),
            InputEvent::PointerUp(pointer) => self.pointer_up(pointer),
            InputEvent::Wheel { position, delta } => {
                self.wheel(*position, *delta);
                true
            }
            InputEvent::ContextMenu => true,
            InputEvent::KeyDown { code } => self.key_down(code),
            InputEvent::KeyUp { code } => {
                self.keyboard.key_up(code);
                self.options.keybindings.lookup(code).is_some()
            }
            InputEvent::FocusGained => {
                self.keyboard.set_disabled(false);
                false
            }
            InputEvent::FocusLost => {
                self.keyboard.set_disabled(true);
                self.end_gesture();
                false
            }
        }
    }

    fn key_down(&mut self, code: &str) -> bool {
        if !self.options.movement.enable_keyboard_navigation {
            return false;
        }
        let _ = self.keyboard.key_down(code);
        matches!(
            self.options.keybindings.lookup(code),
            Some(action) if !is_mode_action(action)
        )
    }

    fn pointer_down(&mut self, pointer: &PointerEvent) {
        self.raw_rotation = None;
        self.flush_rotation();
        self.synchronize_end();
        if pointer.kind == PointerKind::Touch {
            let _ = self.touches.insert(pointer.id, pointer.position);
            self.restart_touch_gesture();
            return;
        }
        let last = pointer.position;
        self.gesture = match ButtonAction::for_button(pointer.button, pointer.modifiers) {
            ButtonAction::Rotate
                if self.options.controls_type == ControlsType::FirstPerson
                    && self.camera.is_perspective() =>
            {
                Gesture::Looking(Rotator::new(last))
            }
            ButtonAction::Rotate => Gesture::Rotating { last },
            ButtonAction::Pan => {
                self.pan_session += 1;
                Gesture::Panning {
                    last,
                    translator: self.default_translator(last),
                    session: self.pan_session,
                }
            }
            ButtonAction::Dolly => Gesture::Dollying { last },
        };
    }

    /// Translator anchored on the plane through the look-at point.
    fn default_translator(&self, pixel: DVec2) -> Option<Translator> {
        let camera = self.end_camera();
        let depth = (self.look_at_point_end() - camera.position).dot(camera.forward());
        let anchor = self.point_behind_pixel(pixel, depth)?;
        Translator::new(anchor, camera.forward())
    }

    /// Fingers currently on the surface.
    #[must_use]
    pub fn touch_count(&self) -> usize {
        self.touches.len()
    }

    /// Identifier of the pan in progress, if any.
    #[must_use]
    pub fn pan_session(&self) -> Option<u64> {
        match self.gesture {
            Gesture::Panning { session, .. } => Some(session),
            _ => None,
        }
    }

    /// Glue a picked point to the cursor for the rest of pan `session`.
    /// Picks that arrive after the pan ended are dropped.
    pub fn set_translation_anchor(&mut self, session: u64, anchor: DVec3) -> bool {
        let forward = self.end_camera().forward();
        match &mut self.gesture {
            Gesture::Panning {
                translator,
                session: current,
                ..
            } if *current == session => match Translator::new(anchor, forward) {
                Some(t) => {
                    *translator = Some(t);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    fn pointer_move(&mut self, pointer: &PointerEvent) -> bool {
        if pointer.kind == PointerKind::Touch {
            if !self.touches.update(pointer.id, pointer.position) {
                return false;
            }
            self.touch_move();
            return true;
        }
        let position = pointer.position;
        match self.gesture {
            Gesture::Rotating { last } => {
                let delta = position - last;
                let rotation = &self.options.rotation;
                self.accumulated_rotation += DVec2::new(
                    delta.x * rotation.pointer_speed_azimuth,
                    delta.y * rotation.pointer_speed_polar,
                );
                self.gesture = Gesture::Rotating { last: position };
            }
            Gesture::Looking(mut rotator) => {
                if let Some(delta) = rotator.rotate_to(&self.end_camera(), position) {
                    self.rotate_by_angles(delta.x, delta.y);
                }
                self.gesture = Gesture::Looking(rotator);
            }
            Gesture::Panning {
                last,
                translator,
                session,
            } => {
                let glued = translator
                    .and_then(|t| t.translation_for(&self.end_camera(), position));
                match glued {
                    Some(delta) => self.translate(delta),
                    None => self.pan(position - last, self.options.movement.mouse_pan_speed),
                }
                self.gesture = Gesture::Panning {
                    last: position,
                    translator,
                    session,
                };
            }
            Gesture::Dollying { last } => {
                let scale =
                    self.pixel_scale(&self.end_camera()) * self.options.movement.mouse_dolly_speed;
                self.dolly((last.y - position.y) * scale);
                self.gesture = Gesture::Dollying { last: position };
            }
            Gesture::Idle | Gesture::TouchRotating { .. } | Gesture::Pinching { .. } => {
                return false;
            }
        }
        true
    }

    fn pointer_up(&mut self, pointer: &PointerEvent) -> bool {
        if pointer.kind == PointerKind::Touch {
            let was_down = self.touches.remove(pointer.id);
            self.flush_rotation();
            self.restart_touch_gesture();
            return was_down;
        }
        let active = !matches!(self.gesture, Gesture::Idle);
        self.flush_rotation();
        self.gesture = Gesture::Idle;
        active
    }

    fn end_gesture(&mut self) {
        self.flush_rotation();
        self.gesture = Gesture::Idle;
        self.touches.clear();
    }

    /// Pick the touch gesture for the current touch count. A count change
    /// always starts over.
    fn restart_touch_gesture(&mut self) {
        self.gesture = match self.touches.len() {
            1 => match self.touches.first() {
                Some((id, last)) => Gesture::TouchRotating { id, last },
                None => Gesture::Idle,
            },
            2 => match self.touches.pinch() {
                Some((distance, midpoint)) => Gesture::Pinching {
                    initial_distance: distance,
                    initial_radius: self.camera_vector.end.radius,
                    last_midpoint: midpoint,
                },
                None => Gesture::Idle,
            },
            _ => Gesture::Idle,
        };
    }

    fn touch_move(&mut self) {
        match self.gesture {
            Gesture::TouchRotating { id, last } => {
                let Some((first_id, position)) = self.touches.first() else {
                    return;
                };
                if first_id != id {
                    return;
                }
                let delta = position - last;
                let rotation = &self.options.rotation;
                self.accumulated_rotation += DVec2::new(
                    delta.x * rotation.touch_speed_azimuth,
                    delta.y * rotation.touch_speed_polar,
                );
                self.gesture = Gesture::TouchRotating { id, last: position };
            }
            Gesture::Pinching {
                initial_distance,
                initial_radius,
                last_midpoint,
            } => {
                let Some((distance, midpoint)) = self.touches.pinch() else {
                    return;
                };
                if initial_distance > 0.0 && distance > 0.0 {
                    let min_radius =
                        self.options.interaction.sensitivity * PINCH_MIN_RADIUS_FRACTION;
                    let radius = (initial_radius * initial_distance / distance).max(min_radius);
                    self.camera_vector.end.radius = radius;
                }
                let movement = &self.options.movement;
                let drift = midpoint - last_midpoint;
                let last_midpoint = if drift.length() > movement.pinch_epsilon {
                    let speed = movement.pinch_pan_speed;
                    self.pan(drift, speed);
                    midpoint
                } else {
                    last_midpoint
                };
                self.gesture = Gesture::Pinching {
                    initial_distance,
                    initial_radius,
                    last_midpoint,
                };
            }
            _ => {}
        }
    }

    fn wheel(&mut self, pixel: DVec2, delta: f64) {
        if delta == 0.0 || !delta.is_finite() {
            return;
        }
        self.raw_rotation = None;
        if !self.camera.is_perspective() {
            let zoom = &self.options.zoom;
            let factor = 1.0 - delta.signum() * zoom.orthographic_dolly_factor;
            self.camera.zoom = (self.camera.zoom * factor)
                .clamp(zoom.min_orthographic_zoom, zoom.max_orthographic_zoom);
            self.projection_dirty = true;
            return;
        }
        let zoom_type = self.options.zoom.effective_wheel_zoom(self.picker_available);
        if self.options.controls_type == ControlsType::OrbitInCenter {
            self.wheel_in_center(pixel, delta, zoom_type);
        } else {
            self.wheel_translate(pixel, delta, zoom_type);
        }
    }

    /// Orbit-in-center wheel: shrink or grow the radius. Zooming in toward
    /// the cursor scales the whole rig about the cursor point, so that
    /// point stays under the cursor while the target slides toward it.
    fn wheel_in_center(&mut self, pixel: DVec2, delta: f64, zoom_type: WheelZoomType) {
        let radius = self.camera_vector.end.radius;
        let step = self.options.zoom.dolly_factor.powf(delta.abs());
        if delta > 0.0 {
            self.set_radius_in_center(radius / step);
            return;
        }
        let new_radius = radius * step;
        if zoom_type == WheelZoomType::Center || new_radius < self.options.zoom.min_zoom_distance {
            self.set_radius_in_center(new_radius);
            return;
        }
        let Some(scroll) = self.scroll_cursor.or_else(|| self.point_behind_pixel(pixel, radius))
        else {
            self.set_radius_in_center(new_radius);
            return;
        };
        let to_scroll = scroll.distance(self.position_end());
        if to_scroll <= f64::EPSILON {
            self.set_radius_in_center(new_radius);
            return;
        }
        let mut ratio = step;
        if zoom_type == WheelZoomType::ToCursor {
            let sensitivity = self.options.interaction.sensitivity;
            ratio = ratio.max(sensitivity / to_scroll).min(1.0);
        }
        let target = self.target.end;
        self.target.end = scroll + (target - scroll) * ratio;
        self.camera_vector.end.radius = radius * ratio;
    }

    /// Orbit / first-person wheel: fly along the cursor direction.
    fn wheel_translate(&mut self, pixel: DVec2, delta: f64, zoom_type: WheelZoomType) {
        let camera = self.end_camera();
        let lines = delta.abs();
        let sensitivity = self.options.interaction.sensitivity;
        let zoom = &self.options.zoom;
        let step = sensitivity * zoom.wheel_dolly_speed * lines;

        let (direction, distance) = match (zoom_type, self.scroll_cursor) {
            (WheelZoomType::Center, _) => (camera.forward(), None),
            (_, Some(scroll)) => {
                let to_scroll = scroll - camera.position;
                match to_scroll.try_normalize() {
                    Some(direction) => (direction, Some(to_scroll.length())),
                    None => (camera.forward(), None),
                }
            }
            (_, None) => (
                camera
                    .ray_through_pixel(pixel)
                    .map_or(camera.forward(), |ray| ray.direction),
                None,
            ),
        };

        let fraction = 1.0 - (1.0 - zoom.zoom_fraction.clamp(0.0, 1.0)).powf(lines);
        let amount = if delta < 0.0 {
            match (zoom_type, distance) {
                (WheelZoomType::ToCursor, Some(d)) => (d * fraction).min(d - sensitivity).max(0.0),
                (WheelZoomType::PastCursor, Some(d)) => (d * fraction).max(step),
                _ => step,
            }
        } else {
            -distance.map_or(step, |d| (d * fraction).max(step))
        };
        self.translate(direction * amount);
    }

    /// Apply held navigation keys. Returns whether the camera was moved.
    fn handle_keyboard(&mut self, delta_time_s: f64) -> bool {
        if self.keyboard_suspended
            || !self.options.movement.enable_keyboard_navigation
            || !self.keyboard.any_pressed()
        {
            return false;
        }
        let frames = delta_time_s * TARGET_FPS;
        if !frames.is_finite() || frames <= 0.0 {
            return false;
        }

        let keys = &self.options.keybindings;
        let axis = |negative, positive| {
            self.keyboard.movement_value(keys.key(negative), keys.key(positive))
        };
        let azimuth = axis(NavigationAction::RotateRight, NavigationAction::RotateLeft);
        let polar = axis(NavigationAction::RotateDown, NavigationAction::RotateUp);
        let right = axis(NavigationAction::MoveLeft, NavigationAction::MoveRight);
        let up = axis(NavigationAction::MoveDown, NavigationAction::MoveUp);
        let forward = axis(NavigationAction::MoveBackward, NavigationAction::MoveForward);
        if azimuth == 0.0 && polar == 0.0 && right == 0.0 && up == 0.0 && forward == 0.0 {
            return false;
        }

        // Flying overrides orbiting.
        self.set_controls_type(ControlsType::FirstPerson);
        self.raw_rotation = None;

        let rotation = &self.options.rotation;
        let delta_azimuth =
            azimuth * rotation.keyboard_speed_azimuth * frames * self.azimuth_compensation();
        let delta_polar = polar * rotation.keyboard_speed_polar * frames;
        self.rotate_by_angles(delta_azimuth, delta_polar);

        let movement = &self.options.movement;
        let fast = if self.keyboard.is_shift_pressed() {
            movement.keyboard_fast_move_factor
        } else {
            1.0
        };
        let unit = self.options.interaction.sensitivity * frames * fast;
        let pan = unit * movement.keyboard_pan_speed;
        let dolly = unit * movement.keyboard_dolly_speed;
        let camera = self.end_camera();
        self.translate(
            camera.right() * (right * pan)
                + camera.local_up() * (up * pan)
                + camera.forward() * (forward * dolly),
        );
        true
    }
}

/// Whether an action switches the controls type rather than moving.
fn is_mode_action(action: NavigationAction) -> bool {
    matches!(
        action,
        NavigationAction::FirstPersonMode
            | NavigationAction::OrbitMode
            | NavigationAction::OrbitInCenterMode
    )
}
