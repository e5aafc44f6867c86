//! Camera manager façade.
//!
//! A [`CameraManager`] is what a host viewer talks to: it owns the camera,
//! routes input to the controls, resolves click actions through the
//! scene [`Picker`], runs camera tweens and emits change and stop events.
//! [`FlexibleCameraManager`] is the implementation backed by
//! [`FlexibleControls`].

pub mod events;

use std::rc::Rc;

use glam::{DQuat, DVec2, DVec3};
use web_time::{Duration, Instant};

use self::events::{
    CameraChangeListener, CameraStopListener, DebouncedStopTrigger, EventTrigger,
    SubscriptionId,
};
use crate::animation::PoseTween;
use crate::camera::{helper, Camera};
use crate::controls::FlexibleControls;
use crate::error::CameraError;
use crate::geometry::Aabb;
use crate::input::{ClickDetector, ClickResult, InputEvent, MouseButton, PointerEvent, PointerKind};
use crate::options::{
    CameraManagerOptions, ControlsType, MouseActionType, NavigationAction, WheelZoomType,
};
use crate::picking::{PendingPick, PickPoll, PickQuery, PickResult, Picker};
use crate::util::clock::{Clock, SystemClock};

/// Radius multiplier used when fitting the view to a box.
pub const DEFAULT_FIT_RADIUS_FACTOR: f64 = 2.0;

/// Radius multiplier used when a double click flies to a picked object.
const PICKED_OBJECT_FIT_FACTOR: f64 = 3.0;

/// Full camera pose as reported by [`CameraManager::camera_state`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Eye position.
    pub position: DVec3,
    /// World-from-camera rotation.
    pub rotation: DQuat,
    /// Point the camera looks at.
    pub target: DVec3,
}

/// Partial pose for [`CameraManager::set_camera_state`]. Missing fields
/// keep their current value; `rotation` and `target` are mutually
/// exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraStateUpdate {
    /// New eye position.
    pub position: Option<DVec3>,
    /// New rotation; the target is derived from it.
    pub rotation: Option<DQuat>,
    /// New look-at point; the rotation is derived from it.
    pub target: Option<DVec3>,
}

impl CameraStateUpdate {
    /// Position and look-at point.
    #[must_use]
    pub fn position_and_target(position: DVec3, target: DVec3) -> Self {
        Self {
            position: Some(position),
            target: Some(target),
            rotation: None,
        }
    }

    /// Position and explicit rotation.
    #[must_use]
    pub fn position_and_rotation(position: DVec3, rotation: DQuat) -> Self {
        Self {
            position: Some(position),
            rotation: Some(rotation),
            target: None,
        }
    }
}

/// Host-facing camera manager interface.
pub trait CameraManager {
    /// The rendered camera.
    fn camera(&self) -> &Camera;

    /// Current pose.
    fn camera_state(&self) -> CameraState;

    /// Apply a (partial) pose immediately.
    ///
    /// # Errors
    ///
    /// [`CameraError::RotationAndTarget`] when both `rotation` and `target`
    /// are set.
    fn set_camera_state(&mut self, state: CameraStateUpdate) -> Result<(), CameraError>;

    /// Start reacting to input, taking over the pose of `previous` if
    /// given.
    fn activate(&mut self, previous: Option<&dyn CameraManager>);

    /// Stop reacting to input.
    fn deactivate(&mut self);

    /// Listen for pose changes.
    fn on_camera_change(&mut self, listener: Box<CameraChangeListener>) -> SubscriptionId;

    /// Listen for the camera coming to rest.
    fn on_camera_stop(&mut self, listener: Box<CameraStopListener>) -> SubscriptionId;

    /// Remove a change or stop listener.
    fn off(&mut self, id: SubscriptionId) -> bool;

    /// Frame `bbox`: animated over `duration` when given, immediate
    /// otherwise.
    fn fit_camera_to_bounding_box(
        &mut self,
        bbox: &Aabb,
        duration: Option<Duration>,
        radius_factor: f64,
    );

    /// Per-frame tick with the current scene bounds.
    fn update(&mut self, delta_time_s: f64, bbox: &Aabb);

    /// Feed an input event. Returns whether it was consumed.
    fn handle_event(&mut self, event: &InputEvent) -> bool;

    /// Release listeners and pending work. Later calls are no-ops.
    fn dispose(&mut self);
}

/// What an outstanding raycast will be used for.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PickPurpose {
    Click {
        pixel: DVec2,
        action: MouseActionType,
    },
    ScrollCursor {
        pixel: DVec2,
    },
    TranslationAnchor {
        session: u64,
    },
}

/// [`CameraManager`] driving a [`FlexibleControls`].
pub struct FlexibleCameraManager {
    controls: FlexibleControls,
    clock: Rc<dyn Clock>,
    picker: Option<Box<dyn Picker>>,
    pending_picks: Vec<(PickPurpose, PendingPick)>,
    tween: Option<PoseTween>,
    stop: EventTrigger<CameraStopListener>,
    stop_debounce: DebouncedStopTrigger,
    bounding_box: Aabb,
    near_far_dirty: bool,
    clicks: ClickDetector,
    last_wheel_pick: Option<(Instant, DVec2)>,
    enabled: bool,
    disposed: bool,
}

impl std::fmt::Debug for FlexibleCameraManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlexibleCameraManager")
            .field("controls", &self.controls)
            .field("has_picker", &self.picker.is_some())
            .field("pending_picks", &self.pending_picks.len())
            .field("tween", &self.tween)
            .field("bounding_box", &self.bounding_box)
            .field("enabled", &self.enabled)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl FlexibleCameraManager {
    /// Manager for `camera` using the system clock and no picker.
    #[must_use]
    pub fn new(camera: Camera, options: CameraManagerOptions) -> Self {
        Self {
            controls: FlexibleControls::new(camera, options),
            clock: Rc::new(SystemClock),
            picker: None,
            pending_picks: Vec::new(),
            tween: None,
            stop: EventTrigger::default(),
            stop_debounce: DebouncedStopTrigger::default(),
            bounding_box: Aabb::EMPTY,
            near_far_dirty: true,
            clicks: ClickDetector::new(),
            last_wheel_pick: None,
            enabled: true,
            disposed: false,
        }
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Attach a scene picker.
    #[must_use]
    pub fn with_picker(mut self, picker: impl Picker + 'static) -> Self {
        self.set_picker(Some(Box::new(picker)));
        self
    }

    /// Attach or detach the scene picker. Outstanding picks are dropped.
    pub fn set_picker(&mut self, picker: Option<Box<dyn Picker>>) {
        self.controls.set_picker_available(picker.is_some());
        self.picker = picker;
        self.pending_picks.clear();
        self.last_wheel_pick = None;
    }

    // -- Accessors --

    /// The underlying controls.
    #[must_use]
    pub fn controls(&self) -> &FlexibleControls {
        &self.controls
    }

    /// Mutable access to the underlying controls.
    pub fn controls_mut(&mut self) -> &mut FlexibleControls {
        &mut self.controls
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &CameraManagerOptions {
        self.controls.options()
    }

    /// Mutable options. Changes take effect on the next event or update.
    pub fn options_mut(&mut self) -> &mut CameraManagerOptions {
        self.controls.options_mut()
    }

    /// Active controls mode.
    #[must_use]
    pub fn controls_type(&self) -> ControlsType {
        self.controls.controls_type()
    }

    /// Switch controls mode.
    pub fn set_controls_type(&mut self, controls_type: ControlsType) {
        if controls_type != self.controls.controls_type() {
            log::debug!("controls type -> {controls_type:?}");
        }
        self.controls.set_controls_type(controls_type);
    }

    /// Whether the manager reacts to input.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled && !self.disposed
    }

    /// Whether [`dispose`](CameraManager::dispose) was called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Whether a camera tween is running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Number of raycasts still waiting for an answer.
    #[must_use]
    pub fn pending_pick_count(&self) -> usize {
        self.pending_picks.len()
    }

    /// Viewport resized.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.controls.resize(width, height);
        self.near_far_dirty = true;
    }

    // -- Animation --

    /// Move to `position` looking at `target`. With a non-zero `duration`
    /// the move is tweened, otherwise it is immediate.
    pub fn move_camera_to(&mut self, position: DVec3, target: DVec3, duration: Option<Duration>) {
        if self.disposed {
            return;
        }
        match duration {
            Some(duration) if !duration.is_zero() => {
                let camera = self.controls.camera();
                let from = (camera.position, helper::animation_start_target(camera, target));
                self.start_tween(PoseTween::new(
                    self.clock.now(),
                    duration,
                    from,
                    (position, target),
                ));
            }
            _ => {
                self.cancel_animation();
                self.set_position_and_target(position, target);
            }
        }
    }

    /// Turn toward `target` without moving the eye.
    pub fn move_camera_target_to(&mut self, target: DVec3, duration: Option<Duration>) {
        if self.disposed {
            return;
        }
        let camera = self.controls.camera();
        let position = camera.position;
        match duration {
            Some(duration) if !duration.is_zero() => {
                let from_target = helper::animation_start_target(camera, target);
                self.start_tween(PoseTween::target_only(
                    self.clock.now(),
                    duration,
                    position,
                    from_target,
                    target,
                ));
            }
            _ => {
                self.cancel_animation();
                self.set_position_and_target(position, target);
            }
        }
    }

    /// Stop the running tween where it is.
    pub fn cancel_animation(&mut self) {
        if self.tween.take().is_some() {
            log::debug!("camera animation cancelled");
            self.controls.set_keyboard_suspended(false);
        }
    }

    fn start_tween(&mut self, tween: PoseTween) {
        log::debug!(
            "camera animation over {:?} to {}",
            tween.duration,
            tween.end_pose().0
        );
        self.controls.synchronize_end();
        self.controls.set_keyboard_suspended(true);
        self.tween = Some(tween);
    }

    fn advance_animation(&mut self, now: Instant) {
        let Some(tween) = &self.tween else {
            return;
        };
        let frame = tween.sample(now);
        if frame.finished {
            self.tween = None;
            self.controls.set_keyboard_suspended(false);
        }
        self.set_position_and_target(frame.position, frame.target);
    }

    /// Tween length for a click-triggered move over `distance`.
    fn click_animation_duration(&self, distance: f64) -> Duration {
        let configured = self.options().interaction.animation_duration();
        if configured.is_zero() {
            helper::default_animation_duration(distance)
        } else {
            configured
        }
    }

    // -- State --

    fn set_position_and_target(&mut self, position: DVec3, target: DVec3) {
        self.controls.set_state(position, target);
        self.mark_changed(self.clock.now());
    }

    fn mark_changed(&mut self, now: Instant) {
        self.near_far_dirty = true;
        self.stop_debounce.notify(now);
    }

    fn update_near_far_and_sensitivity(&mut self) {
        let interaction = &self.controls.options().interaction;
        let automatic_near_far = interaction.automatic_near_far_plane;
        let automatic_sensitivity = interaction.automatic_sensitivity;

        if automatic_near_far {
            let bbox = self.bounding_box;
            let _ = helper::update_camera_near_and_far(self.controls.camera_mut(), &bbox);
        }
        if automatic_sensitivity {
            let near = self.controls.camera().near;
            let interaction = &mut self.controls.options_mut().interaction;
            let wanted = (self.bounding_box.diagonal() * interaction.sensitivity_diagonal_fraction)
                .max(0.1 * near);
            interaction.sensitivity = interaction.legal_sensitivity(wanted);
        }
    }

    // -- Picking --

    /// Ask the picker about `query`. Answers that are already available
    /// are applied immediately.
    fn request_pick(&mut self, query: PickQuery, purpose: PickPurpose) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        let pending = picker.raycast(query);
        match pending.poll() {
            PickPoll::Ready(result) => self.apply_pick(purpose, &result),
            PickPoll::Pending => self.pending_picks.push((purpose, pending)),
            PickPoll::Abandoned => log::debug!("raycast for {purpose:?} abandoned"),
        }
    }

    fn resolve_picks(&mut self) {
        if self.pending_picks.is_empty() {
            return;
        }
        let mut still_pending = Vec::new();
        for (purpose, pending) in std::mem::take(&mut self.pending_picks) {
            match pending.poll() {
                PickPoll::Ready(result) => self.apply_pick(purpose, &result),
                PickPoll::Pending => still_pending.push((purpose, pending)),
                PickPoll::Abandoned => log::debug!("raycast for {purpose:?} abandoned"),
            }
        }
        self.pending_picks = still_pending;
    }

    fn apply_pick(&mut self, purpose: PickPurpose, result: &PickResult) {
        if self.disposed {
            return;
        }
        match purpose {
            PickPurpose::Click { pixel, action } => self.apply_mouse_action(pixel, action, result),
            PickPurpose::ScrollCursor { pixel } => {
                let point = self.hit_or_fallback(pixel, result);
                self.controls.set_scroll_cursor(point);
            }
            PickPurpose::TranslationAnchor { session } => {
                if let Some(point) = result.intersection_point {
                    let _ = self.controls.set_translation_anchor(session, point);
                }
            }
        }
    }

    fn hit_or_fallback(&self, pixel: DVec2, result: &PickResult) -> Option<DVec3> {
        result
            .intersection_point
            .or_else(|| self.target_by_bounding_box(pixel, &result.models_bounding_box))
    }

    /// Point behind `pixel` at a plausible depth when the raycast missed:
    /// the last scroll-cursor distance, or half the distance to the scene.
    fn target_by_bounding_box(&self, pixel: DVec2, bbox: &Aabb) -> Option<DVec3> {
        let camera_position = self.controls.camera().position;
        let sensitivity = self.options().interaction.sensitivity;
        let last_scroll_distance = self
            .controls
            .scroll_cursor()
            .map_or(0.0, |point| point.distance(camera_position));

        let mut distance = if last_scroll_distance <= sensitivity {
            camera_position.distance(bbox.center()).min(bbox.diagonal()) / 2.0
        } else {
            last_scroll_distance
        };
        if !distance.is_finite() || distance <= sensitivity {
            distance = self.controls.camera_vector_end().radius;
        }
        self.controls.point_behind_pixel(pixel, distance)
    }

    fn mouse_action(&mut self, pixel: DVec2, action: MouseActionType) {
        if action == MouseActionType::None {
            return;
        }
        if self.picker.is_none() {
            let result = PickResult::miss(self.bounding_box);
            self.apply_mouse_action(pixel, action, &result);
            return;
        }
        let query = PickQuery {
            pixel,
            want_bounding_box: action == MouseActionType::SetTargetAndCameraPosition,
        };
        self.request_pick(query, PickPurpose::Click { pixel, action });
    }

    fn apply_mouse_action(&mut self, pixel: DVec2, action: MouseActionType, result: &PickResult) {
        let position = self.controls.camera().position;
        match action {
            MouseActionType::None => {}
            MouseActionType::SetTarget => {
                if let Some(target) = self.hit_or_fallback(pixel, result) {
                    self.cancel_animation();
                    self.set_position_and_target(position, target);
                }
            }
            MouseActionType::SetTargetAndCameraDirection => {
                if let Some(target) = self.hit_or_fallback(pixel, result) {
                    let duration = self.click_animation_duration(position.distance(target));
                    self.move_camera_target_to(target, Some(duration));
                }
            }
            MouseActionType::SetTargetAndCameraPosition => {
                if self.controls_type() == ControlsType::FirstPerson {
                    self.set_controls_type(ControlsType::Orbit);
                }
                if let Some(picked) = result.picked_bounding_box.filter(|b| !b.is_empty()) {
                    let (new_position, new_target) = helper::fit_camera_to_bounding_box(
                        self.controls.camera(),
                        &picked,
                        PICKED_OBJECT_FIT_FACTOR,
                    );
                    let duration = self.click_animation_duration(position.distance(new_position));
                    self.move_camera_to(new_position, new_target, Some(duration));
                    return;
                }
                if let Some(target) = self.hit_or_fallback(pixel, result) {
                    let new_position = position + (target - position) / 2.0;
                    let duration = self.click_animation_duration(position.distance(new_position));
                    self.move_camera_to(new_position, target, Some(duration));
                }
            }
        }
    }

    /// Re-pick the scroll cursor when the wheel has been idle long enough
    /// or the cursor moved.
    fn wheel_pick(&mut self, pixel: DVec2, now: Instant) {
        if self.picker.is_none() {
            return;
        }
        let zoom_type = self.options().zoom.effective_wheel_zoom(true);
        if zoom_type == WheelZoomType::Center {
            return;
        }
        let interaction = &self.options().interaction;
        let due = match self.last_wheel_pick {
            None => true,
            Some((time, coords)) => {
                let elapsed = now.saturating_duration_since(time);
                let moved = coords.distance(pixel);
                elapsed > interaction.minimum_time_between_raycasts()
                    && (elapsed >= interaction.maximum_time_between_raycasts()
                        || moved >= interaction.mouse_distance_threshold_between_raycasts)
            }
        };
        self.last_wheel_pick = Some((now, pixel));
        if !due {
            return;
        }
        self.request_pick(
            PickQuery {
                pixel,
                want_bounding_box: false,
            },
            PickPurpose::ScrollCursor { pixel },
        );
    }

    // -- Input --

    fn switch_mode_key(&mut self, code: &str) -> bool {
        if !self.options().interaction.enable_change_controls_type_on_123_key {
            return false;
        }
        let controls_type = match self.options().keybindings.lookup(code) {
            Some(NavigationAction::FirstPersonMode) => ControlsType::FirstPerson,
            Some(NavigationAction::OrbitMode) => ControlsType::Orbit,
            Some(NavigationAction::OrbitInCenterMode) => ControlsType::OrbitInCenter,
            _ => return false,
        };
        self.set_controls_type(controls_type);
        true
    }

    fn counts_for_clicks(pointer: &PointerEvent) -> bool {
        pointer.kind != PointerKind::Mouse || pointer.button == MouseButton::Left
    }
}

impl CameraManager for FlexibleCameraManager {
    fn camera(&self) -> &Camera {
        self.controls.camera()
    }

    fn camera_state(&self) -> CameraState {
        let camera = self.controls.camera();
        CameraState {
            position: camera.position,
            rotation: camera.rotation,
            target: self.controls.look_at_point(),
        }
    }

    fn set_camera_state(&mut self, state: CameraStateUpdate) -> Result<(), CameraError> {
        if state.rotation.is_some() && state.target.is_some() {
            return Err(CameraError::RotationAndTarget);
        }
        if self.disposed {
            return Ok(());
        }
        self.cancel_animation();
        let position = state.position.unwrap_or(self.controls.camera().position);
        match state.rotation {
            Some(rotation) => {
                self.controls.set_position_and_rotation(position, rotation);
                self.mark_changed(self.clock.now());
            }
            None => {
                let target = state
                    .target
                    .unwrap_or_else(|| self.controls.look_at_point_end());
                self.set_position_and_target(position, target);
            }
        }
        Ok(())
    }

    fn activate(&mut self, previous: Option<&dyn CameraManager>) {
        if self.disposed {
            return;
        }
        if let Some(previous) = previous {
            let state = previous.camera_state();
            let previous_camera = previous.camera();
            let camera = self.controls.camera_mut();
            camera.aspect = previous_camera.aspect;
            camera.viewport = previous_camera.viewport;
            self.set_position_and_target(state.position, state.target);
        }
        if !self.enabled {
            log::debug!("camera manager activated");
        }
        self.enabled = true;
        self.controls.set_enabled(true);
    }

    fn deactivate(&mut self) {
        if self.enabled {
            log::debug!("camera manager deactivated");
        }
        self.enabled = false;
        self.cancel_animation();
        self.controls.set_enabled(false);
    }

    fn on_camera_change(&mut self, listener: Box<CameraChangeListener>) -> SubscriptionId {
        self.controls.on_change(listener)
    }

    fn on_camera_stop(&mut self, listener: Box<CameraStopListener>) -> SubscriptionId {
        self.stop.subscribe(listener)
    }

    fn off(&mut self, id: SubscriptionId) -> bool {
        self.controls.off_change(id) || self.stop.unsubscribe(id)
    }

    fn fit_camera_to_bounding_box(
        &mut self,
        bbox: &Aabb,
        duration: Option<Duration>,
        radius_factor: f64,
    ) {
        if bbox.is_empty() || !bbox.is_finite() {
            log::debug!("not fitting camera to an empty bounding box");
            return;
        }
        let (position, target) =
            helper::fit_camera_to_bounding_box(self.controls.camera(), bbox, radius_factor);
        self.move_camera_to(position, target, duration);
    }

    fn update(&mut self, delta_time_s: f64, bbox: &Aabb) {
        if self.disposed {
            return;
        }
        let now = self.clock.now();
        self.resolve_picks();
        self.advance_animation(now);

        if self.controls.update(delta_time_s, false) {
            self.mark_changed(now);
        }
        if self.near_far_dirty || *bbox != self.bounding_box {
            self.bounding_box = *bbox;
            self.near_far_dirty = false;
            self.update_near_far_and_sensitivity();
        }
        if self.stop_debounce.poll(now) {
            self.stop.fire();
        }
    }

    fn handle_event(&mut self, event: &InputEvent) -> bool {
        if !self.is_enabled() {
            return false;
        }
        let now = self.clock.now();
        match event {
            InputEvent::PointerDown(pointer) => {
                self.cancel_animation();
                if Self::counts_for_clicks(pointer) {
                    self.clicks.pointer_down(pointer.position);
                }
                let session_before = self.controls.pan_session();
                let consumed = self.controls.handle_event(event);
                if pointer.kind == PointerKind::Touch && self.controls.touch_count() > 1 {
                    self.clicks.cancel();
                }
                if let Some(session) = self.controls.pan_session() {
                    if session_before != Some(session) {
                        self.request_pick(
                            PickQuery {
                                pixel: pointer.position,
                                want_bounding_box: false,
                            },
                            PickPurpose::TranslationAnchor { session },
                        );
                    }
                }
                consumed
            }
            InputEvent::PointerMove(pointer) => {
                self.clicks.pointer_move(pointer.position);
                self.controls.handle_event(event)
            }
            InputEvent::PointerUp(pointer) => {
                let consumed = self.controls.handle_event(event);
                if Self::counts_for_clicks(pointer) {
                    match self.clicks.pointer_up(pointer.position, now) {
                        ClickResult::NoAction => {}
                        ClickResult::Click(pixel) => {
                            let action = self.options().interaction.click_action;
                            self.mouse_action(pixel, action);
                        }
                        ClickResult::DoubleClick(pixel) => {
                            let action = self.options().interaction.double_click_action;
                            self.mouse_action(pixel, action);
                        }
                    }
                }
                consumed
            }
            InputEvent::Wheel { position, .. } => {
                self.cancel_animation();
                self.wheel_pick(*position, now);
                self.controls.handle_event(event)
            }
            InputEvent::KeyDown { code } => {
                self.cancel_animation();
                if self.switch_mode_key(code) {
                    return true;
                }
                self.controls.handle_event(event)
            }
            InputEvent::FocusLost => {
                self.clicks.cancel();
                self.controls.handle_event(event)
            }
            _ => self.controls.handle_event(event),
        }
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        log::debug!("disposing camera manager");
        self.tween = None;
        self.pending_picks.clear();
        self.picker = None;
        self.stop.clear();
        self.stop_debounce.cancel();
        self.controls.dispose();
        self.disposed = true;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::f64::consts::FRAC_PI_2;

    use super::*;
    use crate::picking::PickSender;
    use crate::util::clock::ManualClock;

    const DT: f64 = 1.0 / 60.0;

    fn camera() -> Camera {
        let mut camera = Camera::perspective(60.0, 4.0 / 3.0, 0.1, 1000.0);
        camera.set_viewport(800.0, 600.0);
        camera
    }

    fn cube() -> Aabb {
        Aabb::new(DVec3::splat(-1.0), DVec3::splat(1.0))
    }

    fn manager(clock: &ManualClock) -> FlexibleCameraManager {
        let mut manager = FlexibleCameraManager::new(camera(), CameraManagerOptions::default())
            .with_clock(Rc::new(clock.clone()));
        manager
            .set_camera_state(CameraStateUpdate::position_and_target(
                DVec3::new(0.0, 0.0, 10.0),
                DVec3::ZERO,
            ))
            .unwrap();
        manager
    }

    fn frame(manager: &mut FlexibleCameraManager, clock: &ManualClock, bbox: &Aabb) {
        clock.advance(Duration::from_millis(16));
        manager.update(DT, bbox);
    }

    fn click(manager: &mut FlexibleCameraManager, clock: &ManualClock, pixel: DVec2) {
        let pointer = PointerEvent::mouse(MouseButton::Left, pixel);
        let _ = manager.handle_event(&InputEvent::PointerDown(pointer));
        let _ = manager.handle_event(&InputEvent::PointerUp(pointer));
        clock.advance(Duration::from_millis(50));
    }

    #[test]
    fn camera_state_round_trips() {
        let clock = ManualClock::new();
        let mut manager = manager(&clock);
        let position = DVec3::new(3.0, -2.0, 7.0);
        let target = DVec3::new(1.0, 1.0, 1.0);
        manager
            .set_camera_state(CameraStateUpdate::position_and_target(position, target))
            .unwrap();
        let state = manager.camera_state();
        assert!(state.position.abs_diff_eq(position, 1e-6));
        assert!(state.target.abs_diff_eq(target, 1e-6));
        assert!(manager.camera().forward().abs_diff_eq((target - position).normalize(), 1e-6));
    }

    #[test]
    fn rotation_and_target_together_is_an_error() {
        let clock = ManualClock::new();
        let mut manager = manager(&clock);
        let before = manager.camera_state();
        let result = manager.set_camera_state(CameraStateUpdate {
            position: None,
            rotation: Some(DQuat::IDENTITY),
            target: Some(DVec3::ONE),
        });
        assert!(matches!(result, Err(CameraError::RotationAndTarget)));
        assert_eq!(manager.camera_state(), before);
    }

    #[test]
    fn rotation_keeps_target_distance() {
        let clock = ManualClock::new();
        let mut manager = manager(&clock);
        let rotation = DQuat::from_rotation_y(FRAC_PI_2);
        manager
            .set_camera_state(CameraStateUpdate {
                rotation: Some(rotation),
                ..CameraStateUpdate::default()
            })
            .unwrap();
        let state = manager.camera_state();
        assert!(state.position.abs_diff_eq(DVec3::new(0.0, 0.0, 10.0), 1e-9));
        assert!(state.rotation.abs_diff_eq(rotation, 1e-9));
        // Identity looks down -Z; a quarter turn about Y looks down -X.
        assert!(state.target.abs_diff_eq(DVec3::new(-10.0, 0.0, 10.0), 1e-6));
    }

    #[test]
    fn fit_to_box_snaps_without_duration() {
        let clock = ManualClock::new();
        let mut manager = manager(&clock);
        manager.fit_camera_to_bounding_box(&cube(), None, DEFAULT_FIT_RADIUS_FACTOR);
        let state = manager.camera_state();
        assert!(state.target.abs_diff_eq(DVec3::ZERO, 1e-9));
        let expected = 2.0 * 3.0_f64.sqrt();
        assert!((state.position.distance(state.target) - expected).abs() < 1e-6);
        assert!(state.position.abs_diff_eq(DVec3::new(0.0, 0.0, expected), 1e-6));
    }

    #[test]
    fn fit_to_empty_box_is_ignored() {
        let clock = ManualClock::new();
        let mut manager = manager(&clock);
        let before = manager.camera_state();
        manager.fit_camera_to_bounding_box(&Aabb::EMPTY, None, DEFAULT_FIT_RADIUS_FACTOR);
        assert_eq!(manager.camera_state(), before);
    }

    #[test]
    fn animated_fit_reaches_the_end_pose() {
        let clock = ManualClock::new();
        let mut manager = manager(&clock);
        let bbox = Aabb::new(DVec3::new(4.0, -1.0, -1.0), DVec3::new(6.0, 1.0, 1.0));
        manager.fit_camera_to_bounding_box(
            &bbox,
            Some(Duration::from_millis(300)),
            DEFAULT_FIT_RADIUS_FACTOR,
        );
        assert!(manager.is_animating());
        assert!(manager.controls().is_keyboard_suspended());

        frame(&mut manager, &clock, &bbox);
        let midway = manager.camera_state().target;
        assert!(!midway.abs_diff_eq(bbox.center(), 1e-3));

        for _ in 0..30 {
            frame(&mut manager, &clock, &bbox);
        }
        assert!(!manager.is_animating());
        assert!(!manager.controls().is_keyboard_suspended());
        assert!(manager.camera_state().target.abs_diff_eq(bbox.center(), 1e-6));
    }

    #[test]
    fn pointer_down_cancels_animation() {
        let clock = ManualClock::new();
        let mut manager = manager(&clock);
        manager.fit_camera_to_bounding_box(
            &cube(),
            Some(Duration::from_secs(1)),
            DEFAULT_FIT_RADIUS_FACTOR,
        );
        frame(&mut manager, &clock, &cube());
        let pointer = PointerEvent::mouse(MouseButton::Left, DVec2::new(400.0, 300.0));
        let _ = manager.handle_event(&InputEvent::PointerDown(pointer));
        assert!(!manager.is_animating());
        let held = manager.camera_state();
        frame(&mut manager, &clock, &cube());
        assert!(manager.camera_state().position.abs_diff_eq(held.position, 1e-9));
    }

    #[test]
    fn stop_fires_once_after_quiet_period() {
        let clock = ManualClock::new();
        let mut manager = manager(&clock);
        let stops = Rc::new(Cell::new(0));
        let counter = Rc::clone(&stops);
        let _ = manager.on_camera_stop(Box::new(move || counter.set(counter.get() + 1)));

        for i in 0..5_i32 {
            manager
                .set_camera_state(CameraStateUpdate::position_and_target(
                    DVec3::new(f64::from(i), 0.0, 10.0),
                    DVec3::ZERO,
                ))
                .unwrap();
            clock.advance(Duration::from_millis(10));
            manager.update(DT, &cube());
        }
        assert_eq!(stops.get(), 0);

        clock.advance(Duration::from_millis(50));
        manager.update(DT, &cube());
        assert_eq!(stops.get(), 0);

        clock.advance(Duration::from_millis(60));
        manager.update(DT, &cube());
        assert_eq!(stops.get(), 1);

        for _ in 0..10 {
            frame(&mut manager, &clock, &cube());
        }
        assert_eq!(stops.get(), 1);
    }

    #[test]
    fn change_and_stop_listeners_can_be_removed() {
        let clock = ManualClock::new();
        let mut manager = manager(&clock);
        let changes = Rc::new(Cell::new(0));
        let counter = Rc::clone(&changes);
        let change_id =
            manager.on_camera_change(Box::new(move |_, _| counter.set(counter.get() + 1)));
        let stop_id = manager.on_camera_stop(Box::new(|| {}));

        manager
            .set_camera_state(CameraStateUpdate::position_and_target(DVec3::ONE, DVec3::ZERO))
            .unwrap();
        assert_eq!(changes.get(), 1);

        assert!(manager.off(change_id));
        assert!(manager.off(stop_id));
        assert!(!manager.off(stop_id));
        manager
            .set_camera_state(CameraStateUpdate::position_and_target(DVec3::X, DVec3::ZERO))
            .unwrap();
        assert_eq!(changes.get(), 1);
    }

    #[test]
    fn near_far_follow_the_scene_box() {
        let clock = ManualClock::new();
        let mut manager = manager(&clock);
        let bbox = Aabb::new(DVec3::splat(-2.0), DVec3::splat(2.0));
        frame(&mut manager, &clock, &bbox);
        let camera = manager.camera();
        assert!(camera.near > 0.0);
        assert!(camera.near < camera.far);
        assert!(camera.near <= bbox.distance_to_point(camera.position) + 1e-9);
        let farthest = bbox
            .corners()
            .iter()
            .map(|corner| corner.distance(camera.position))
            .fold(0.0, f64::max);
        assert!(camera.far >= farthest - 1e-9);

        let sensitivity = manager.options().interaction.sensitivity;
        let interaction = &manager.options().interaction;
        assert!(sensitivity >= interaction.min_sensitivity);
        assert!(sensitivity <= interaction.max_sensitivity);
        assert!(sensitivity >= bbox.diagonal() * interaction.sensitivity_diagonal_fraction - 1e-12);
    }

    #[test]
    fn activation_copies_previous_pose() {
        let clock = ManualClock::new();
        let mut first = manager(&clock);
        first
            .set_camera_state(CameraStateUpdate::position_and_target(
                DVec3::new(5.0, 5.0, 5.0),
                DVec3::new(1.0, 0.0, 0.0),
            ))
            .unwrap();
        first.controls_mut().camera_mut().aspect = 2.5;

        let mut second = FlexibleCameraManager::new(camera(), CameraManagerOptions::default())
            .with_clock(Rc::new(clock.clone()));
        first.deactivate();
        second.activate(Some(&first));

        assert!(second.is_enabled());
        assert!(!first.is_enabled());
        let state = second.camera_state();
        assert!(state.position.abs_diff_eq(DVec3::new(5.0, 5.0, 5.0), 1e-6));
        assert!(state.target.abs_diff_eq(DVec3::new(1.0, 0.0, 0.0), 1e-6));
        assert!((second.camera().aspect - 2.5).abs() < 1e-12);
    }

    #[test]
    fn deactivated_manager_ignores_input() {
        let clock = ManualClock::new();
        let mut manager = manager(&clock);
        manager.deactivate();
        let consumed = manager.handle_event(&InputEvent::Wheel {
            position: DVec2::new(400.0, 300.0),
            delta: -3.0,
        });
        assert!(!consumed);
        frame(&mut manager, &clock, &cube());
        assert!(manager.camera_state().position.abs_diff_eq(DVec3::new(0.0, 0.0, 10.0), 1e-9));
    }

    #[test]
    fn dispose_is_idempotent() {
        let clock = ManualClock::new();
        let mut manager = manager(&clock);
        let stops = Rc::new(Cell::new(0));
        let counter = Rc::clone(&stops);
        let _ = manager.on_camera_stop(Box::new(move || counter.set(counter.get() + 1)));
        manager.dispose();
        manager.dispose();
        assert!(manager.is_disposed());
        assert!(manager
            .set_camera_state(CameraStateUpdate::position_and_target(DVec3::ONE, DVec3::ZERO))
            .is_ok());
        clock.advance(Duration::from_secs(1));
        manager.update(DT, &cube());
        assert_eq!(stops.get(), 0);
        assert!(!manager.handle_event(&InputEvent::ContextMenu));
    }

    #[test]
    fn number_keys_switch_controls_type() {
        let clock = ManualClock::new();
        let mut manager = manager(&clock);
        let key = |code: &str| InputEvent::KeyDown {
            code: code.to_owned(),
        };
        assert!(manager.handle_event(&key("Digit1")));
        assert_eq!(manager.controls_type(), ControlsType::FirstPerson);
        assert!(manager.handle_event(&key("Digit3")));
        assert_eq!(manager.controls_type(), ControlsType::OrbitInCenter);

        manager.options_mut().interaction.enable_change_controls_type_on_123_key = false;
        let _ = manager.handle_event(&key("Digit2"));
        assert_eq!(manager.controls_type(), ControlsType::OrbitInCenter);
    }

    #[test]
    fn double_click_flies_halfway_to_the_hit() {
        let clock = ManualClock::new();
        let hit = DVec3::new(0.0, 0.0, -2.0);
        let mut manager = manager(&clock)
            .with_picker(move |_: PickQuery| PickResult::hit(hit, DVec3::Z * 10.0, cube()));
        manager.set_controls_type(ControlsType::FirstPerson);

        let center = DVec2::new(400.0, 300.0);
        click(&mut manager, &clock, center);
        click(&mut manager, &clock, center);
        assert!(manager.is_animating());
        assert_eq!(manager.controls_type(), ControlsType::Orbit);

        for _ in 0..120 {
            frame(&mut manager, &clock, &cube());
        }
        let state = manager.camera_state();
        assert!(state.target.abs_diff_eq(hit, 1e-6));
        assert!(state.position.abs_diff_eq(DVec3::new(0.0, 0.0, 4.0), 1e-6));
    }

    #[test]
    fn double_click_on_object_fits_its_box() {
        let clock = ManualClock::new();
        let picked = Aabb::new(DVec3::new(-0.5, -0.5, -0.5), DVec3::new(0.5, 0.5, 0.5));
        let mut manager = manager(&clock).with_picker(move |q: PickQuery| {
            let mut result = PickResult::hit(DVec3::new(0.0, 0.0, 0.5), DVec3::Z * 10.0, cube());
            if q.want_bounding_box {
                result.picked_bounding_box = Some(picked);
            }
            result
        });
        let center = DVec2::new(400.0, 300.0);
        click(&mut manager, &clock, center);
        click(&mut manager, &clock, center);
        for _ in 0..120 {
            frame(&mut manager, &clock, &cube());
        }
        let state = manager.camera_state();
        assert!(state.target.abs_diff_eq(DVec3::ZERO, 1e-6));
        let expected = picked.bounding_sphere_radius() * PICKED_OBJECT_FIT_FACTOR;
        assert!((state.position.length() - expected).abs() < 1e-6);
    }

    #[test]
    fn click_without_picker_targets_behind_the_pixel() {
        let clock = ManualClock::new();
        let mut manager = manager(&clock);
        manager.options_mut().interaction.click_action = MouseActionType::SetTarget;
        frame(&mut manager, &clock, &cube());

        click(&mut manager, &clock, DVec2::new(400.0, 300.0));
        let state = manager.camera_state();
        assert!(state.position.abs_diff_eq(DVec3::new(0.0, 0.0, 10.0), 1e-6));
        // Half the distance to the scene, straight ahead.
        assert!(state.target.abs_diff_eq(DVec3::new(0.0, 0.0, 10.0 - 3.0_f64.sqrt()), 1e-6));
    }

    #[test]
    fn two_finger_tap_is_not_a_click() {
        let clock = ManualClock::new();
        let mut manager = manager(&clock);
        manager.options_mut().interaction.click_action = MouseActionType::SetTarget;
        frame(&mut manager, &clock, &cube());

        let first = PointerEvent::touch(1, DVec2::new(300.0, 300.0));
        let second = PointerEvent::touch(2, DVec2::new(500.0, 300.0));
        let _ = manager.handle_event(&InputEvent::PointerDown(first));
        let _ = manager.handle_event(&InputEvent::PointerDown(second));
        let _ = manager.handle_event(&InputEvent::PointerUp(second));
        let _ = manager.handle_event(&InputEvent::PointerUp(first));
        clock.advance(Duration::from_millis(50));
        assert!(manager.camera_state().target.abs_diff_eq(DVec3::ZERO, 1e-6));

        // A single-finger tap afterwards still clicks.
        let tap = PointerEvent::touch(3, DVec2::new(400.0, 300.0));
        let _ = manager.handle_event(&InputEvent::PointerDown(tap));
        let _ = manager.handle_event(&InputEvent::PointerUp(tap));
        let target = manager.camera_state().target;
        assert!(target.abs_diff_eq(DVec3::new(0.0, 0.0, 10.0 - 3.0_f64.sqrt()), 1e-6));
    }

    #[test]
    fn deferred_pick_is_applied_on_update() {
        let clock = ManualClock::new();
        let senders: Rc<RefCell<Vec<PickSender>>> = Rc::default();
        let stash = Rc::clone(&senders);

        struct DeferredPicker(Rc<RefCell<Vec<PickSender>>>);
        impl Picker for DeferredPicker {
            fn raycast(&mut self, _query: PickQuery) -> PendingPick {
                let (tx, pending) = PendingPick::channel();
                self.0.borrow_mut().push(tx);
                pending
            }
        }

        let mut manager = manager(&clock).with_picker(DeferredPicker(stash));
        manager.options_mut().interaction.click_action = MouseActionType::SetTarget;
        click(&mut manager, &clock, DVec2::new(400.0, 300.0));
        assert_eq!(manager.pending_pick_count(), 1);
        frame(&mut manager, &clock, &cube());
        assert!(manager.camera_state().target.abs_diff_eq(DVec3::ZERO, 1e-6));

        let target = DVec3::new(0.0, 0.0, 3.0);
        let sender = senders.borrow_mut().remove(0);
        assert!(sender.send(PickResult::hit(target, DVec3::Z * 10.0, cube())));
        frame(&mut manager, &clock, &cube());
        assert_eq!(manager.pending_pick_count(), 0);
        assert!(manager.camera_state().target.abs_diff_eq(target, 1e-6));
    }

    #[test]
    fn wheel_picks_are_throttled() {
        let clock = ManualClock::new();
        let picks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&picks);
        let mut manager = manager(&clock).with_picker(move |_: PickQuery| {
            counter.set(counter.get() + 1);
            PickResult::hit(DVec3::ZERO, DVec3::Z * 10.0, cube())
        });
        let wheel = |x: f64| InputEvent::Wheel {
            position: DVec2::new(x, 300.0),
            delta: -1.0,
        };

        assert!(manager.handle_event(&wheel(400.0)));
        assert_eq!(picks.get(), 1);
        assert!(manager.controls().scroll_cursor().is_some());

        for _ in 0..5 {
            clock.advance(Duration::from_millis(50));
            let _ = manager.handle_event(&wheel(400.0));
        }
        assert_eq!(picks.get(), 1);

        clock.advance(Duration::from_millis(300));
        let _ = manager.handle_event(&wheel(420.0));
        assert_eq!(picks.get(), 2);

        clock.advance(Duration::from_millis(300));
        let _ = manager.handle_event(&wheel(420.0));
        assert_eq!(picks.get(), 2);

        clock.advance(Duration::from_millis(1200));
        let _ = manager.handle_event(&wheel(420.0));
        assert_eq!(picks.get(), 3);
    }

    #[test]
    fn pan_anchor_comes_from_the_picker() {
        let clock = ManualClock::new();
        let anchor = DVec3::new(0.0, 0.0, 5.0);
        let mut manager = manager(&clock)
            .with_picker(move |_: PickQuery| PickResult::hit(anchor, DVec3::Z * 10.0, cube()));
        let mut options = manager.options().clone();
        options.damping.enabled = false;
        *manager.options_mut() = options;

        let from = DVec2::new(400.0, 300.0);
        let to = DVec2::new(500.0, 300.0);
        let _ = manager.handle_event(&InputEvent::PointerDown(PointerEvent::mouse(
            MouseButton::Right,
            from,
        )));
        let _ = manager.handle_event(&InputEvent::PointerMove(PointerEvent::mouse(
            MouseButton::Right,
            to,
        )));
        frame(&mut manager, &clock, &cube());

        let under_cursor = manager
            .camera()
            .project_to_pixel(anchor)
            .expect("anchor in front of camera");
        assert!(under_cursor.abs_diff_eq(to, 1e-6));
    }
}
