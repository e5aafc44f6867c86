use glam::DVec2;
use web_time::{Duration, Instant};

/// Maximum gap between two clicks for them to count as a double click.
pub const DOUBLE_CLICK_THRESHOLD: Duration = Duration::from_millis(400);

/// Cursor travel (pixels) after which a press becomes a drag.
const DRAG_THRESHOLD_PX: f64 = 4.0;

/// Maximum distance (pixels) between the two clicks of a double click.
const DOUBLE_CLICK_DISTANCE_PX: f64 = 8.0;

/// Result of processing a pointer-up through the multi-click state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickResult {
    /// Drag, or a release without a matching press.
    NoAction,
    /// Single click at the given pixel.
    Click(DVec2),
    /// Second click close in time and space to the previous one.
    DoubleClick(DVec2),
}

/// Distinguishes clicks from drags and pairs clicks into double clicks.
#[derive(Debug, Default)]
pub struct ClickDetector {
    down_position: Option<DVec2>,
    is_dragging: bool,
    last_click: Option<(Instant, DVec2)>,
}

impl ClickDetector {
    /// Detector with no press in progress.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press.
    pub fn pointer_down(&mut self, position: DVec2) {
        self.down_position = Some(position);
        self.is_dragging = false;
    }

    /// Track movement; a press that travels far enough becomes a drag.
    pub fn pointer_move(&mut self, position: DVec2) {
        if let Some(down) = self.down_position {
            if down.distance(position) > DRAG_THRESHOLD_PX {
                self.is_dragging = true;
            }
        }
    }

    /// Forget the press in progress, e.g. when a second finger lands.
    pub fn cancel(&mut self) {
        self.down_position = None;
        self.is_dragging = false;
        self.last_click = None;
    }

    /// Process a release and return what kind of click happened.
    pub fn pointer_up(&mut self, position: DVec2, now: Instant) -> ClickResult {
        let Some(down) = self.down_position.take() else {
            return ClickResult::NoAction;
        };
        let was_dragging =
            self.is_dragging || down.distance(position) > DRAG_THRESHOLD_PX;
        self.is_dragging = false;

        if was_dragging {
            self.last_click = None;
            return ClickResult::NoAction;
        }

        let is_double = self.last_click.is_some_and(|(time, at)| {
            now.saturating_duration_since(time) < DOUBLE_CLICK_THRESHOLD
                && at.distance(position) <= DOUBLE_CLICK_DISTANCE_PX
        });
        if is_double {
            self.last_click = None;
            ClickResult::DoubleClick(position)
        } else {
            self.last_click = Some((now, position));
            ClickResult::Click(position)
        }
    }
}
