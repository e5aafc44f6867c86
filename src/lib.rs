// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![warn(unused_results)]
#![warn(unused_qualifications)]
// Cast hygiene
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]

//! Damped interactive camera controls for real-time 3D viewers.
//!
//! Flexcam turns pointer, wheel, touch and keyboard input into smooth
//! camera motion. It supports three navigation styles (first person,
//! orbit around a movable pivot, orbit around a fixed center) and
//! exponential damping of every moving quantity so the view glides to
//! rest instead of stopping dead.
//!
//! # Key entry points
//!
//! - [`manager::FlexibleCameraManager`] - the façade a viewer talks to
//! - [`controls::FlexibleControls`] - input-to-motion core
//! - [`options::CameraManagerOptions`] - runtime configuration with TOML
//!   presets
//! - [`picking::Picker`] - the seam through which the host raycasts its
//!   scene
//!
//! # Architecture
//!
//! The host feeds [`input::InputEvent`]s to the manager and calls
//! [`manager::CameraManager::update`] once per frame with the scene bounds.
//! The manager resolves outstanding raycasts, advances camera tweens,
//! lets the controls damp toward their commanded pose, refits the near and
//! far planes and finally emits a debounced stop event once the camera
//! comes to rest.

pub mod animation;
pub mod camera;
pub mod controls;
pub mod damped;
pub mod error;
pub mod geometry;
pub mod input;
pub mod manager;
pub mod options;
pub mod picking;
pub mod util;

pub use error::CameraError;
