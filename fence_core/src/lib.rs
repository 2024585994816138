//! Fence layout geometry shared by the editor and tooling.
//!
//! A fence is an ordered list of pylon positions plus a closed flag. Every
//! other piece of data (segments, collision volumes, beam spans) is derived
//! from that path and rebuilt from scratch whenever the fence is regenerated.

mod beam;
mod collider;
mod error;
mod layout;
mod path;
mod style;

pub use beam::{BeamSpan, BeamWidths, beam_spans};
pub use collider::{
    ColliderSettings, ColliderVolume, DEFAULT_COLLIDER_HEIGHT, YawMode, normalize_degrees,
    synthesize, synthesize_path, yaw_degrees,
};
pub use error::{FenceError, Result};
pub use layout::{DEFAULT_RADIUS, radial_offset, radial_positions};
pub use path::{FencePath, MIN_CLOSED_POINTS, Segment};
pub use style::{
    BeamStyle, CUSTOM_STYLE_LABEL, PylonAsset, PylonShape, StyleCatalog, StyleSelection,
    StyleTemplate,
};
