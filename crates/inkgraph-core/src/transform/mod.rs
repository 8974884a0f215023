//! Interactive geometric transforms.
//!
//! Everything here is a pure function of an element's current geometry and
//! a pointer gesture. Callers turn the results into [`ElementUpdate`]s.
//!
//! [`ElementUpdate`]: crate::elements::ElementUpdate

pub mod group;
pub mod handles;
pub mod point_handles;
pub mod resize;
pub mod rotation;
pub mod text_scale;

pub use group::{GroupBounds, group_bounds, is_point_in_bounds, rotate_group, scale_group, translate_group};
pub use handles::{
    CursorKind, Handle, HandleKind, HandleMetrics, cursor_for_handle, get_group_transform_handles,
    get_transform_handles, group_handle_at, handle_at,
};
pub use point_handles::{PointHandle, PointHandleKind, arrow_handle_at, arrow_handles, line_handle_at, line_handles, move_arrow_point};
pub use resize::{ResizeHandle, resize, resize_flips};
pub use rotation::{rotation_angle, snap_rotation, snap_rotation_with};
pub use text_scale::{TextScale, scale_text};

/// Smallest width or height a resize may produce.
pub const MIN_ELEMENT_SIZE: f64 = 10.0;
