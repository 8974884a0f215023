//! Parent/child containment between shapes.
//!
//! A shape becomes a container when another shape overlaps it enough. The
//! container grows to enclose its children plus padding and shrinks back to
//! its natural size once the last child leaves. Draw order always places a
//! container before its descendants.

mod animation;
mod auto_resize;
mod detection;
mod hierarchy;
mod layering;
mod transform;

pub use animation::{ContainerAnimation, ease_out_cubic, interpolate_bounds};
pub use auto_resize::{
    calculate_required_bounds, expand_container, shrink_container, update_container_bounds,
};
pub use detection::{
    find_potential_container, is_container_candidate, overlap_percentage, should_become_child,
    should_detach,
};
pub use hierarchy::{
    HierarchyChange, all_descendants, ancestors, attach, detach, finalize_hierarchy_change,
    update_hierarchy,
};
pub use layering::{ensure_children_after_parent, validate_and_fix_hierarchy_order};
pub use transform::{move_with_children, rotate_with_children, scale_with_children};

/// Padding kept between children and the container edge.
pub const CONTAINER_PADDING: f64 = 20.0;

/// Share of a child's area that must lie inside a container.
pub const OVERLAP_THRESHOLD: f64 = 0.5;

/// Duration of the expansion preview animation.
pub const ANIMATION_DURATION_MS: u64 = 300;
