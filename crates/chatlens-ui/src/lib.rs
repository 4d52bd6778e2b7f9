//! Decision helpers behind the chat transcript's tool-call panels and model badges.
//!
//! Everything here is a pure function of its arguments: callers pass a snapshot of
//! their UI state in and apply the returned decision themselves.

mod expanded;
mod fetch_plan;
mod model_meta;

pub use expanded::{ExpandedIds, toggle_id};
pub use fetch_plan::compute_fetch_plan;
pub use model_meta::{extract_model_string, model_badge, model_label, pick_latest_model_string};
