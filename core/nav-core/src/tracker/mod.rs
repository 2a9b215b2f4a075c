//! Navigation gate: one monitoring init per process, one page view per distinct
//! navigation.

mod navigation;
mod state;

pub use navigation::{LocationOutcome, NavigationObserver, NavigationTracker};
pub use state::TrackerState;
