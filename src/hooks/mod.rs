pub mod synthetic;
pub mod tracker;

pub use synthetic::inject_synthetic_hookups;
pub use tracker::{active_hooks, active_hooks_by_correlation};
