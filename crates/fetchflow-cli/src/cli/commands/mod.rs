mod completions;
mod demo;
mod flaky;
mod posts;
mod stats;
mod users;

pub use completions::{run_completions, run_man};
pub use demo::run_demo;
pub use flaky::run_flaky;
pub use posts::{run_recent, run_search};
pub use stats::run_stats;
pub use users::{run_active, run_find_user, run_user};
