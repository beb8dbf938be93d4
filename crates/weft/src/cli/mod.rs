pub mod app;
mod cmd;

pub use app::{App, Commands};
pub use cmd::run;
