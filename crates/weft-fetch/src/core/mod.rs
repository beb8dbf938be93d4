//! Pure transformations for gateway fetching.
//!
//! Nothing in here performs I/O or touches a clock: weight feedback,
//! weighted picks, backoff arithmetic and the base64url state machine are
//! all plain functions over their inputs.

mod base64url;
mod retry;
mod weight;

pub use base64url::Base64UrlDecoder;
pub use retry::retry_delay;
pub use weight::{cool, pick_weighted, total_weight, warm};
