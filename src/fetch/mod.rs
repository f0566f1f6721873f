//! Quote fetching.
//!
//! This module owns the HTTP side of a scrape:
//! - One client per proxy endpoint, rotated per attempt
//! - Randomized identity and form payload per attempt
//! - Status classification and session refresh on repeated 403s
//! - Politeness delay between zip codes and periodic long breaks

mod pacing;
mod request;
mod session;

pub use pacing::LongBreak;
pub use session::{HttpSession, SessionOptions};
