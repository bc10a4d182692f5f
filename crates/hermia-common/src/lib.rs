//! Domain types shared by every hermia crate: sensor channels, readings,
//! severity tiers and alert events, plus the small CSV codec used at the
//! file boundaries.

pub mod csv;
pub mod types;
