//! Data models for the creator-agency CRM.
//!
//! Field names serialize in camelCase to match the JSON the dashboard exchanges with the store.

mod account;
mod creator;
mod dates;
mod deal;
mod session;
mod tags;
mod transfer;

pub use account::*;
pub use creator::*;
pub use dates::*;
pub use deal::*;
pub use session::*;
pub use tags::*;
pub use transfer::*;
