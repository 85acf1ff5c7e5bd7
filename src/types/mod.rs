//! Type definitions for the API helpers
//!
//! This module contains the result envelope and the data extracted from
//! upstream responses.

pub mod buvid;
pub mod envelope;
pub mod live;
pub mod response;
pub mod serde_helpers;

pub use buvid::{Buvid3, BuvidCookies, BuvidPair};
pub use envelope::{Diagnostic, Envelope, Failure, upstream_error_message};
pub use live::{AnchorArea, MasterInfo, ParentArea, RoomBaseInfo, RoomInfoOld, SubArea};
pub use response::PingResponse;
