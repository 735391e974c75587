//! bizdesk-core: shared plumbing for the Bizdesk crates.

pub mod clock;
pub mod config;
pub mod errors;
pub mod tenant;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{DeskConfig, DeskConfigSnapshot};
pub use errors::{DeskError, DeskResult, ErrorKind};
pub use tenant::{TenantContext, TenantId};
