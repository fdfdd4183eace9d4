//! Request intake and the rules around it: validation, blocked dates,
//! status assignment, and the listings built on top of the store.

pub mod dates;
pub mod intake;
pub mod query;
pub mod registry;
pub mod status;

pub use intake::{RequestIntake, SubmitRequest};
pub use query::{AdminFilter, RequestQuery};
pub use registry::BlockedDateRegistry;
