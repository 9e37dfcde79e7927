//! HTTP plumbing shared by every feature router.

pub mod error;
mod health;
pub mod router;
mod state;

pub use error::{ApiError, ApiJson, ApiResult, ErrorBody};
pub use health::HealthResponse;
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateErrorExt, ApiStateInner};
