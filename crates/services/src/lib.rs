//! Session orchestration for timed exam attempts.
//!
//! The [`ExamSession`] state machine owns the in-memory attempt; the
//! [`SessionService`] drives it against storage, the device resume
//! store, and the signed-in identity.

#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod error;
pub mod identity;
pub mod service;
pub mod session;

pub use app_services::AppServices;
pub use catalog::ExamCatalog;
pub use error::{AppServicesError, SessionError};
pub use exam_core::time::Clock;
pub use identity::{IdentityProvider, StaticIdentity, UserIdentity};
pub use service::SessionService;
pub use session::{ExamSession, SessionAction, SessionStage, SessionTick, SAVE_INTERVAL_SECS};
