pub mod availability;
pub mod batch;
pub mod catalog;
pub mod checker;
pub mod domain;
pub mod error;
pub mod ports;
pub mod time_window;

pub use availability::ShiftScanner;
pub use batch::BatchRunner;
pub use checker::ShiftChecker;
pub use domain::{
    BatchSummary, MatchResult, ParsedShiftEntry, PortalCredentials, Preference, UserAccount,
    UserId, UserMatches, UserPreferences,
};
pub use error::{AuthError, FetchError, OrchestrationError};
pub use ports::{
    PortError, PortResult, PortalClient, PortalSession, PreferenceStore, SecretSource, ShiftSink,
};
