//! Status line matcher implementations.

pub mod progress;
pub mod recovery;
pub mod speed;
pub mod temperature;

pub use progress::ProgressMatcher;
pub use recovery::RecoveryMatcher;
pub use speed::SpeedMatcher;
pub use temperature::TemperatureMatcher;
