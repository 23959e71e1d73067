//! Shared test doubles for the Qriadrama reader.

mod clock;
mod presenter;
mod provider;
mod scheduler;

pub use clock::FixedClock;
pub use presenter::{PresenterEvent, RecordingPresenter};
pub use provider::{FailingScriptProvider, InMemoryScriptProvider};
pub use scheduler::{ManualTickHandle, ManualTickScheduler};
