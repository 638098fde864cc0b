//! Domain traits - Abstractions for infrastructure implementations

pub mod clock;
pub mod runner;
pub mod transport;

pub use clock::{Clock, ManualClock, SystemClock};
pub use runner::{SkillInvocation, SkillRunner};
pub use transport::{HttpTransport, OutboundRequest};
