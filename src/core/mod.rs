pub mod capability;
pub mod formatter;
pub mod gate;
pub mod orchestrator;

pub use crate::domain::model::{ErrorState, FormattedOutput, ParseState, ParsedValue};
pub use crate::domain::ports::{CapabilityHandle, CapabilitySlot, ParseCapability, PrettyPrinter};
pub use crate::utils::error::Result;
