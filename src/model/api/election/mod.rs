mod desc;
mod results;
mod spec;

pub use desc::{ElectionDescription, ElectionSummary};
pub use results::{ElectionDump, VerificationError};
pub use spec::{ElectionSpec, WindowSpec};
