pub mod calendar;
mod locale;
mod money;
mod period;
mod revenue;
mod service_record;
mod stats;

pub use locale::*;
pub use money::*;
pub use period::*;
pub use revenue::*;
pub use service_record::*;
pub use stats::*;
