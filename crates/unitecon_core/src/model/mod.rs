mod inputs;
mod outputs;
pub mod unbounded;

pub use inputs::{
    Assumptions, AssumptionsBuilder, Channel, DEFAULT_ANNUAL_DISCOUNT_RATE, LEGACY_CHANNEL_NAME,
};
pub use outputs::{HealthFlag, Outputs, Severity};
