//! Pure counting logic: tally aggregation, the five algorithms, and the
//! result payload types.

pub mod errors;
pub mod majority;
pub mod proportional;
pub mod referendum;
pub mod result_data;
pub mod tally;
