//! Deal pipeline: records plus the status state machine that gates every
//! transition.

mod deal;
mod status;

pub use deal::{Deal, DealUpdate, NewDeal};
pub use status::DealStatus;
