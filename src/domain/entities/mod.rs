pub mod candidate;
pub mod deal;
pub mod observation;
