pub mod price_history;
pub mod verifier;
