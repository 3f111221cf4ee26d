pub mod sqlite;
pub mod verifiers;
