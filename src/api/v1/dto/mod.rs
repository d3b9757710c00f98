pub mod calc;
pub mod me;
