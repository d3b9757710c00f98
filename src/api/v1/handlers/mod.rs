pub mod calc;
pub mod health;
pub mod me;
