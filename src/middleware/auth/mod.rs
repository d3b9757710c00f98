pub mod access;
pub mod scope;
