pub mod context;
pub mod loads;
pub mod session;
