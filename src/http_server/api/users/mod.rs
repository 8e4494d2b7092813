pub mod create;
pub mod me;
