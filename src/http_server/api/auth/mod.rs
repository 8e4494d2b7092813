pub mod connect;
pub mod disconnect;
