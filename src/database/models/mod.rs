mod document;
mod user;

pub use document::{Document, PAGE_SIZE};
pub use user::User;
