pub mod result;
pub mod target;
