pub mod alloc;
pub mod errors;
