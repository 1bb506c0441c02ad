pub mod inputs;

pub mod builder;
pub mod constraints;
pub mod key;
pub mod ops;
