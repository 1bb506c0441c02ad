#![allow(clippy::len_without_is_empty, clippy::type_complexity)]

pub mod backend;
pub mod circuit;
pub mod field;
pub mod pipeline;
pub mod r1cs;
pub mod utils;
