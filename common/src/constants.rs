//! Keywords of the `.arith` circuit format.

pub const TOTAL: &str = "total";
pub const INPUT: &str = "input";
pub const NIZK_INPUT: &str = "nizkinput";
pub const OUTPUT: &str = "output";

pub const ADD: &str = "add";
pub const MUL: &str = "mul";
pub const XOR: &str = "xor";
pub const OR: &str = "or";
pub const ASSERT: &str = "assert";
pub const ZEROP: &str = "zerop";
pub const SPLIT: &str = "split";
pub const PACK: &str = "pack";
/// Followed by the hex constant, e.g. `const-mul-1f`.
pub const CONST_MUL_PREFIX: &str = "const-mul-";
/// Followed by the hex constant, e.g. `const-mul-neg-1`.
pub const CONST_MUL_NEG_PREFIX: &str = "const-mul-neg-";

pub const GATE_INPUTS: &str = "in";
pub const GATE_OUTPUTS: &str = "out";
pub const COMMENT: char = '#';
