//! Tree rewrites that prepare a procedure body for conditional lowering.
//!
//! Each pass returns fresh statement indices and leaves its input untouched.

pub mod declarations;
pub mod implicit_else;
pub mod literals;
