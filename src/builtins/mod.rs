//! Built-in functions - console output for compiled programs
//!
//! Design: Safe Rust API here; the C exports (`puts_int`, `puts_str`) live
//! in `ffi` and forward to it.

mod print;

#[cfg(test)]
mod tests;

pub use print::{
    capture_output, print_int, print_int_to, print_legacy_text, print_legacy_text_to, print_text,
    print_text_to, Output, Stdout,
};
