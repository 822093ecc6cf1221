pub mod formatter;
pub mod verifier;

pub use formatter::format_output;
pub use verifier::{Verifier, format_final_answer};
