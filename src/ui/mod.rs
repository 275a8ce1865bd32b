//! User interface module.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - This module - Printing
//!
//! Results (versions, reports) go to stdout so they can be captured by build
//! scripts. Status lines, warnings and errors go to stderr.

pub mod formatter;

pub use formatter::{
    format_boundary_warning, format_build_info, format_commit_line, format_error, format_status,
    format_success,
};

use crate::boundary::BoundaryWarning;

/// Print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{}", format_error(message));
}

/// Print a success message with a green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{}", format_success(message));
}

/// Print a status message with a yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{}", format_status(message));
}

/// Print a boundary warning with a yellow warning icon.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{}", format_boundary_warning(warning));
}

/// Print every warning in order
pub fn display_boundary_warnings(warnings: &[BoundaryWarning]) {
    for warning in warnings {
        display_boundary_warning(warning);
    }
}

/// Print a result to stdout, adding a newline only when missing
pub fn display_output(text: &str) {
    if text.ends_with('\n') {
        print!("{}", text);
    } else {
        println!("{}", text);
    }
}
