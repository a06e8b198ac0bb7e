//! Text protocol for sending vectors back to the parent process
//!
//! A vector is written as `VECTOR[e0,e1,...,en-1]ENDVECTOR`, or
//! `VECTOR[]ENDVECTOR` when empty, with no whitespace anywhere. Elements
//! use their `Display` form. There is no parser on this side.

use std::fmt::Display;
use std::io::{self, Write};

const OPEN: &str = "VECTOR[";
const CLOSE: &str = "]ENDVECTOR";

/// Renders `values` in the vector protocol.
///
/// # Examples
///
/// ```
/// use fedval_node::wire::format_vector;
///
/// assert_eq!(format_vector::<i32>(&[]), "VECTOR[]ENDVECTOR");
/// assert_eq!(format_vector(&[1, 2, 3]), "VECTOR[1,2,3]ENDVECTOR");
/// ```
pub fn format_vector<T: Display>(values: &[T]) -> String {
    let mut out = String::from(OPEN);
    if let Some((last, init)) = values.split_last() {
        for value in init {
            out.push_str(&value.to_string());
            out.push(',');
        }
        out.push_str(&last.to_string());
    }
    out.push_str(CLOSE);
    out
}

/// Writes `values` in the vector protocol followed by a newline.
pub fn send_to_node<W: Write, T: Display>(writer: &mut W, values: &[T]) -> io::Result<()> {
    writeln!(writer, "{}", format_vector(values))?;
    writer.flush()
}
