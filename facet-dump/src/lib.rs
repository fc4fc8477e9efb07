#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![warn(clippy::std_instead_of_alloc)]
#![doc = include_str!("../README.md")]

extern crate alloc;

mod display;
mod dumper;
mod key;
mod kind;

pub use display::*;
pub use dumper::*;
pub use key::*;
pub use kind::*;

use facet_core::Facet;

/// Print the tree of `value` to standard output.
///
/// Pointers are dereferenced. Output errors are logged and otherwise ignored.
pub fn dump<'a, T: ?Sized + Facet<'a>>(value: &T) {
    TreeDumper::new().print(value);
}

/// Return the tree of `value` as a string.
///
/// Pointers are dereferenced.
pub fn sdump<'a, T: ?Sized + Facet<'a>>(value: &T) -> alloc::string::String {
    TreeDumper::new().format(value)
}

/// Write the tree of `value` to `writer`.
pub fn fdump<'a, T: ?Sized + Facet<'a>, W: std::io::Write>(
    writer: W,
    value: &T,
) -> std::io::Result<()> {
    TreeDumper::new().write_to(writer, value)
}
