//! Embedding dump trees in `format!`, `println!` and log messages

use core::fmt::{self, Display, Formatter};

use facet_core::Facet;
use facet_reflect::Peek;

use crate::dumper::TreeDumper;

/// A value paired with dumper settings, rendered as a dump tree on `{}`.
///
/// The output is exactly what [`crate::sdump`] (or [`TreeDumper::format`])
/// returns for the same value: one `name(Type)` line per node, children
/// indented below their parent, each line ending in a newline. Width,
/// precision and the alternate flag are ignored.
///
/// ```
/// use facet::Facet;
/// use facet_dump::FacetDump;
///
/// #[derive(Facet)]
/// struct Point {
///     x: i32,
/// }
///
/// let shown = format!("point:\n{}", Point { x: 1 }.dump_tree());
/// assert_eq!(shown, "point:\n(Point)\n  x(i32) 1\n");
/// ```
pub struct DumpDisplay<'mem, 'facet> {
    peek: Peek<'mem, 'facet>,
    dumper: TreeDumper,
}

impl<'mem, 'facet> DumpDisplay<'mem, 'facet> {
    /// Wrap an already peeked value.
    pub fn new(peek: Peek<'mem, 'facet>, dumper: TreeDumper) -> Self {
        Self { peek, dumper }
    }
}

impl Display for DumpDisplay<'_, '_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.dumper.dump_into(Some(self.peek), f)
    }
}

/// `dump_tree` on every Facet value.
pub trait FacetDump<'facet>: Facet<'facet> {
    /// Render this value with the default settings (two-space indent, no
    /// cycle detection).
    fn dump_tree(&self) -> DumpDisplay<'_, 'facet>;

    /// Render this value with `dumper`'s settings.
    fn dump_tree_with(&self, dumper: TreeDumper) -> DumpDisplay<'_, 'facet>;
}

impl<'facet, T: Facet<'facet>> FacetDump<'facet> for T {
    fn dump_tree(&self) -> DumpDisplay<'_, 'facet> {
        self.dump_tree_with(TreeDumper::new())
    }

    fn dump_tree_with(&self, dumper: TreeDumper) -> DumpDisplay<'_, 'facet> {
        DumpDisplay::new(Peek::new(self), dumper)
    }
}
