//! Tree dumper for Facet types

use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};
use core::fmt::{self, Write};

use facet_core::{Facet, Shape, TypeNameOpts};
use facet_reflect::{Peek, ValueId};
use tracing::{debug, trace, warn};

use crate::key::stringify_key;
use crate::kind::NodeKind;

/// Renders values as indented trees, one line per node.
///
/// A `TreeDumper` only holds settings: every call starts a fresh traversal,
/// so one dumper can be shared freely.
#[derive(Clone, Debug)]
pub struct TreeDumper {
    indent_size: usize,
    detect_cycles: bool,
}

impl Default for TreeDumper {
    fn default() -> Self {
        Self {
            indent_size: 2,
            detect_cycles: false,
        }
    }
}

impl TreeDumper {
    /// Create a new TreeDumper with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of spaces per nesting level
    pub fn with_indent_size(mut self, size: usize) -> Self {
        self.indent_size = size;
        self
    }

    /// Stop at values that contain themselves instead of recursing forever.
    ///
    /// When enabled, a composite value met again below itself is rendered as
    /// `name(Type) <cycle>` and not expanded a second time.
    pub fn with_cycle_detection(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }

    /// Dump a value to a string
    pub fn format<'a, T: ?Sized + Facet<'a>>(&self, value: &T) -> String {
        self.format_peek(Peek::new(value))
    }

    /// Dump a peeked value to a string
    pub fn format_peek(&self, value: Peek<'_, '_>) -> String {
        self.format_optional_peek(Some(value))
    }

    /// Dump a possibly absent value to a string.
    ///
    /// An absent value renders as a single `() ""` line.
    pub fn format_optional_peek(&self, value: Option<Peek<'_, '_>>) -> String {
        let mut output = String::new();
        // writing into a String cannot fail
        let _ = self.dump_into(value, &mut output);
        output
    }

    /// Dump a value to a formatter
    pub fn format_to<'a, T: ?Sized + Facet<'a>>(
        &self,
        value: &T,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        self.dump_into(Some(Peek::new(value)), f)
    }

    /// Dump a value to standard output.
    ///
    /// Write errors are logged and otherwise ignored.
    pub fn print<'a, T: ?Sized + Facet<'a>>(&self, value: &T) {
        let output = self.format(value);
        let mut stdout = std::io::stdout().lock();
        if let Err(err) = std::io::Write::write_all(&mut stdout, output.as_bytes()) {
            warn!(%err, "could not write dump to stdout");
        }
    }

    /// Dump a value to an I/O sink
    pub fn write_to<'a, T: ?Sized + Facet<'a>, W: std::io::Write>(
        &self,
        mut writer: W,
        value: &T,
    ) -> std::io::Result<()> {
        writer.write_all(self.format(value).as_bytes())
    }

    pub(crate) fn dump_into(
        &self,
        value: Option<Peek<'_, '_>>,
        out: &mut dyn Write,
    ) -> fmt::Result {
        let mut state = DumpState {
            dumper: self,
            out,
            depth: -1,
            ancestors: BTreeSet::new(),
        };
        state.dump(value, "")
    }
}

/// State of a single traversal.
///
/// `depth` starts at -1 so that the root, entered once, sits at depth 0.
struct DumpState<'d, 'o> {
    dumper: &'d TreeDumper,
    out: &'o mut dyn Write,
    depth: isize,
    /// Composite values on the current path, only tracked when detecting cycles
    ancestors: BTreeSet<ValueId>,
}

impl DumpState<'_, '_> {
    fn dump(&mut self, value: Option<Peek<'_, '_>>, name: &str) -> fmt::Result {
        self.depth += 1;
        let result = match value {
            Some(value) => self.dump_value(value, name),
            None => self.write_inaccessible(name),
        };
        self.depth -= 1;
        result
    }

    fn dump_value(&mut self, value: Peek<'_, '_>, name: &str) -> fmt::Result {
        let kind = NodeKind::classify(value);
        trace!(name, depth = self.depth, kind = kind.label(), "dumping");

        if !(self.dumper.detect_cycles && kind.is_composite()) {
            return self.dump_kind(value, kind, name);
        }

        let id = value.id();
        if !self.ancestors.insert(id) {
            debug!(name, %id, "cycle detected");
            return self.write_line(name, TypeName::of(&value), Some("<cycle>"));
        }
        let result = self.dump_kind(value, kind, name);
        self.ancestors.remove(&id);
        result
    }

    fn dump_kind(
        &mut self,
        value: Peek<'_, '_>,
        kind: NodeKind<'_, '_>,
        name: &str,
    ) -> fmt::Result {
        match kind {
            NodeKind::Inaccessible => self.write_inaccessible(name),
            NodeKind::Leaf(shown) => {
                let repr = literal(&shown);
                self.write_line(name, TypeName::of(&value), Some(&repr))
            }
            NodeKind::Sequence(items) => {
                self.write_line(name, TypeName::of(&value), None)?;
                for (index, item) in items.into_iter().enumerate() {
                    self.dump(Some(item), &index.to_string())?;
                }
                Ok(())
            }
            NodeKind::Mapping(map) => {
                self.write_line(name, TypeName::of(&value), None)?;
                for (key, entry) in map.iter() {
                    match stringify_key(key) {
                        Some(key) => self.dump(Some(entry), &key)?,
                        None => {
                            self.dump(Some(key), "key:")?;
                            self.dump(Some(entry), "value:")?;
                        }
                    }
                }
                Ok(())
            }
            NodeKind::Reference(target) => {
                self.write_line(name, TypeName::of(&value), None)?;
                self.dump(target, name)
            }
            NodeKind::Aggregate { variant, fields } => {
                let type_name = TypeName {
                    peek: &value,
                    variant,
                };
                self.write_line(name, type_name, None)?;
                for (field_name, field) in fields {
                    self.dump(field, field_name)?;
                }
                Ok(())
            }
        }
    }

    fn write_inaccessible(&mut self, name: &str) -> fmt::Result {
        self.write_line(name, "", Some("\"\""))
    }

    fn write_line(
        &mut self,
        name: &str,
        type_name: impl fmt::Display,
        literal: Option<&str>,
    ) -> fmt::Result {
        let depth = usize::try_from(self.depth).unwrap_or_default();
        write!(
            self.out,
            "{: <width$}",
            "",
            width = depth * self.dumper.indent_size
        )?;
        write!(self.out, "{name}({type_name})")?;
        if let Some(literal) = literal {
            write!(self.out, " {literal}")?;
        }
        writeln!(self.out)
    }
}

/// The `Debug` rendering of a leaf, or nothing if its `Debug` impl fails.
fn literal(value: &Peek<'_, '_>) -> String {
    let mut literal = String::new();
    if write!(literal, "{value:?}").is_err() {
        literal.clear();
    }
    literal
}

/// Full type name of a peeked value, with the active variant for enums.
struct TypeName<'a, 'mem, 'facet> {
    peek: &'a Peek<'mem, 'facet>,
    variant: Option<&'static str>,
}

impl<'a, 'mem, 'facet> TypeName<'a, 'mem, 'facet> {
    fn of(peek: &'a Peek<'mem, 'facet>) -> Self {
        Self {
            peek,
            variant: None,
        }
    }
}

impl fmt::Display for TypeName<'_, '_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_shape_name(self.peek.shape(), f, TypeNameOpts::infinite())?;
        if let Some(variant) = self.variant {
            write!(f, "::{variant}")?;
        }
        Ok(())
    }
}

/// Write the name of `shape`, including type parameters.
///
/// Shapes such as `Option<T>` list their parameters without a name function
/// that prints them, so those are spelled out here.
fn write_shape_name(
    shape: &'static Shape,
    f: &mut fmt::Formatter<'_>,
    opts: TypeNameOpts,
) -> fmt::Result {
    shape.write_type_name(f, opts)?;
    if shape.type_name.is_some() || shape.type_params.is_empty() {
        return Ok(());
    }

    f.write_str("<")?;
    match opts.for_children() {
        Some(opts) => {
            for (index, param) in shape.type_params.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                write_shape_name(param.shape, f, opts)?;
            }
        }
        None => f.write_str("⋯")?,
    }
    f.write_str(">")
}
