//! Structural classification of reflected values

use alloc::vec::Vec;

use facet_core::{Def, Type, UserType};
use facet_reflect::{Peek, PeekMap};

/// How a value is laid out in the dump.
///
/// Every value falls into exactly one kind. Composite kinds carry the
/// children the dumper recurses into, already resolved through reflection.
pub enum NodeKind<'mem, 'facet> {
    /// Ordered children named by index: lists, arrays, slices and sets.
    Sequence(Vec<Peek<'mem, 'facet>>),

    /// Key/value pairs, in the map's own iteration order.
    Mapping(PeekMap<'mem, 'facet>),

    /// A single indirection: options, references and smart pointers.
    ///
    /// The target is `None` for `Option::None` and for pointers that cannot
    /// be borrowed.
    Reference(Option<Peek<'mem, 'facet>>),

    /// Named fields in declaration order: structs, tuples and enum variants.
    Aggregate {
        /// Active variant, when the value is an enum
        variant: Option<&'static str>,
        /// Field names with their values; `None` marks an unreadable field
        fields: Vec<(&'static str, Option<Peek<'mem, 'facet>>)>,
    },

    /// Not decomposed any further: numbers, strings, booleans, opaque types.
    ///
    /// Holds the value whose `Debug` output is the literal. For text behind a
    /// pointer this is the pointed-to `str`, not the pointer.
    Leaf(Peek<'mem, 'facet>),

    /// Exists, but its contents cannot be read.
    Inaccessible,
}

impl<'mem, 'facet> NodeKind<'mem, 'facet> {
    /// Classify `value` by its shape.
    ///
    /// The shape's definition is consulted before its type, so that
    /// `Option<T>` is a reference and `Vec<T>` a sequence even though their
    /// types are an enum and an opaque type respectively.
    pub fn classify(value: Peek<'mem, 'facet>) -> Self {
        let shape = value.shape();

        match (shape.def, shape.ty) {
            (Def::Scalar, _) | (_, Type::Primitive(_)) => NodeKind::Leaf(value),
            (Def::Option(_), _) => match value.into_option() {
                Ok(option) => NodeKind::Reference(option.value()),
                Err(_) => NodeKind::Inaccessible,
            },
            (Def::Pointer(_), _) => Self::classify_pointer(value),
            (Def::List(_) | Def::Array(_) | Def::Slice(_), _) => match value.into_list_like() {
                Ok(list) => NodeKind::Sequence(list.iter().collect()),
                Err(_) => NodeKind::Inaccessible,
            },
            (Def::Set(_), _) => match value.into_set() {
                Ok(set) => NodeKind::Sequence(set.iter().collect()),
                Err(_) => NodeKind::Inaccessible,
            },
            (Def::Map(_), _) => match value.into_map() {
                Ok(map) => NodeKind::Mapping(map),
                Err(_) => NodeKind::Inaccessible,
            },
            (_, Type::User(UserType::Struct(ty))) => match value.into_struct() {
                Ok(peek) => NodeKind::Aggregate {
                    variant: None,
                    fields: ty
                        .fields
                        .iter()
                        .enumerate()
                        .map(|(index, field)| (field.name, peek.field(index).ok()))
                        .collect(),
                },
                Err(_) => NodeKind::Inaccessible,
            },
            (_, Type::User(UserType::Enum(_))) => Self::classify_enum(value),
            (_, Type::User(UserType::Union(_))) => NodeKind::Inaccessible,
            _ => NodeKind::Leaf(value),
        }
    }

    fn classify_pointer(value: Peek<'mem, 'facet>) -> Self {
        let target = value
            .into_pointer()
            .ok()
            .and_then(|pointer| pointer.borrow_inner());

        match target {
            // `&str`, `Box<str>`, `Arc<str>` read as text, not as an indirection
            Some(inner) if inner.get::<str>().is_ok() => NodeKind::Leaf(inner),
            target => NodeKind::Reference(target),
        }
    }

    fn classify_enum(value: Peek<'mem, 'facet>) -> Self {
        let Ok(peek) = value.into_enum() else {
            return NodeKind::Inaccessible;
        };
        let Ok(variant) = peek.active_variant() else {
            return NodeKind::Inaccessible;
        };

        NodeKind::Aggregate {
            variant: Some(variant.name),
            fields: variant
                .data
                .fields
                .iter()
                .enumerate()
                .map(|(index, field)| (field.name, peek.field(index).ok().flatten()))
                .collect(),
        }
    }

    /// Whether this kind is rendered as a header line followed by children.
    pub fn is_composite(&self) -> bool {
        !matches!(self, NodeKind::Leaf(_) | NodeKind::Inaccessible)
    }

    /// Short lowercase name of the kind, for logs.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Sequence(_) => "sequence",
            NodeKind::Mapping(_) => "mapping",
            NodeKind::Reference(_) => "reference",
            NodeKind::Aggregate { .. } => "aggregate",
            NodeKind::Leaf(_) => "leaf",
            NodeKind::Inaccessible => "inaccessible",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::boxed::Box;
    use alloc::collections::BTreeSet;
    use alloc::string::String;
    use alloc::sync::Arc;
    use alloc::vec;
    use facet::Facet;
    use std::collections::HashMap;

    #[derive(Facet)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Facet)]
    #[repr(u8)]
    #[allow(dead_code)]
    enum Figure {
        Circle { radius: f64 },
        Empty,
    }

    fn kind_of<'a, T: Facet<'a>>(value: &T) -> &'static str {
        NodeKind::classify(Peek::new(value)).label()
    }

    #[test]
    fn scalars_are_leaves() {
        assert_eq!(kind_of(&42i32), "leaf");
        assert_eq!(kind_of(&true), "leaf");
        assert_eq!(kind_of(&String::from("text")), "leaf");
        assert_eq!(kind_of(&"text"), "leaf");
        assert_eq!(kind_of(&1.5f64), "leaf");
    }

    #[test]
    fn collections() {
        assert_eq!(kind_of(&vec![1u8, 2, 3]), "sequence");
        assert_eq!(kind_of(&[1i32, 2]), "sequence");
        assert_eq!(kind_of(&BTreeSet::from([1i32])), "sequence");
        assert_eq!(kind_of(&HashMap::from([(1i32, 2i32)])), "mapping");

        match NodeKind::classify(Peek::new(&vec![10i32, 20, 30])) {
            NodeKind::Sequence(items) => assert_eq!(items.len(), 3),
            other => panic!("expected a sequence, got {}", other.label()),
        }
    }

    #[test]
    fn options_and_pointers_are_references() {
        let none: Option<i32> = None;
        assert!(matches!(
            NodeKind::classify(Peek::new(&none)),
            NodeKind::Reference(None)
        ));
        assert!(matches!(
            NodeKind::classify(Peek::new(&Some(1i32))),
            NodeKind::Reference(Some(_))
        ));

        let boxed = Box::new(Point { x: 1, y: 2 });
        assert!(matches!(
            NodeKind::classify(Peek::new(&boxed)),
            NodeKind::Reference(Some(_))
        ));
    }

    #[test]
    fn struct_fields_in_declaration_order() {
        let point = Point { x: 1, y: 2 };
        let NodeKind::Aggregate { variant, fields } = NodeKind::classify(Peek::new(&point)) else {
            panic!("expected an aggregate");
        };
        assert_eq!(variant, None);
        let names: Vec<_> = fields.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["x", "y"]);
        assert!(fields.iter().all(|(_, value)| value.is_some()));
    }

    #[test]
    fn enums_expose_the_active_variant() {
        let circle = Figure::Circle { radius: 2.0 };
        let NodeKind::Aggregate { variant, fields } = NodeKind::classify(Peek::new(&circle)) else {
            panic!("expected an aggregate");
        };
        assert_eq!(variant, Some("Circle"));
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].0, "radius");

        let empty = Figure::Empty;
        let NodeKind::Aggregate { variant, fields } = NodeKind::classify(Peek::new(&empty)) else {
            panic!("expected an aggregate");
        };
        assert_eq!(variant, Some("Empty"));
        assert!(fields.is_empty());
    }

    #[test]
    fn text_behind_pointers_is_a_leaf_over_the_str() {
        let boxed: Box<str> = Box::from("boxed");
        let NodeKind::Leaf(text) = NodeKind::classify(Peek::new(&boxed)) else {
            panic!("expected a leaf");
        };
        assert_eq!(text.get::<str>().ok(), Some("boxed"));

        let shared: Arc<str> = Arc::from("shared");
        let NodeKind::Leaf(text) = NodeKind::classify(Peek::new(&shared)) else {
            panic!("expected a leaf");
        };
        assert_eq!(text.get::<str>().ok(), Some("shared"));
    }

    #[test]
    fn composite_kinds() {
        assert!(!NodeKind::Leaf(Peek::new(&1u8)).is_composite());
        assert!(!NodeKind::Inaccessible.is_composite());
        assert!(NodeKind::Reference(None).is_composite());
        assert!(NodeKind::Sequence(Vec::new()).is_composite());
    }
}
