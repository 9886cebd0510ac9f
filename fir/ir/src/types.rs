//! FIRRTL types.
use crate::Id;
use itertools::Itertools;

/// Bit width of an integer or analog type. `None` means the width is left to
/// inference.
pub type Width = Option<u32>;

/// A field of a bundle type. A flipped field stores its type wrapped in
/// [Type::Flip].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct BundleElement {
    pub name: Id,
    pub ty: Type,
}

impl BundleElement {
    pub fn new<S: Into<Id>>(name: S, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// True if the field was declared with `flip`.
    pub fn is_flipped(&self) -> bool {
        matches!(self.ty, Type::Flip(_))
    }
}

/// A structurally compared FIRRTL type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum Type {
    Clock,
    Reset,
    AsyncReset,
    UInt(Width),
    SInt(Width),
    Analog(Width),
    /// Fields in declaration order.
    Bundle(Vec<BundleElement>),
    /// Element type and number of elements.
    Vector(Box<Type>, u64),
    /// Reversed data-flow direction.
    Flip(Box<Type>),
}

impl Type {
    /// Wrap this type in a [Type::Flip].
    pub fn flip(self) -> Type {
        Type::Flip(Box::new(self))
    }

    /// Construct a vector of `size` elements of this type.
    pub fn vector(self, size: u64) -> Type {
        Type::Vector(Box::new(self), size)
    }

    pub fn is_flip(&self) -> bool {
        matches!(self, Type::Flip(_))
    }

    /// Returns the type with every flip removed.
    pub fn passive(&self) -> Type {
        match self {
            Type::Flip(inner) => inner.passive(),
            Type::Bundle(elements) => Type::Bundle(
                elements
                    .iter()
                    .map(|e| BundleElement::new(e.name, e.ty.passive()))
                    .collect(),
            ),
            Type::Vector(elem, size) => elem.passive().vector(*size),
            ground => ground.clone(),
        }
    }

    /// Total number of bits in this type, if every leaf width is known.
    pub fn bit_width(&self) -> Option<u64> {
        match self {
            Type::Clock | Type::Reset | Type::AsyncReset => Some(1),
            Type::UInt(w) | Type::SInt(w) | Type::Analog(w) => {
                w.map(u64::from)
            }
            Type::Bundle(elements) => elements
                .iter()
                .map(|e| e.ty.bit_width())
                .sum::<Option<u64>>(),
            Type::Vector(elem, size) => {
                elem.bit_width().and_then(|w| w.checked_mul(*size))
            }
            Type::Flip(inner) => inner.bit_width(),
        }
    }
}

impl std::fmt::Display for BundleElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.ty {
            Type::Flip(inner) => write!(f, "flip {} : {}", self.name, inner),
            ty => write!(f, "{} : {}", self.name, ty),
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn sized(
            f: &mut std::fmt::Formatter<'_>,
            name: &str,
            width: &Width,
        ) -> std::fmt::Result {
            match width {
                Some(w) => write!(f, "{name}<{w}>"),
                None => write!(f, "{name}"),
            }
        }
        match self {
            Type::Clock => write!(f, "Clock"),
            Type::Reset => write!(f, "Reset"),
            Type::AsyncReset => write!(f, "AsyncReset"),
            Type::UInt(w) => sized(f, "UInt", w),
            Type::SInt(w) => sized(f, "SInt", w),
            Type::Analog(w) => sized(f, "Analog", w),
            Type::Bundle(elements) => {
                write!(f, "{{{}}}", elements.iter().join(", "))
            }
            Type::Vector(elem, size) => write!(f, "{elem}[{size}]"),
            Type::Flip(inner) => write!(f, "flip {inner}"),
        }
    }
}
