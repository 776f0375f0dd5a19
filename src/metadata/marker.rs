//! Declarative markers read by the eligibility analysis.
//!
//! Markers are the crate's view of the attribute surface: pure data attached
//! to types, fields, properties, events and methods. The analyzer only ever
//! reads them; it never synthesizes or removes markers. The shape mirrors a
//! decoded custom attribute: a marker kind plus a list of named arguments.

/// The marker kinds the analysis recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// Opts a type, field, property or event out of static-state reset.
    ///
    /// On a type this removes the whole type from consideration. On a
    /// property or event it removes the compiler-owned backing field from
    /// the inventory as a unit.
    ResetOptOut,

    /// Marks a static, zero-parameter, void method as a pre-reset hook.
    ///
    /// Carries an optional `order` named argument (I4, default 0, lower runs
    /// earlier).
    ResetOnUnload,

    /// Marks a member as compiler-generated.
    ///
    /// Backing fields of properties and events carry this; the inventory
    /// filter requires it before removing a field by naming convention, so a
    /// user-declared field that happens to share the backing name is never
    /// touched.
    CompilerGenerated,
}

/// A single named-argument value inside a marker.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerArg {
    /// Boolean value
    Bool(bool),
    /// Signed 32-bit integer
    I4(i32),
    /// Signed 64-bit integer
    I8(i64),
    /// UTF-8 string
    String(String),
}

/// A named argument (field or property) declared on a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerNamedArg {
    /// Name of the argument as declared on the attribute.
    pub name: String,
    /// Value of the argument.
    pub value: MarkerArg,
}

/// A declarative marker attached to a module member.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Which marker this is.
    pub kind: MarkerKind,
    /// Named arguments carried by the marker, in declaration order.
    pub named_args: Vec<MarkerNamedArg>,
}

impl Marker {
    /// Creates a marker with no arguments.
    #[must_use]
    pub fn new(kind: MarkerKind) -> Self {
        Self {
            kind,
            named_args: Vec::new(),
        }
    }

    /// Adds a named argument to the marker.
    #[must_use]
    pub fn with_arg(mut self, name: impl Into<String>, value: MarkerArg) -> Self {
        self.named_args.push(MarkerNamedArg {
            name: name.into(),
            value,
        });
        self
    }

    /// Reads a named argument as an I4.
    ///
    /// Returns `None` when the argument is absent or holds a different value
    /// kind. Callers that need a default (the callback collector) substitute
    /// it themselves so the fallback is visible at the call site.
    #[must_use]
    pub fn i4_arg(&self, name: &str) -> Option<i32> {
        self.named_args
            .iter()
            .find(|arg| arg.name == name)
            .and_then(|arg| match arg.value {
                MarkerArg::I4(value) => Some(value),
                _ => None,
            })
    }

    /// Returns `true` when the marker carries an argument with this name,
    /// regardless of its value kind.
    #[must_use]
    pub fn has_arg(&self, name: &str) -> bool {
        self.named_args.iter().any(|arg| arg.name == name)
    }
}

/// Returns `true` if the marker list contains a marker of the given kind.
#[must_use]
pub fn has_marker(markers: &[Marker], kind: MarkerKind) -> bool {
    markers.iter().any(|m| m.kind == kind)
}

/// Finds the first marker of the given kind.
#[must_use]
pub fn find_marker(markers: &[Marker], kind: MarkerKind) -> Option<&Marker> {
    markers.iter().find(|m| m.kind == kind)
}
