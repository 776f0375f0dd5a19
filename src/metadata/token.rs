use std::fmt;

/// Table identifier for type definitions.
pub const TABLE_TYPE_DEF: u8 = 0x02;
/// Table identifier for field definitions.
pub const TABLE_FIELD: u8 = 0x04;
/// Table identifier for method definitions.
pub const TABLE_METHOD_DEF: u8 = 0x06;

/// A metadata token identifying a type, field or method definition.
///
/// Tokens are the reference currency of the module model: every cross-member
/// reference (field loads, callback targets, synthesized unit calls) names its
/// target by token rather than by pointer, which keeps the mutable module
/// graph free of aliasing. The 32-bit layout follows the usual convention:
/// - The high byte (bits 24-31) indicates the owning table
/// - The low 24 bits (bits 0-23) indicate the row index within that table
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub u32);

impl Token {
    /// Creates a token from a raw 32-bit value.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a type-definition token for the given row.
    #[must_use]
    pub fn type_def(row: u32) -> Self {
        Token((u32::from(TABLE_TYPE_DEF) << 24) | (row & 0x00FF_FFFF))
    }

    /// Creates a field token for the given row.
    #[must_use]
    pub fn field(row: u32) -> Self {
        Token((u32::from(TABLE_FIELD) << 24) | (row & 0x00FF_FFFF))
    }

    /// Creates a method-definition token for the given row.
    #[must_use]
    pub fn method(row: u32) -> Self {
        Token((u32::from(TABLE_METHOD_DEF) << 24) | (row & 0x00FF_FFFF))
    }

    /// Returns the raw token value.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Returns the owning table of the token (high byte).
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Returns the row index within the owning table (low 24 bits).
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns `true` if this is a null token (value 0).
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if this token names a type definition.
    #[must_use]
    pub fn is_type_def(&self) -> bool {
        self.table() == TABLE_TYPE_DEF
    }

    /// Returns `true` if this token names a method definition.
    #[must_use]
    pub fn is_method(&self) -> bool {
        self.table() == TABLE_METHOD_DEF
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}
