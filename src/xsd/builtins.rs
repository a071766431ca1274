//! XSD built-in types
//!
//! The built-in datatypes live in a schema of their own, the XML Schema
//! namespace. `anyType` roots the hierarchy and is its own base type;
//! `anySimpleType` roots the simple types.

/// XSD 1.0 Namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Root of the type hierarchy
pub const XSD_ANY_TYPE: &str = "anyType";

/// Root of the simple type hierarchy
pub const XSD_ANY_SIMPLE_TYPE: &str = "anySimpleType";

/// Built-in atomic types, derived from `anySimpleType`
pub const XSD_ATOMIC_TYPES: &[&str] = &[
    // String types
    "string",
    "normalizedString",
    "token",
    "language",
    "Name",
    "NCName",
    "ID",
    "IDREF",
    "ENTITY",
    "NMTOKEN",
    "anyURI",
    "QName",
    "NOTATION",
    "boolean",
    // Numeric types
    "decimal",
    "integer",
    "long",
    "int",
    "short",
    "byte",
    "nonNegativeInteger",
    "positiveInteger",
    "unsignedLong",
    "unsignedInt",
    "unsignedShort",
    "unsignedByte",
    "nonPositiveInteger",
    "negativeInteger",
    "float",
    "double",
    // Date/time types
    "duration",
    "dateTime",
    "time",
    "date",
    "gYearMonth",
    "gYear",
    "gMonthDay",
    "gDay",
    "gMonth",
    // Binary types
    "hexBinary",
    "base64Binary",
];

/// Built-in list types and their item types
pub const XSD_LIST_TYPES: &[(&str, &str)] = &[
    ("IDREFS", "IDREF"),
    ("ENTITIES", "ENTITY"),
    ("NMTOKENS", "NMTOKEN"),
];

/// Check whether a local name is a built-in type of the XSD namespace
pub fn is_builtin(local_name: &str) -> bool {
    local_name == XSD_ANY_TYPE
        || local_name == XSD_ANY_SIMPLE_TYPE
        || XSD_ATOMIC_TYPES.contains(&local_name)
        || XSD_LIST_TYPES.iter().any(|(name, _)| *name == local_name)
}
