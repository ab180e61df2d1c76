//! Go type to diagram column type mapping.

/// Label used when a source type has no known column type.
pub const UNKNOWN_TYPE: &str = "~";

/// Map a Go type name to a column type label.
pub fn infer_column_type(source_type: &str) -> String {
    if source_type.contains("time") {
        return "datetime".to_string();
    }

    match source_type {
        "bool" => "tinyint".to_string(),

        // Integer types
        "byte" | "uint" | "uint8" | "uint16" | "uint32" | "uint64" | "uintptr" => {
            "integer".to_string()
        }
        "rune" | "int" | "int8" | "int16" | "int32" | "int64" => "integer".to_string(),

        // Floating point and complex
        "float32" | "float64" | "complex64" | "complex128" => "float".to_string(),

        "string" => "varchar".to_string(),

        _ => UNKNOWN_TYPE.to_string(),
    }
}
