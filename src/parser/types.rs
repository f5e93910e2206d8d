//! Doc-comment type names to schema type tags.

/// Map a raw `@param` / `@return` type token to its normalized type tag.
///
/// - `int`, `float`, `string` → `xsd:<token>`
/// - `integer` → `xsd:int`
/// - `array` → `soapenc:Array`
/// - anything else passes through as `xsd:<token>`
pub fn normalize_type(token: &str) -> String {
    match token {
        "integer" => "xsd:int".to_string(),
        "array" => "soapenc:Array".to_string(),
        // int, float and string share the default mapping
        other => format!("xsd:{}", other),
    }
}
