//! Data model for collected service metadata: format-agnostic.

use serde::Serialize;

/// Complete metadata for one description document.
///
/// Only ever produced by a build; a changed registration produces a new one.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ServiceDocument {
    /// Document / service identifier
    pub name: String,
    /// Registered classes, in registration order
    pub classes: Vec<ServiceClass>,
}

/// A registered class and the operations collected from its public methods.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ServiceClass {
    pub name: String,
    /// Address URI the class's operations are served at
    pub endpoint: String,
    pub operations: Vec<OperationSpec>,
}

/// One exposed method, derived from its documentation comment.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct OperationSpec {
    pub name: String,
    /// @param entries, in order of first appearance
    pub params: Vec<ParamSpec>,
    /// @return entry; `None` means no response message
    #[serde(rename = "return", skip_serializing_if = "Option::is_none")]
    pub returns: Option<ReturnSpec>,
    /// Free text left over once the tag lines are removed
    pub description: String,
}

impl OperationSpec {
    pub fn has_response(&self) -> bool {
        self.returns.is_some()
    }

    /// Insert a parameter; a repeated name replaces the earlier entry in place.
    pub fn set_param(&mut self, param: ParamSpec) {
        match self.params.iter_mut().find(|p| p.name == param.name) {
            Some(existing) => *existing = param,
            None => self.params.push(param),
        }
    }

    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// Parsed @param entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    pub name: String,
    /// Normalized type tag, e.g. `xsd:int`
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

/// Parsed @return entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnSpec {
    /// Normalized type tag, e.g. `xsd:string`
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}
