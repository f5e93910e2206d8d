//! Schema resources: locating the WSDL schema and validating documents
//! against it with libxml2.

use crate::error::{Error, Result};
use libxml::error::StructuredError;
use libxml::parser::Parser;
use libxml::schemas::{SchemaParserContext, SchemaValidationContext};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Logical name of the WSDL 1.1 schema resource.
pub const SCHEMA_RESOURCE: &str = "wsdl.xsd";

/// Copy of the WSDL schema shipped inside the binary.
pub const BUNDLED_WSDL_SCHEMA: &str = include_str!("../schema/wsdl.xsd");

/// Resolves a logical schema name to the schema's text.
pub trait SchemaLocator {
    fn load(&self, name: &str) -> Result<String>;
}

/// Serves only the bundled WSDL schema.
#[derive(Debug, Default, Clone, Copy)]
pub struct BundledSchema;

impl SchemaLocator for BundledSchema {
    fn load(&self, name: &str) -> Result<String> {
        if name == SCHEMA_RESOURCE {
            Ok(BUNDLED_WSDL_SCHEMA.to_string())
        } else {
            Err(Error::schema(name, "no bundled schema with this name"))
        }
    }
}

/// Looks for the schema file in a list of directories; the first match wins.
#[derive(Debug, Default, Clone)]
pub struct SearchPathLocator {
    dirs: Vec<PathBuf>,
    bundled_fallback: bool,
}

impl SearchPathLocator {
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
            bundled_fallback: false,
        }
    }

    /// Fall back to [`BundledSchema`] when no directory has the file.
    pub fn with_bundled_fallback(mut self) -> Self {
        self.bundled_fallback = true;
        self
    }
}

impl SchemaLocator for SearchPathLocator {
    fn load(&self, name: &str) -> Result<String> {
        for dir in &self.dirs {
            let candidate = dir.join(name);
            if candidate.is_file() {
                debug!(path = %candidate.display(), "loading schema");
                return fs::read_to_string(&candidate)
                    .map_err(|e| Error::schema(name, format!("{}: {}", candidate.display(), e)));
            }
        }
        if self.bundled_fallback {
            return BundledSchema.load(name);
        }
        Err(Error::schema(name, "not found in any schema directory"))
    }
}

impl<T: SchemaLocator + ?Sized> SchemaLocator for Box<T> {
    fn load(&self, name: &str) -> Result<String> {
        (**self).load(name)
    }
}

// -- Validation ---------------------------------------------------------------

/// One reason a document does not conform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Line in the validated document, when libxml2 knows it
    pub line: Option<u32>,
    pub message: String,
}

impl Violation {
    #[allow(deprecated)]
    fn from_libxml(error: &StructuredError) -> Self {
        Self {
            line: error
                .line
                .and_then(|line| u32::try_from(line).ok())
                .filter(|&line| line > 0),
            message: error
                .message
                .as_deref()
                .map(str::trim)
                .unwrap_or("unknown libxml2 error")
                .to_string(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// A compiled XML Schema.
pub struct Schema {
    context: SchemaValidationContext,
}

impl Schema {
    /// Compile schema text. `resource` names the schema in error messages.
    pub fn parse(resource: &str, text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Err(Error::schema(resource, "schema is empty"));
        }
        let mut parser = SchemaParserContext::from_buffer(text);
        let context = SchemaValidationContext::from_parser(&mut parser)
            .map_err(|errors| Error::schema(resource, describe(&errors)))?;
        Ok(Self { context })
    }

    /// Parse and validate XML text; an empty list means it conforms.
    pub fn validate_str(&mut self, text: &str) -> Vec<Violation> {
        let doc = match Parser::default().parse_string(text) {
            Ok(doc) => doc,
            Err(e) => {
                return vec![Violation {
                    line: None,
                    message: format!("document is not well-formed: {:?}", e),
                }]
            }
        };
        match self.context.validate_document(&doc) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.iter().map(Violation::from_libxml).collect(),
        }
    }
}

fn describe(errors: &[StructuredError]) -> String {
    let messages: Vec<String> = errors
        .iter()
        .map(|e| Violation::from_libxml(e).to_string())
        .collect();
    if messages.is_empty() {
        "schema could not be compiled".to_string()
    } else {
        messages.join("; ")
    }
}

/// Load and compile a schema through a locator.
pub fn load_schema(locator: &dyn SchemaLocator, name: &str) -> Result<Schema> {
    let text = locator.load(name)?;
    Schema::parse(name, &text)
}
