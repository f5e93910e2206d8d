//! `WsdlDocument`: class registration plus a memoized build.
//!
//! Registration calls drop the cached build; every read rebuilds first when
//! nothing is cached, so reads always reflect the current registration.

use crate::builder::DocumentBuilder;
use crate::error::{Error, Result};
use crate::lister::MethodLister;
use crate::model::ServiceDocument;
use crate::schema::{load_schema, BundledSchema, SchemaLocator, Violation, SCHEMA_RESOURCE};
use indexmap::IndexMap;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Result of one build, kept until the registration changes.
#[derive(Debug, Clone)]
struct Built {
    metadata: ServiceDocument,
    xml: String,
}

pub struct WsdlDocument<L> {
    builder: DocumentBuilder<L>,
    locator: Box<dyn SchemaLocator>,
    name: String,
    /// class → endpoint URI, in registration order
    classes: IndexMap<String, String>,
    cache: Option<Built>,
}

impl<L: MethodLister> WsdlDocument<L> {
    /// New, empty document validated against the bundled schema.
    pub fn new(lister: L) -> Self {
        Self {
            builder: DocumentBuilder::new(lister),
            locator: Box::new(BundledSchema),
            name: String::new(),
            classes: IndexMap::new(),
            cache: None,
        }
    }

    pub fn with_locator(mut self, locator: impl SchemaLocator + 'static) -> Self {
        self.locator = Box::new(locator);
        self
    }

    /// Register a class, or move an existing one to a new endpoint.
    pub fn add_class(&mut self, name: &str, endpoint: &str) {
        self.classes.insert(name.to_string(), endpoint.to_string());
        self.cache = None;
    }

    /// Register several classes at once.
    pub fn add_classes<'a, I>(&mut self, classes: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (name, endpoint) in classes {
            self.add_class(name, endpoint);
        }
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.cache = None;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when the next read has to rebuild.
    pub fn is_dirty(&self) -> bool {
        self.cache.is_none()
    }

    /// The serialized WSDL document.
    pub fn get_document(&mut self) -> Result<&str> {
        Ok(self.fresh()?.xml.as_str())
    }

    /// The metadata the current document was built from.
    pub fn service_document(&mut self) -> Result<&ServiceDocument> {
        Ok(&self.fresh()?.metadata)
    }

    /// Write the document to `path`.
    ///
    /// The text goes to a temporary file next to `path` that is then renamed
    /// over it, so a failed save leaves nothing behind.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let xml = self.fresh()?.xml.clone();

        let not_writable = |source| Error::NotWritable {
            path: path.to_path_buf(),
            source,
        };
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(not_writable)?;
        tmp.write_all(xml.as_bytes()).map_err(not_writable)?;
        tmp.persist(path).map_err(|e| not_writable(e.error))?;

        info!(path = %path.display(), bytes = xml.len(), "saved document");
        Ok(())
    }

    /// Check the document against the WSDL schema.
    ///
    /// Non-conformance is `Ok(false)`; only a schema that cannot be loaded is
    /// an error.
    pub fn validate(&mut self) -> Result<bool> {
        Ok(self.validation_report()?.is_empty())
    }

    /// Every schema violation in the current document.
    pub fn validation_report(&mut self) -> Result<Vec<Violation>> {
        let mut schema = load_schema(self.locator.as_ref(), SCHEMA_RESOURCE)?;
        let built = self.fresh()?;
        let violations = schema.validate_str(&built.xml);
        debug!(violations = violations.len(), "validated document");
        Ok(violations)
    }

    fn fresh(&mut self) -> Result<&Built> {
        let built = match self.cache.take() {
            Some(built) => built,
            None => self.rebuild()?,
        };
        Ok(self.cache.insert(built))
    }

    fn rebuild(&self) -> Result<Built> {
        info!(
            document = %self.name,
            classes = self.classes.len(),
            "building document"
        );
        let classes = self.classes.iter().map(|(c, e)| (c.as_str(), e.as_str()));
        let (metadata, definitions) = self.builder.build(&self.name, classes)?;
        let xml = definitions.to_xml()?;
        Ok(Built { metadata, xml })
    }
}
