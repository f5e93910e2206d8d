//! wsdlgen: generate WSDL 1.1 service descriptions from documented methods.
//!
//! Classes are registered on a [`WsdlDocument`] together with the endpoint
//! their operations are served at. Their public methods come from a
//! [`MethodLister`]; each method's doc comment supplies the message parts
//! (`@param`), the response (`@return`) and the operation documentation.
//!
//! ```no_run
//! use wsdlgen::{SourceLister, WsdlDocument};
//!
//! let lister = SourceLister::from_paths(&["src/calculator.rs"])?;
//! let mut doc = WsdlDocument::new(lister);
//! doc.set_name("Calc");
//! doc.add_class("Calculator", "http://localhost/calc");
//! println!("{}", doc.get_document()?);
//! # Ok::<(), wsdlgen::Error>(())
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod facade;
pub mod lister;
pub mod logging;
pub mod model;
pub mod parser;
pub mod schema;
pub mod wsdl;

pub use builder::DocumentBuilder;
pub use error::{Error, Result};
pub use facade::WsdlDocument;
pub use lister::{MethodDoc, MethodLister, SourceLister, StaticLister};
pub use model::{OperationSpec, ParamSpec, ReturnSpec, ServiceClass, ServiceDocument};
pub use parser::parse_comment;
pub use schema::{BundledSchema, SchemaLocator, SearchPathLocator, Violation};
