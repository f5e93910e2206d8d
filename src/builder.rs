//! Document builder: from registered classes to a [`Definitions`] tree.
//!
//! Building happens in two phases. [`DocumentBuilder::collect`] asks the method
//! lister for every registered class and parses each method's comment.
//! [`assemble`] then lays the metadata out section by section; each section is
//! finished for all classes before the next one starts, since the WSDL schema
//! fixes their order.

use crate::error::Result;
use crate::lister::MethodLister;
use crate::model::{OperationSpec, ServiceClass, ServiceDocument};
use crate::parser::parse_comment;
use crate::wsdl::{
    Binding, BindingOperation, Definitions, Message, Part, Port, PortOperation, PortType, Service,
};
use tracing::debug;

pub struct DocumentBuilder<L> {
    lister: L,
}

impl<L: MethodLister> DocumentBuilder<L> {
    pub fn new(lister: L) -> Self {
        Self { lister }
    }

    /// Collect metadata and assemble the document tree.
    pub fn build<'a, I>(&self, name: &str, classes: I) -> Result<(ServiceDocument, Definitions)>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let doc = self.collect(name, classes)?;
        let defs = assemble(&doc);
        Ok((doc, defs))
    }

    /// Resolve every `(class, endpoint)` pair into a [`ServiceClass`].
    ///
    /// The first unknown class aborts the whole collection.
    pub fn collect<'a, I>(&self, name: &str, classes: I) -> Result<ServiceDocument>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut doc = ServiceDocument {
            name: name.to_string(),
            classes: Vec::new(),
        };

        for (class, endpoint) in classes {
            let methods = self.lister.list_public_methods(class)?;
            debug!(class, methods = methods.len(), "collected class");

            let operations = methods
                .into_iter()
                .map(|method| OperationSpec {
                    name: method.name,
                    ..parse_comment(&method.comment)
                })
                .collect();

            doc.classes.push(ServiceClass {
                name: class.to_string(),
                endpoint: endpoint.to_string(),
                operations,
            });
        }

        Ok(doc)
    }
}

/// Lay out collected metadata as a WSDL tree.
pub fn assemble(doc: &ServiceDocument) -> Definitions {
    Definitions {
        name: doc.name.clone(),
        messages: messages(doc),
        port_types: port_types(doc),
        bindings: bindings(doc),
        service: service(doc),
    }
}

fn operations(doc: &ServiceDocument) -> impl Iterator<Item = &OperationSpec> {
    doc.classes.iter().flat_map(|class| class.operations.iter())
}

fn response_name(op: &OperationSpec) -> String {
    format!("{}Response", op.name)
}

fn messages(doc: &ServiceDocument) -> Vec<Message> {
    let mut messages = Vec::new();
    for op in operations(doc) {
        messages.push(Message {
            name: op.name.clone(),
            parts: op
                .params
                .iter()
                .map(|p| Part {
                    name: p.name.clone(),
                    ty: p.ty.clone(),
                })
                .collect(),
        });

        if let Some(ref ret) = op.returns {
            messages.push(Message {
                name: response_name(op),
                parts: vec![Part {
                    name: format!("{}Return", op.name),
                    ty: ret.ty.clone(),
                }],
            });
        }
    }
    messages
}

fn port_types(doc: &ServiceDocument) -> Vec<PortType> {
    doc.classes
        .iter()
        .map(|class| PortType {
            name: format!("{}PortType", class.name),
            operations: class
                .operations
                .iter()
                .map(|op| PortOperation {
                    name: op.name.clone(),
                    documentation: op.description.clone(),
                    input: op.name.clone(),
                    output: op.has_response().then(|| response_name(op)),
                })
                .collect(),
        })
        .collect()
}

fn bindings(doc: &ServiceDocument) -> Vec<Binding> {
    doc.classes
        .iter()
        .map(|class| Binding {
            name: format!("{}Binding", class.name),
            port_type: format!("{}PortType", class.name),
            operations: class
                .operations
                .iter()
                .map(|op| BindingOperation {
                    name: op.name.clone(),
                    soap_action: format!("urn:{}Action", op.name),
                    has_output: op.has_response(),
                })
                .collect(),
        })
        .collect()
}

fn service(doc: &ServiceDocument) -> Service {
    Service {
        name: format!("{}Service", doc.name),
        ports: doc
            .classes
            .iter()
            .map(|class: &ServiceClass| Port {
                name: format!("{}Port", class.name),
                binding: format!("{}Binding", class.name),
                location: class.endpoint.clone(),
            })
            .collect(),
    }
}
