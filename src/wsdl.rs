//! WSDL 1.1 document tree and its XML serialization.
//!
//! The tree mirrors the top-level sections of a `definitions` element, in the
//! order the WSDL schema requires: messages, port types, bindings, service.

use crate::error::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

pub const NS_WSDL: &str = "http://schemas.xmlsoap.org/wsdl/";
pub const NS_SOAP: &str = "http://schemas.xmlsoap.org/wsdl/soap/";
pub const NS_SOAPENC: &str = "http://schemas.xmlsoap.org/soap/encoding/";
pub const NS_XSD: &str = "http://www.w3.org/2001/XMLSchema";
pub const SOAP_HTTP_TRANSPORT: &str = "http://schemas.xmlsoap.org/soap/http";

/// Prefix bound to the document's own namespace.
pub const TYPENS: &str = "typens";

/// Root `definitions` element.
#[derive(Debug, Clone, PartialEq)]
pub struct Definitions {
    pub name: String,
    pub messages: Vec<Message>,
    pub port_types: Vec<PortType>,
    pub bindings: Vec<Binding>,
    pub service: Service,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub name: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub name: String,
    pub ty: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortType {
    pub name: String,
    pub operations: Vec<PortOperation>,
}

/// Abstract operation: documentation plus message references.
#[derive(Debug, Clone, PartialEq)]
pub struct PortOperation {
    pub name: String,
    pub documentation: String,
    pub input: String,
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: String,
    /// Referenced port type name
    pub port_type: String,
    pub operations: Vec<BindingOperation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BindingOperation {
    pub name: String,
    pub soap_action: String,
    pub has_output: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub name: String,
    pub ports: Vec<Port>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    pub name: String,
    /// Referenced binding name
    pub binding: String,
    pub location: String,
}

impl Definitions {
    /// The document's target namespace, `urn:<name>`.
    pub fn target_namespace(&self) -> String {
        format!("urn:{}", self.name)
    }

    /// Serialize to indented XML text.
    pub fn to_xml(&self) -> Result<String> {
        let mut w = XmlOut::new();
        let tns = self.target_namespace();

        w.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("definitions");
        root.push_attribute(("name", self.name.as_str()));
        root.push_attribute(("targetNamespace", tns.as_str()));
        root.push_attribute(("xmlns:typens", tns.as_str()));
        root.push_attribute(("xmlns:xsd", NS_XSD));
        root.push_attribute(("xmlns:soap", NS_SOAP));
        root.push_attribute(("xmlns:soapenc", NS_SOAPENC));
        root.push_attribute(("xmlns:wsdl", NS_WSDL));
        root.push_attribute(("xmlns", NS_WSDL));
        w.event(Event::Start(root))?;

        for message in &self.messages {
            let attrs = [("name", message.name.as_str())];
            if message.parts.is_empty() {
                w.empty("message", &attrs)?;
                continue;
            }
            w.start("message", &attrs)?;
            for part in &message.parts {
                w.empty("part", &[("name", part.name.as_str()), ("type", part.ty.as_str())])?;
            }
            w.end("message")?;
        }

        for port_type in &self.port_types {
            w.start("portType", &[("name", port_type.name.as_str())])?;
            for op in &port_type.operations {
                w.start("operation", &[("name", op.name.as_str())])?;
                if op.documentation.is_empty() {
                    w.empty("documentation", &[])?;
                } else {
                    w.start("documentation", &[])?;
                    w.event(Event::Text(BytesText::new(&op.documentation)))?;
                    w.end("documentation")?;
                }
                w.empty("input", &[("message", typens(&op.input).as_str())])?;
                if let Some(ref output) = op.output {
                    w.empty("output", &[("message", typens(output).as_str())])?;
                }
                w.end("operation")?;
            }
            w.end("portType")?;
        }

        for binding in &self.bindings {
            w.start(
                "binding",
                &[("name", binding.name.as_str()), ("type", typens(&binding.port_type).as_str())],
            )?;
            w.empty(
                "soap:binding",
                &[("style", "rpc"), ("transport", SOAP_HTTP_TRANSPORT)],
            )?;
            for op in &binding.operations {
                w.start("operation", &[("name", op.name.as_str())])?;
                w.empty("soap:operation", &[("soapAction", op.soap_action.as_str())])?;
                w.soap_body("input", &tns)?;
                if op.has_output {
                    w.soap_body("output", &tns)?;
                }
                w.end("operation")?;
            }
            w.end("binding")?;
        }

        w.start("service", &[("name", self.service.name.as_str())])?;
        for port in &self.service.ports {
            w.start(
                "port",
                &[("name", port.name.as_str()), ("binding", typens(&port.binding).as_str())],
            )?;
            w.empty("soap:address", &[("location", port.location.as_str())])?;
            w.end("port")?;
        }
        w.end("service")?;

        w.end("definitions")?;
        w.finish()
    }
}

fn typens(name: &str) -> String {
    format!("{}:{}", TYPENS, name)
}

/// Thin wrapper over the indenting quick-xml writer.
struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::Serialize(e.to_string()))
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.event(Event::Start(element(name, attrs)))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.event(Event::Empty(element(name, attrs)))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    /// `<input>` / `<output>` wrapping an encoded `soap:body`.
    fn soap_body(&mut self, clause: &str, namespace: &str) -> Result<()> {
        self.start(clause, &[])?;
        self.empty(
            "soap:body",
            &[
                ("use", "encoded"),
                ("namespace", namespace),
                ("encodingStyle", NS_SOAPENC),
            ],
        )?;
        self.end(clause)
    }

    fn finish(self) -> Result<String> {
        let mut bytes = self.writer.into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes).map_err(|e| Error::Serialize(e.to_string()))
    }
}

fn element<'a>(name: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for &attr in attrs {
        start.push_attribute(attr);
    }
    start
}
