//! Feed envelope construction and XML encoding.
//!
//! A feed is a batch of update instructions submitted as one XML document.
//! The encoder always writes its own header block (fixed document version
//! plus the configured merchant identifier) ahead of the caller's messages;
//! caller-shaped header content is not representable and is therefore
//! dropped by design. No schema validation is performed; the service is the
//! final arbiter of acceptance.

use crate::xml::{XmlNode, ATTRIBUTES_KEY, TEXT_KEY};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

/// Document version written into every feed header.
pub const DOCUMENT_VERSION: &str = "1.01";

/// Default envelope root element name.
pub const DEFAULT_ROOT: &str = "AmazonEnvelope";

/// Operation requested for a single feed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    /// Create or replace the addressed record.
    Update,
    /// Remove the addressed record.
    Delete,
    /// Merge into the addressed record.
    PartialUpdate,
}

impl OperationType {
    /// Wire name of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Update => "Update",
            OperationType::Delete => "Delete",
            OperationType::PartialUpdate => "PartialUpdate",
        }
    }
}

/// A single message inside a feed envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedMessage {
    /// Identifier of the message, unique within its envelope.
    pub message_id: u32,
    /// Optional operation type element.
    pub operation_type: Option<OperationType>,
    /// Element name of the payload (e.g. `Inventory`, `Price`).
    pub payload_name: String,
    /// Payload content.
    pub payload: XmlNode,
}

/// A feed document under construction.
///
/// Message ids are assigned from a per-envelope monotonic counter, so they
/// are unique within the envelope by construction. Callers that assign their
/// own ids via [`push_message_with_id`](Self::push_message_with_id) are
/// responsible for keeping them unique; the encoder does not validate this.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEnvelope {
    message_type: String,
    root: String,
    messages: Vec<FeedMessage>,
    next_message_id: u32,
}

impl FeedEnvelope {
    /// Create an empty envelope for the given message type.
    pub fn new(message_type: impl Into<String>) -> Self {
        Self {
            message_type: message_type.into(),
            root: DEFAULT_ROOT.to_string(),
            messages: Vec::new(),
            next_message_id: 1,
        }
    }

    /// Override the root element name.
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    /// Append a message without an operation type. Returns the assigned id.
    pub fn push_message(&mut self, payload_name: impl Into<String>, payload: XmlNode) -> u32 {
        self.push(None, payload_name.into(), payload)
    }

    /// Append an `Update` message. Returns the assigned id.
    pub fn push_update(&mut self, payload_name: impl Into<String>, payload: XmlNode) -> u32 {
        self.push(Some(OperationType::Update), payload_name.into(), payload)
    }

    /// Append a message with an explicit operation type. Returns the assigned id.
    pub fn push_operation(
        &mut self,
        operation_type: OperationType,
        payload_name: impl Into<String>,
        payload: XmlNode,
    ) -> u32 {
        self.push(Some(operation_type), payload_name.into(), payload)
    }

    /// Append a message with a caller-chosen id. The id must be unique within
    /// the envelope; collisions are a caller bug.
    pub fn push_message_with_id(&mut self, message: FeedMessage) {
        self.next_message_id = self.next_message_id.max(message.message_id + 1);
        self.messages.push(message);
    }

    fn push(
        &mut self,
        operation_type: Option<OperationType>,
        payload_name: String,
        payload: XmlNode,
    ) -> u32 {
        let message_id = self.next_message_id;
        self.next_message_id += 1;
        self.messages.push(FeedMessage {
            message_id,
            operation_type,
            payload_name,
            payload,
        });
        message_id
    }

    /// The envelope's message type.
    pub fn message_type(&self) -> &str {
        &self.message_type
    }

    /// The messages appended so far.
    pub fn messages(&self) -> &[FeedMessage] {
        &self.messages
    }

    /// Serialize the envelope to feed XML.
    ///
    /// The header block always carries [`DOCUMENT_VERSION`] and the supplied
    /// merchant identifier, regardless of anything the caller built.
    pub fn encode(&self, merchant_id: &str) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push('<');
        xml.push_str(&self.root);
        xml.push('>');

        xml.push_str("<Header><DocumentVersion>");
        xml.push_str(DOCUMENT_VERSION);
        xml.push_str("</DocumentVersion><MerchantIdentifier>");
        xml.push_str(&escape_xml(merchant_id));
        xml.push_str("</MerchantIdentifier></Header>");

        xml.push_str("<MessageType>");
        xml.push_str(&escape_xml(&self.message_type));
        xml.push_str("</MessageType>");

        for message in &self.messages {
            xml.push_str("<Message><MessageID>");
            xml.push_str(&message.message_id.to_string());
            xml.push_str("</MessageID>");
            if let Some(operation) = message.operation_type {
                xml.push_str("<OperationType>");
                xml.push_str(operation.as_str());
                xml.push_str("</OperationType>");
            }
            write_element(&mut xml, &message.payload_name, &message.payload);
            xml.push_str("</Message>");
        }

        xml.push_str("</");
        xml.push_str(&self.root);
        xml.push('>');
        xml
    }
}

/// Content-MD5 header value for a feed body: base64 of the raw MD5 digest.
pub fn content_md5(body: &[u8]) -> String {
    BASE64.encode(Md5::digest(body))
}

fn write_element(out: &mut String, name: &str, node: &XmlNode) {
    match node {
        XmlNode::Array(items) => {
            for item in items {
                write_element(out, name, item);
            }
        }
        XmlNode::Text(value) => {
            out.push('<');
            out.push_str(name);
            out.push('>');
            out.push_str(&escape_xml(value));
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        XmlNode::Object(entries) => {
            out.push('<');
            out.push_str(name);
            if let Some(XmlNode::Object(attributes)) = node.get(ATTRIBUTES_KEY) {
                for (attr_name, attr_value) in attributes {
                    if let XmlNode::Text(value) = attr_value {
                        out.push(' ');
                        out.push_str(attr_name);
                        out.push_str("=\"");
                        out.push_str(&escape_xml(value));
                        out.push('"');
                    }
                }
            }
            out.push('>');
            for (key, child) in entries {
                if key == ATTRIBUTES_KEY {
                    continue;
                }
                if key == TEXT_KEY {
                    if let XmlNode::Text(value) = child {
                        out.push_str(&escape_xml(value));
                    }
                    continue;
                }
                write_element(out, key, child);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
    }
}

/// Escape special characters for XML text and attribute values.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory_payload(sku: &str, quantity: u32) -> XmlNode {
        XmlNode::object([
            ("SKU", XmlNode::text(sku)),
            ("Quantity", XmlNode::text(quantity.to_string())),
        ])
    }

    #[test]
    fn test_message_ids_are_monotonic() {
        let mut envelope = FeedEnvelope::new("Inventory");
        let first = envelope.push_update("Inventory", inventory_payload("A", 1));
        let second = envelope.push_update("Inventory", inventory_payload("B", 2));

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        let ids: Vec<u32> = envelope.messages().iter().map(|m| m.message_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_encode_two_messages() {
        let mut envelope = FeedEnvelope::new("Inventory");
        envelope.push_update("Inventory", inventory_payload("ABC", 5));
        envelope.push_update("Inventory", inventory_payload("DEF", 0));

        let xml = envelope.encode("MERCHANT1");
        assert_eq!(xml.matches("<Message>").count(), 2);
        assert_eq!(xml.matches("<Header>").count(), 1);
        assert!(xml.contains("<DocumentVersion>1.01</DocumentVersion>"));
        assert!(xml.contains("<MerchantIdentifier>MERCHANT1</MerchantIdentifier>"));
        assert!(xml.contains("<MessageType>Inventory</MessageType>"));
    }

    #[test]
    fn test_encode_exact_layout() {
        let mut envelope = FeedEnvelope::new("Inventory");
        envelope.push_update("Inventory", inventory_payload("ABC", 5));

        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
            <AmazonEnvelope>\
            <Header><DocumentVersion>1.01</DocumentVersion>\
            <MerchantIdentifier>M1</MerchantIdentifier></Header>\
            <MessageType>Inventory</MessageType>\
            <Message><MessageID>1</MessageID><OperationType>Update</OperationType>\
            <Inventory><SKU>ABC</SKU><Quantity>5</Quantity></Inventory></Message>\
            </AmazonEnvelope>";
        assert_eq!(envelope.encode("M1"), expected);
    }

    #[test]
    fn test_attributes_and_text_content() {
        let mut envelope = FeedEnvelope::new("Price");
        envelope.push_message(
            "Price",
            XmlNode::object([
                ("SKU", XmlNode::text("ABC")),
                (
                    "StandardPrice",
                    XmlNode::object([
                        (
                            ATTRIBUTES_KEY,
                            XmlNode::object([("currency", XmlNode::text("DEFAULT"))]),
                        ),
                        (TEXT_KEY, XmlNode::text("19.99")),
                    ]),
                ),
            ]),
        );

        let xml = envelope.encode("M1");
        assert!(xml.contains(r#"<StandardPrice currency="DEFAULT">19.99</StandardPrice>"#));
        // No OperationType element when none was requested.
        assert!(!xml.contains("<OperationType>"));
    }

    #[test]
    fn test_custom_root_element() {
        let envelope = FeedEnvelope::new("Inventory").with_root("CustomEnvelope");
        let xml = envelope.encode("M1");
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<CustomEnvelope>"));
        assert!(xml.ends_with("</CustomEnvelope>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut envelope = FeedEnvelope::new("Inventory");
        envelope.push_update(
            "Inventory",
            XmlNode::object([("SKU", XmlNode::text("A&B<C>"))]),
        );
        let xml = envelope.encode("M&M");

        assert!(xml.contains("<SKU>A&amp;B&lt;C&gt;</SKU>"));
        assert!(xml.contains("<MerchantIdentifier>M&amp;M</MerchantIdentifier>"));
    }

    #[test]
    fn test_array_payload_repeats_element() {
        let mut envelope = FeedEnvelope::new("Inventory");
        envelope.push_message(
            "Inventory",
            XmlNode::object([(
                "SKU",
                XmlNode::array([XmlNode::text("A"), XmlNode::text("B")]),
            )]),
        );
        let xml = envelope.encode("M1");
        assert!(xml.contains("<SKU>A</SKU><SKU>B</SKU>"));
    }

    #[test]
    fn test_content_md5_known_vector() {
        assert_eq!(content_md5(b"<x/>"), "qLWUv43Mplb7HrG2Y0SUCg==");
    }

    #[test]
    fn test_caller_assigned_id_advances_counter() {
        let mut envelope = FeedEnvelope::new("Inventory");
        envelope.push_message_with_id(FeedMessage {
            message_id: 10,
            operation_type: None,
            payload_name: "Inventory".into(),
            payload: inventory_payload("A", 1),
        });
        let next = envelope.push_message("Inventory", inventory_payload("B", 2));
        assert_eq!(next, 11);
    }
}
