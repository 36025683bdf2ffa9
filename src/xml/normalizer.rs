//! Streaming XML to [`XmlNode`] conversion.

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{XmlNode, ATTRIBUTES_KEY, TEXT_KEY};
use crate::error::MwsError;

/// Element names the service may legally repeat.
///
/// A single occurrence of any of these is still exposed as a one-element
/// array, so callers receiving exactly one result never branch into
/// single-object code paths. This is an explicit multiplicity table; nothing
/// is inferred from the shape of the data.
const REPEATABLE_ELEMENTS: &[&str] = &[
    "Order",
    "OrderItem",
    "Product",
    "Offer",
    "LowestOfferListing",
    "CompetitivePrice",
    "Message",
    "ReportRequestInfo",
    "ReportInfo",
    "FeedSubmissionInfo",
    "ListingParticipation",
    "Participation",
    "Recommendation",
    "Self",
    "GetCompetitivePricingForASINResult",
    "GetLowestOfferListingsForASINResult",
    "GetMyPriceForSKUResult",
    "GetMyPriceForASINResult",
    "GetMatchingProductForIdResult",
];

/// `xml:lang` values that mark locale-qualified attribute blocks. The marker
/// is rewritten into a leading `Language` child element so multi-locale
/// responses normalize to the same shape as single-locale ones.
const LOCALE_LANGUAGES: &[&str] = &["de-DE", "en-EN", "es-ES", "fr-FR", "it-IT", "en-US"];

fn is_repeatable(name: &str) -> bool {
    REPEATABLE_ELEMENTS.contains(&name)
}

fn malformed(message: impl std::fmt::Display) -> MwsError {
    MwsError::MalformedResponse {
        message: message.to_string(),
    }
}

/// One element under construction.
struct Frame {
    name: String,
    entries: Vec<(String, XmlNode)>,
    text: String,
}

impl Frame {
    fn into_node(self) -> XmlNode {
        if self.entries.is_empty() {
            XmlNode::Text(self.text)
        } else if self.text.is_empty() {
            XmlNode::Object(self.entries)
        } else {
            let mut entries = self.entries;
            entries.push((TEXT_KEY.to_string(), XmlNode::Text(self.text)));
            XmlNode::Object(entries)
        }
    }
}

/// Convert an XML document into a normalized node tree.
///
/// The result is an object with a single entry: the root element's local
/// name mapped to its normalized content. Namespace prefixes are stripped
/// from element and attribute names. Malformed input (including non-UTF-8
/// bytes) fails with [`MwsError::MalformedResponse`].
pub fn normalize(xml: &[u8]) -> Result<XmlNode, MwsError> {
    let text = std::str::from_utf8(xml).map_err(|e| malformed(format!("invalid UTF-8: {e}")))?;

    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, XmlNode)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                if stack.is_empty() && root.is_some() {
                    return Err(malformed("multiple root elements"));
                }
                stack.push(open_frame(&start)?);
            }
            Ok(Event::Empty(start)) => {
                if stack.is_empty() && root.is_some() {
                    return Err(malformed("multiple root elements"));
                }
                let frame = open_frame(&start)?;
                close_frame(frame, &mut stack, &mut root);
            }
            Ok(Event::Text(t)) => {
                let value = t.unescape().map_err(malformed)?;
                append_text(&mut stack, value.as_ref())?;
            }
            Ok(Event::CData(cdata)) => {
                let bytes = cdata.into_inner();
                let value = std::str::from_utf8(&bytes)
                    .map_err(|e| malformed(format!("invalid UTF-8 in CDATA: {e}")))?;
                append_text(&mut stack, value)?;
            }
            Ok(Event::End(_)) => {
                let frame = stack.pop().ok_or_else(|| malformed("unbalanced end tag"))?;
                close_frame(frame, &mut stack, &mut root);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(malformed(format!(
                    "XML parse error at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
        }
    }

    if !stack.is_empty() {
        return Err(malformed("unexpected end of document"));
    }

    let (name, node) = root.ok_or_else(|| malformed("no root element"))?;
    Ok(XmlNode::Object(vec![(name, node)]))
}

fn open_frame(start: &BytesStart<'_>) -> Result<Frame, MwsError> {
    let name = local_name(start.name().as_ref())?;

    let mut attributes: Vec<(String, XmlNode)> = Vec::new();
    let mut language: Option<String> = None;

    for attr in start.attributes() {
        let attr: Attribute = attr.map_err(malformed)?;
        let value = attr.unescape_value().map_err(malformed)?.into_owned();

        if attr.key.as_ref() == b"xml:lang" && LOCALE_LANGUAGES.contains(&value.as_str()) {
            language = Some(value);
            continue;
        }

        let attr_name = local_name(attr.key.as_ref())?;
        attributes.push((attr_name, XmlNode::Text(value)));
    }

    let mut entries: Vec<(String, XmlNode)> = Vec::new();
    if !attributes.is_empty() {
        entries.push((ATTRIBUTES_KEY.to_string(), XmlNode::Object(attributes)));
    }
    if let Some(language) = language {
        entries.push(("Language".to_string(), XmlNode::Text(language)));
    }

    Ok(Frame {
        name,
        entries,
        text: String::new(),
    })
}

fn close_frame(frame: Frame, stack: &mut Vec<Frame>, root: &mut Option<(String, XmlNode)>) {
    let name = frame.name.clone();
    let node = frame.into_node();

    match stack.last_mut() {
        Some(parent) => insert_child(&mut parent.entries, name, node),
        None => *root = Some((name, node)),
    }
}

fn append_text(stack: &mut [Frame], value: &str) -> Result<(), MwsError> {
    match stack.last_mut() {
        Some(frame) => {
            frame.text.push_str(value);
            Ok(())
        }
        None if value.trim().is_empty() => Ok(()),
        None => Err(malformed("text content outside of root element")),
    }
}

/// Insert a finished child, accumulating repeated names into arrays and
/// wrapping names from the multiplicity table even on first occurrence.
fn insert_child(entries: &mut Vec<(String, XmlNode)>, name: String, node: XmlNode) {
    if let Some((_, existing)) = entries.iter_mut().find(|(key, _)| *key == name) {
        match existing {
            XmlNode::Array(items) => items.push(node),
            _ => {
                let first = std::mem::replace(existing, XmlNode::Array(Vec::new()));
                if let XmlNode::Array(items) = existing {
                    items.push(first);
                    items.push(node);
                }
            }
        }
    } else if is_repeatable(&name) {
        entries.push((name, XmlNode::Array(vec![node])));
    } else {
        entries.push((name, node));
    }
}

fn local_name(qname: &[u8]) -> Result<String, MwsError> {
    let local = match qname.iter().position(|b| *b == b':') {
        Some(index) => &qname[index + 1..],
        None => qname,
    };
    std::str::from_utf8(local)
        .map(str::to_string)
        .map_err(|e| malformed(format!("invalid UTF-8 in tag name: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_repeatable_child_becomes_one_element_array() {
        let doc = normalize(b"<Orders><Order><Id>1</Id></Order></Orders>").unwrap();

        let expected = XmlNode::object([(
            "Orders",
            XmlNode::object([(
                "Order",
                XmlNode::array([XmlNode::object([("Id", XmlNode::text("1"))])]),
            )]),
        )]);
        assert_eq!(doc, expected);
    }

    #[test]
    fn test_two_children_keep_document_order() {
        let doc = normalize(
            b"<Orders><Order><Id>1</Id></Order><Order><Id>2</Id></Order></Orders>",
        )
        .unwrap();

        let orders = doc.at(&["Orders", "Order"]).unwrap().as_array().unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].text_of("Id"), Some("1"));
        assert_eq!(orders[1].text_of("Id"), Some("2"));
    }

    #[test]
    fn test_zero_occurrences_is_absent_not_scalar() {
        let doc = normalize(b"<Orders></Orders>").unwrap();
        assert!(doc.at(&["Orders", "Order"]).is_none());
    }

    #[test]
    fn test_repeated_unlisted_name_still_accumulates() {
        let doc = normalize(b"<R><Thing>a</Thing><Thing>b</Thing></R>").unwrap();
        let things = doc.at(&["R", "Thing"]).unwrap().as_array().unwrap();
        assert_eq!(things.len(), 2);
    }

    #[test]
    fn test_attributes_are_kept_separate_from_children() {
        let doc = normalize(
            br#"<Result status="Success" Id="B00X"><Value>9</Value></Result>"#,
        )
        .unwrap();
        let result = doc.get("Result").unwrap();

        assert_eq!(result.attribute("status"), Some("Success"));
        assert_eq!(result.attribute("Id"), Some("B00X"));
        assert_eq!(result.text_of("Value"), Some("9"));
    }

    #[test]
    fn test_text_with_attributes_uses_reserved_key() {
        let doc = normalize(br#"<Price currency="USD">19.99</Price>"#).unwrap();
        let price = doc.get("Price").unwrap();

        assert_eq!(price.attribute("currency"), Some("USD"));
        assert_eq!(price.text_of(TEXT_KEY), Some("19.99"));
    }

    #[test]
    fn test_namespace_prefixes_are_stripped() {
        let doc = normalize(
            b"<ns2:Envelope><ns2:Inner>x</ns2:Inner></ns2:Envelope>",
        )
        .unwrap();
        assert_eq!(doc.at(&["Envelope", "Inner"]).unwrap().as_text(), Some("x"));
    }

    #[test]
    fn test_locale_attribute_becomes_language_element() {
        let doc = normalize(
            br#"<ns2:ItemAttributes xml:lang="de-DE"><Title>Buch</Title></ns2:ItemAttributes>"#,
        )
        .unwrap();
        let attrs = doc.get("ItemAttributes").unwrap();

        assert_eq!(attrs.text_of("Language"), Some("de-DE"));
        assert_eq!(attrs.text_of("Title"), Some("Buch"));
        // The marker never shows up as an attribute.
        assert_eq!(attrs.attribute("lang"), None);
    }

    #[test]
    fn test_unknown_lang_value_stays_an_attribute() {
        let doc = normalize(br#"<Note xml:lang="xx-XX">hi</Note>"#).unwrap();
        let note = doc.get("Note").unwrap();
        assert_eq!(note.attribute("lang"), Some("xx-XX"));
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let err = normalize(b"<Orders><Order></Orders>").unwrap_err();
        assert!(matches!(err, MwsError::MalformedResponse { .. }));

        let err = normalize(b"not xml at all").unwrap_err();
        assert!(matches!(err, MwsError::MalformedResponse { .. }));
    }

    #[test]
    fn test_non_utf8_is_an_error() {
        let err = normalize(&[0x3c, 0x61, 0x3e, 0xff, 0xfe, 0x3c, 0x2f, 0x61, 0x3e]).unwrap_err();
        assert!(matches!(err, MwsError::MalformedResponse { .. }));
    }

    #[test]
    fn test_nested_collection_paths_are_wrapped() {
        let doc = normalize(
            b"<Response><Result><Products><Product><Sku>A</Sku></Product></Products></Result></Response>",
        )
        .unwrap();
        let products = doc
            .at(&["Response", "Result", "Products", "Product"])
            .unwrap();
        assert_eq!(products.as_array().unwrap().len(), 1);
    }
}
