//! Lossless SVG minification.
//!
//! Works on the XML tree only: every element that can render is written back
//! with its attributes and text. What goes is markup with no visual effect:
//! comments, `<metadata>`, editor namespaces, whitespace between elements,
//! unused namespace declarations and trailing zeros in geometry values.

use std::collections::HashSet;

use roxmltree::{Document, Node, NodeType, ParsingOptions};

use super::error::EncoderError;

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";
const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Namespaces written by vector editors for their own bookkeeping.
const EDITOR_NAMESPACES: &[&str] = &[
    "http://www.inkscape.org/namespaces/inkscape",
    "http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd",
    "http://www.bohemiancoding.com/sketch/ns",
    "http://www.serif.com/",
    "http://ns.adobe.com/",
];

/// Elements whose text content is rendered or interpreted, so whitespace in
/// them is kept verbatim.
const TEXT_ELEMENTS: &[&str] = &[
    "text", "tspan", "textPath", "title", "desc", "style", "script",
];

/// Attributes holding a single number.
const NUMERIC_ATTRIBUTES: &[&str] = &[
    "x", "y", "x1", "y1", "x2", "y2", "cx", "cy", "r", "rx", "ry", "fx", "fy", "width",
    "height", "offset", "opacity", "fill-opacity", "stroke-opacity", "stop-opacity",
    "stroke-width", "stroke-miterlimit", "font-size",
];

/// Minifies an SVG document without touching anything that renders.
///
/// The result is never larger than the input: when minification does not
/// shrink the document, the input bytes are returned unchanged.
pub fn optimize_svg(file_name: &str, input: &[u8]) -> Result<Vec<u8>, EncoderError> {
    let text = std::str::from_utf8(input).map_err(|e| EncoderError::decode(file_name, e))?;
    let text = text.trim_start_matches('\u{feff}');

    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc =
        Document::parse_with_options(text, options).map_err(|e| EncoderError::decode(file_name, e))?;

    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(EncoderError::decode(
            file_name,
            format!("root element is <{}>, not <svg>", root.tag_name().name()),
        ));
    }

    let mut used = HashSet::new();
    collect_namespaces(root, &mut used);

    let mut out = String::with_capacity(input.len());
    for node in doc.root().children() {
        match node.node_type() {
            NodeType::PI => {
                if let Some(pi) = node.pi() {
                    out.push_str("<?");
                    out.push_str(pi.target);
                    if let Some(value) = pi.value {
                        out.push(' ');
                        out.push_str(value);
                    }
                    out.push_str("?>");
                }
            }
            NodeType::Element => write_element(node, false, &used, &mut out),
            _ => {}
        }
    }

    if out.len() < input.len() {
        Ok(out.into_bytes())
    } else {
        Ok(input.to_vec())
    }
}

fn is_editor_namespace(uri: Option<&str>) -> bool {
    uri.is_some_and(|uri| EDITOR_NAMESPACES.iter().any(|ns| uri.starts_with(ns)))
}

fn is_dropped_element(node: Node<'_, '_>) -> bool {
    let tag = node.tag_name();
    is_editor_namespace(tag.namespace())
        || (tag.namespace() == Some(SVG_NS) && tag.name() == "metadata")
}

fn keeps_child(child: Node<'_, '_>, preserve: bool) -> bool {
    match child.node_type() {
        NodeType::Element => !is_dropped_element(child),
        NodeType::Text => preserve || child.text().is_some_and(|t| !t.trim().is_empty()),
        _ => false,
    }
}

/// Namespace URIs referenced by the elements and attributes that are kept.
fn collect_namespaces(node: Node<'_, '_>, used: &mut HashSet<String>) {
    if let Some(ns) = node.tag_name().namespace() {
        used.insert(ns.to_string());
    }
    for attr in node.attributes() {
        if let Some(ns) = attr.namespace() {
            if !is_editor_namespace(Some(ns)) {
                used.insert(ns.to_string());
            }
        }
    }
    for child in node.children().filter(|c| c.is_element() && !is_dropped_element(*c)) {
        collect_namespaces(child, used);
    }
}

fn qualified_name(node: Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    let prefix = match namespace {
        Some(XML_NS) => Some("xml"),
        Some(uri) => node.lookup_prefix(uri),
        None => None,
    };
    match prefix {
        Some(prefix) => format!("{}:{}", prefix, local),
        None => local.to_string(),
    }
}

fn write_element(node: Node<'_, '_>, preserve: bool, used: &HashSet<String>, out: &mut String) {
    let tag = node.tag_name();
    let name = qualified_name(node, tag.namespace(), tag.name());

    out.push('<');
    out.push_str(&name);

    // Declarations first introduced on this element.
    let inherited: Vec<_> = node
        .parent_element()
        .map(|p| p.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();
    for ns in node.namespaces() {
        if ns.uri() == XML_NS
            || !used.contains(ns.uri())
            || inherited.contains(&(ns.name(), ns.uri()))
        {
            continue;
        }
        match ns.name() {
            Some(prefix) => {
                out.push_str(" xmlns:");
                out.push_str(prefix);
            }
            None => out.push_str(" xmlns"),
        }
        out.push_str("=\"");
        push_escaped(out, ns.uri(), true);
        out.push('"');
    }

    let mut preserve = preserve || TEXT_ELEMENTS.contains(&tag.name());
    for attr in node.attributes() {
        if is_editor_namespace(attr.namespace()) {
            continue;
        }
        if attr.namespace() == Some(XML_NS) && attr.name() == "space" && attr.value() == "preserve" {
            preserve = true;
        }

        let value = if attr.namespace().is_none() && NUMERIC_ATTRIBUTES.contains(&attr.name()) {
            trim_number(attr.value()).unwrap_or(attr.value())
        } else {
            attr.value()
        };

        out.push(' ');
        out.push_str(&qualified_name(node, attr.namespace(), attr.name()));
        out.push_str("=\"");
        push_escaped(out, value, true);
        out.push('"');
    }

    let children: Vec<_> = node
        .children()
        .filter(|c| keeps_child(*c, preserve))
        .collect();
    if children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in children {
        if child.is_element() {
            write_element(child, preserve, used, out);
        } else if let Some(text) = child.text() {
            push_escaped(out, text, false);
        }
    }
    out.push_str("</");
    out.push_str(&name);
    out.push('>');
}

/// Drops trailing zeros from a plain decimal: `50.000` becomes `50`.
fn trim_number(value: &str) -> Option<&str> {
    let plain = value.contains('.')
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+'))
        && value.parse::<f64>().is_ok();
    if !plain {
        return None;
    }
    let trimmed = value.trim_end_matches('0').trim_end_matches('.');
    (!trimmed.is_empty() && trimmed != "-" && trimmed != "+").then_some(trimmed)
}

fn push_escaped(out: &mut String, text: &str, attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
