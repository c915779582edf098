use crate::document::Document;
use crate::tokenizer::is_void_element;
use crate::types::{Id, NodeKind};

/// Serializes the subtree below `id` (inclusive, except for the document node itself).
pub fn to_html(doc: &Document, id: Id) -> String {
    let mut out = String::new();
    write_node(doc, id, &mut out);
    out
}

fn write_node(doc: &Document, id: Id, out: &mut String) {
    match doc.kind(id) {
        Some(NodeKind::Document { doctype }) => {
            if let Some(dt) = doctype {
                out.push_str("<!");
                out.push_str(dt);
                out.push('>');
            }
            for &c in doc.children(id) {
                write_node(doc, c, out);
            }
        }
        Some(NodeKind::Element { name, attributes }) => {
            out.push('<');
            out.push_str(name);
            for (k, v) in attributes {
                out.push(' ');
                out.push_str(k);
                if let Some(v) = v {
                    out.push_str("=\"");
                    escape_into(v, true, out);
                    out.push('"');
                }
            }
            out.push('>');
            if is_void_element(name) {
                return;
            }
            let raw = name == "script" || name == "style";
            for &c in doc.children(id) {
                match doc.kind(c) {
                    Some(NodeKind::Text { text }) if raw => out.push_str(text),
                    _ => write_node(doc, c, out),
                }
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        Some(NodeKind::Text { text }) => escape_into(text, false, out),
        Some(NodeKind::Comment { text }) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        None => {}
    }
}

fn escape_into(s: &str, attribute: bool, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_document;

    #[test]
    fn serializes_what_it_parses() {
        let src = r#"<div class="card"><button type="submit" disabled>Go &amp; see</button><br></div>"#;
        let doc = parse_document(src);
        assert_eq!(to_html(&doc, Document::ROOT), src);
    }

    #[test]
    fn escapes_attribute_quotes() {
        let mut doc = Document::new();
        let input = doc.create_element("input");
        doc.append_child(Document::ROOT, input).unwrap();
        doc.set_attr(input, "placeholder", "say \"hi\"").unwrap();
        assert_eq!(
            to_html(&doc, Document::ROOT),
            r#"<input placeholder="say &quot;hi&quot;">"#
        );
    }
}
