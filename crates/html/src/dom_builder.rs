use crate::document::Document;
use crate::tokenizer::tokenize;
use crate::types::{Id, Token};

/// Parses markup into a fresh [`Document`].
pub fn parse_document(input: &str) -> Document {
    build_document(tokenize(input))
}

pub fn build_document(tokens: Vec<Token>) -> Document {
    let mut doc = Document::new();
    let mut open_elements: Vec<Id> = Vec::new();

    for token in tokens {
        let parent = open_elements.last().copied().unwrap_or(Document::ROOT);
        match token {
            Token::Doctype(s) => doc.set_doctype(s),
            Token::Comment(c) => {
                let node = doc.create_comment(c);
                attach(&mut doc, parent, node);
            }
            Token::Text(txt) => {
                if !txt.is_empty() {
                    let node = doc.create_text(txt);
                    attach(&mut doc, parent, node);
                }
            }
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                let node = doc.create_element_with(&name, attributes);
                attach(&mut doc, parent, node);
                if !self_closing {
                    open_elements.push(node);
                }
            }
            Token::EndTag(name) => {
                let Some(pos) = open_elements
                    .iter()
                    .rposition(|&n| doc.element_name(n) == Some(name.as_str()))
                else {
                    log::trace!(target: "html.builder", "ignoring unmatched </{name}>");
                    continue;
                };
                open_elements.truncate(pos);
            }
        }
    }
    doc
}

fn attach(doc: &mut Document, parent: Id, node: Id) {
    // Nodes are fresh and the parent is an open element, so this cannot fail.
    if let Err(err) = doc.append_child(parent, node) {
        debug_assert!(false, "tree builder append failed: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_tree() {
        let doc = parse_document(
            r#"<!doctype html><form class="search-form"><input name="value"><select name="mode"><option value="plate">P</option></select></form>"#,
        );
        assert_eq!(doc.doctype(), Some("doctype html"));
        let form = doc.children(Document::ROOT)[0];
        assert_eq!(doc.element_name(form), Some("form"));
        let kids: Vec<_> = doc
            .children(form)
            .iter()
            .map(|&c| doc.element_name(c).unwrap_or("#text"))
            .collect();
        assert_eq!(kids, vec!["input", "select"]);
    }

    #[test]
    fn unmatched_end_tags_are_ignored() {
        let doc = parse_document("<div><p>a</span>b</p></div>");
        let div = doc.children(Document::ROOT)[0];
        let p = doc.children(div)[0];
        assert_eq!(doc.text_content(p), "ab");
    }

    #[test]
    fn end_tag_closes_intervening_elements() {
        let doc = parse_document("<div><b>bold</div><p>after</p>");
        let top: Vec<_> = doc
            .children(Document::ROOT)
            .iter()
            .filter_map(|&c| doc.element_name(c))
            .collect();
        assert_eq!(top, vec!["div", "p"]);
    }
}
