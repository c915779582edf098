use crate::matching::matches_any;
use crate::syntax::{SelectorError, SelectorList, parse_selector_list};
use html::{Document, Id};

/// Elements below `scope` matching `list`, in document order, each once.
pub fn select_all(doc: &Document, scope: Id, list: &SelectorList) -> Vec<Id> {
    doc.descendants(scope)
        .filter(|&n| matches_any(doc, n, list))
        .collect()
}

pub fn select_first(doc: &Document, scope: Id, list: &SelectorList) -> Option<Id> {
    doc.descendants(scope).find(|&n| matches_any(doc, n, list))
}

pub fn query_selector_all(
    doc: &Document,
    scope: Id,
    selectors: &str,
) -> Result<Vec<Id>, SelectorError> {
    let list = parse_selector_list(selectors)?;
    Ok(select_all(doc, scope, &list))
}

pub fn query_selector(
    doc: &Document,
    scope: Id,
    selectors: &str,
) -> Result<Option<Id>, SelectorError> {
    let list = parse_selector_list(selectors)?;
    Ok(select_first(doc, scope, &list))
}

#[cfg(test)]
mod tests {
    use super::*;
    use html::parse_document;

    #[test]
    fn results_are_in_document_order_without_duplicates() {
        let doc = parse_document(
            r#"<div class="card stat-item" id="a"></div><div class="feature-card" id="b"></div><div class="card" id="c"></div>"#,
        );
        let found = query_selector_all(&doc, Document::ROOT, ".card, .feature-card, .stat-item")
            .unwrap();
        let ids: Vec<_> = found.iter().map(|&n| doc.attr(n, "id").unwrap()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn scoped_queries_only_search_descendants() {
        let doc = parse_document(
            r#"<button type="submit" id="outside"></button><form><button type="submit" id="inside"></button></form>"#,
        );
        let form = query_selector(&doc, Document::ROOT, "form").unwrap().unwrap();
        let button = query_selector(&doc, form, r#"button[type="submit"]"#)
            .unwrap()
            .unwrap();
        assert_eq!(doc.attr(button, "id"), Some("inside"));
        assert!(query_selector(&doc, button, "button").unwrap().is_none());
    }

    #[test]
    fn invalid_selectors_are_errors() {
        let doc = Document::new();
        assert!(query_selector(&doc, Document::ROOT, "[").is_err());
    }
}
