pub mod matching;
pub mod query;
pub mod syntax;

// Re-exports so other crates can just use `css::...` nicely.
pub use matching::{matches_any, matches_selector};
pub use query::{query_selector, query_selector_all, select_all, select_first};
pub use syntax::{
    AttrOp, AttrSelector, Combinator, Compound, Selector, SelectorError, SelectorList, Simple,
    parse_selector_list,
};
