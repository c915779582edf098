use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector in `{0}`")]
    Empty(String),
    #[error("unexpected `{found}` at byte {at} in `{input}`")]
    Unexpected {
        input: String,
        at: usize,
        found: char,
    },
    #[error("unterminated attribute selector in `{0}`")]
    UnterminatedAttribute(String),
    #[error("dangling combinator in `{0}`")]
    DanglingCombinator(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttrOp {
    /// `[a]`
    Exists,
    /// `[a=v]`
    Equals,
    /// `[a^=v]`
    Prefix,
    /// `[a$=v]`
    Suffix,
    /// `[a*=v]`
    Substring,
    /// `[a~=v]`
    Includes,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttrSelector {
    pub name: String,
    pub op: AttrOp,
    pub value: String,
}

/// One simple selector inside a compound: `div`, `#id`, `.class`, `[a=v]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Simple {
    Universal,
    Type(String),
    Id(String),
    Class(String),
    Attr(AttrSelector),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Compound {
    pub parts: Vec<Simple>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
}

/// `a b > c` is stored right to left: `subject = c`, `ancestors = [(Child, b), (Descendant, a)]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    pub subject: Compound,
    pub ancestors: Vec<(Combinator, Compound)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorList {
    pub selectors: Vec<Selector>,
}

// input: ".button, button"
// output: SelectorList { selectors: [Class("button"), Type("button")] }
pub fn parse_selector_list(input: &str) -> Result<SelectorList, SelectorError> {
    let mut parser = Parser {
        input,
        bytes: input.as_bytes(),
        pos: 0,
    };
    let mut selectors = vec![parser.selector()?];
    loop {
        parser.skip_whitespace();
        match parser.peek() {
            None => break,
            Some(b',') => {
                parser.pos += 1;
                selectors.push(parser.selector()?);
            }
            Some(_) => return Err(parser.unexpected()),
        }
    }
    Ok(SelectorList { selectors })
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b >= 0x80
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn unexpected(&self) -> SelectorError {
        let found = self.input[self.pos..].chars().next().unwrap_or('\0');
        SelectorError::Unexpected {
            input: self.input.to_string(),
            at: self.pos,
            found,
        }
    }

    fn selector(&mut self) -> Result<Selector, SelectorError> {
        self.skip_whitespace();
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(b',') => break,
                Some(b'>') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    if matches!(self.peek(), None | Some(b',')) {
                        return Err(SelectorError::DanglingCombinator(self.input.to_string()));
                    }
                    Combinator::Child
                }
                Some(_) if had_space => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }

        let subject = compounds.pop().unwrap_or_default();
        let ancestors = combinators
            .into_iter()
            .rev()
            .zip(compounds.into_iter().rev())
            .collect();
        Ok(Selector { subject, ancestors })
    }

    fn ident(&mut self) -> &str {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_byte) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let mut parts = Vec::new();
        match self.peek() {
            Some(b'*') => {
                self.pos += 1;
                parts.push(Simple::Universal);
            }
            Some(b) if is_ident_byte(b) => {
                let name = self.ident().to_ascii_lowercase();
                parts.push(Simple::Type(name));
            }
            _ => {}
        }
        loop {
            match self.peek() {
                Some(b'#') => {
                    self.pos += 1;
                    let id = self.required_ident()?;
                    parts.push(Simple::Id(id));
                }
                Some(b'.') => {
                    self.pos += 1;
                    let class = self.required_ident()?;
                    parts.push(Simple::Class(class));
                }
                Some(b'[') => {
                    self.pos += 1;
                    parts.push(Simple::Attr(self.attribute()?));
                }
                _ => break,
            }
        }
        if parts.is_empty() {
            return Err(match self.peek() {
                None | Some(b',') => SelectorError::Empty(self.input.to_string()),
                Some(_) => self.unexpected(),
            });
        }
        Ok(Compound { parts })
    }

    fn required_ident(&mut self) -> Result<String, SelectorError> {
        let ident = self.ident().to_string();
        if ident.is_empty() {
            return Err(match self.peek() {
                Some(_) => self.unexpected(),
                None => SelectorError::Empty(self.input.to_string()),
            });
        }
        Ok(ident)
    }

    fn attribute(&mut self) -> Result<AttrSelector, SelectorError> {
        self.skip_whitespace();
        let name = self.required_ident()?.to_ascii_lowercase();
        self.skip_whitespace();
        let op = match self.peek() {
            Some(b']') => {
                self.pos += 1;
                return Ok(AttrSelector {
                    name,
                    op: AttrOp::Exists,
                    value: String::new(),
                });
            }
            Some(b'=') => {
                self.pos += 1;
                AttrOp::Equals
            }
            Some(b) if matches!(b, b'^' | b'$' | b'*' | b'~') => {
                if self.bytes.get(self.pos + 1) != Some(&b'=') {
                    return Err(self.unexpected());
                }
                self.pos += 2;
                match b {
                    b'^' => AttrOp::Prefix,
                    b'$' => AttrOp::Suffix,
                    b'*' => AttrOp::Substring,
                    _ => AttrOp::Includes,
                }
            }
            Some(_) => return Err(self.unexpected()),
            None => return Err(SelectorError::UnterminatedAttribute(self.input.to_string())),
        };
        self.skip_whitespace();
        let value = match self.peek() {
            Some(q @ (b'"' | b'\'')) => {
                let start = self.pos + 1;
                let Some(rel) = self.bytes[start..].iter().position(|&b| b == q) else {
                    return Err(SelectorError::UnterminatedAttribute(self.input.to_string()));
                };
                self.pos = start + rel + 1;
                self.input[start..start + rel].to_string()
            }
            Some(_) => self.required_ident()?,
            None => return Err(SelectorError::UnterminatedAttribute(self.input.to_string())),
        };
        self.skip_whitespace();
        if self.peek() != Some(b']') {
            return Err(SelectorError::UnterminatedAttribute(self.input.to_string()));
        }
        self.pos += 1;
        Ok(AttrSelector { name, op, value })
    }
}
