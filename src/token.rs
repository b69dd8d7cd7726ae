use std::{
    cell::RefCell,
    collections::HashMap,
    fmt::{Debug, Display},
    rc::Rc,
};

/// Interned string. Tokens are only meaningful together with the table that
/// produced them. Property names and type names are stored as tokens so that
/// schema lookups compare integers instead of strings.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(u32);

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token({})", self.0)
    }
}

impl Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token({})", self.0)
    }
}

/// String interner shared by the meshes of a scene. Meshes hold it as
/// `Rc<RefCell<TokenTable>>` so that property schemas from different meshes
/// resolve names through the same table.
#[derive(Default)]
pub struct TokenTable {
    names: Vec<String>,
    index: HashMap<String, Token>,
}

/// The shared form a mesh holds on to.
pub type Tokens = Rc<RefCell<TokenTable>>;

impl TokenTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Tokens {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Intern a string, returning the existing token if it is already known.
    pub fn intern(&mut self, name: &str) -> Token {
        match self.index.get(name) {
            Some(t) => *t,
            None => {
                let t = Token(self.names.len() as u32);
                self.names.push(name.to_string());
                self.index.insert(name.to_string(), t);
                t
            }
        }
    }

    /// Look up a string without interning it.
    pub fn lookup(&self, name: &str) -> Option<Token> {
        self.index.get(name).copied()
    }

    pub fn name(&self, t: Token) -> &str {
        &self.names[t.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
