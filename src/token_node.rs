use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use once_cell::unsync::OnceCell;

use crate::error::TokenError;
use crate::token::{ParserToken, TokenKind};

/// A token viewed as a node of a generic tree.
///
/// A node is its root token plus the path of child indices leading to it; the
/// parent is found by dropping the last index. Child nodes are created on first
/// use and cached. The "setters" never modify a tree, they rebuild every token from
/// the changed one up to the root and return the node at the same path in the new
/// tree.
#[derive(Clone)]
pub struct TokenNode {
    root: Rc<ParserToken>,
    path: Vec<usize>,
    children: OnceCell<Vec<TokenNode>>,
}

pub const KIND: &str = "kind";
pub const TEXT: &str = "text";

impl TokenNode {
    pub fn new(root: ParserToken) -> Self {
        Self::at(Rc::new(root), vec![])
    }

    fn at(root: Rc<ParserToken>, path: Vec<usize>) -> Self {
        Self {
            root,
            path,
            children: OnceCell::new(),
        }
    }

    pub fn token(&self) -> &ParserToken {
        self.path
            .iter()
            .fold(self.root.as_ref(), |token, &i| &token.children()[i])
    }

    /// Child indices from the root, empty for the root itself.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    pub fn index(&self) -> Option<usize> {
        self.path.last().copied()
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    pub fn root(&self) -> TokenNode {
        Self::at(Rc::clone(&self.root), vec![])
    }

    pub fn parent(&self) -> Option<TokenNode> {
        let (_, parent_path) = self.path.split_last()?;
        Some(Self::at(Rc::clone(&self.root), parent_path.to_vec()))
    }

    pub fn children(&self) -> &[TokenNode] {
        self.children.get_or_init(|| {
            (0..self.token().children().len())
                .map(|i| {
                    let mut path = self.path.clone();
                    path.push(i);
                    Self::at(Rc::clone(&self.root), path)
                })
                .collect()
        })
    }

    fn sibling(&self, offset: isize) -> Option<TokenNode> {
        let index = self.index()?.checked_add_signed(offset)?;
        self.parent()?.children().get(index).cloned()
    }

    pub fn previous_sibling(&self) -> Option<TokenNode> {
        self.sibling(-1)
    }

    pub fn next_sibling(&self) -> Option<TokenNode> {
        self.sibling(1)
    }

    pub fn kind(&self) -> TokenKind {
        self.token().kind()
    }

    pub fn text(&self) -> &str {
        self.token().text()
    }

    pub fn attributes(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([(KIND, self.kind().to_string()), (TEXT, self.text().to_string())])
    }

    /// All nodes below this one, in pre-order.
    pub fn descendants(&self) -> Vec<TokenNode> {
        let mut out = vec![];
        for child in self.children() {
            out.push(child.clone());
            out.extend(child.descendants());
        }
        out
    }

    /// The first of this node and its descendants, in pre-order, satisfying
    /// `predicate`.
    pub fn find<F>(&self, predicate: F) -> Option<TokenNode>
    where
        F: Fn(&TokenNode) -> bool,
    {
        if predicate(self) {
            return Some(self.clone());
        }
        self.descendants().into_iter().find(|n| predicate(n))
    }

    /// Replaces the token's children, its text becoming theirs concatenated.
    pub fn set_children(&self, children: Vec<ParserToken>) -> Result<TokenNode, TokenError> {
        let replacement = self.token().clone().set_children(children)?;
        self.replace(replacement)
    }

    /// Only `text` can be set.
    pub fn set_attributes<'a, I>(&self, attributes: I) -> Result<TokenNode, TokenError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut token = self.token().clone();
        for (name, value) in attributes {
            if name != TEXT {
                return Err(TokenError::UnknownAttribute {
                    name: name.to_string(),
                });
            }
            token = token.set_text(value);
        }
        self.replace(token)
    }

    fn replace(&self, replacement: ParserToken) -> Result<TokenNode, TokenError> {
        if *self.token() == replacement {
            return Ok(self.clone());
        }
        let root = replace_at(&self.root, &self.path, replacement)?;
        Ok(Self::at(Rc::new(root), self.path.clone()))
    }
}

fn replace_at(
    token: &ParserToken,
    path: &[usize],
    replacement: ParserToken,
) -> Result<ParserToken, TokenError> {
    let Some((&i, rest)) = path.split_first() else {
        return Ok(replacement);
    };
    let mut children = token.children().to_vec();
    children[i] = replace_at(&children[i], rest, replacement)?;
    token.clone().set_children(children)
}

impl PartialEq for TokenNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.root, &other.root) && self.path == other.path
    }
}

impl fmt::Debug for TokenNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TokenNode")
            .field("path", &self.path)
            .field("kind", &self.kind())
            .field("text", &self.text())
            .finish()
    }
}

impl fmt::Display for TokenNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.text())
    }
}
