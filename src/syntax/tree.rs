//! Arena syntax tree
//!
//! Nodes live in one `Vec` and refer to each other by [`NodeId`]. Parent links
//! are plain indices, so upward walks never need shared ownership.

/// Index of a node inside its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Stylesheet,
    Ruleset,
    Selector,
    Block,
    Declaration,
    Property,
    Value,
    VariableDeclaration,
    VariableName,
    MixinDeclaration,
    FunctionDeclaration,
    ParameterList,
    Parameter,
    MixinReference,
    FunctionCall,
    Arguments,
    KeywordArgument,
    Identifier,
    StringLiteral,
    Interpolation,
    Import,
    Use,
    Forward,
    Return,
    AtRule,
    Error,
}

impl NodeKind {
    /// Statements that reference another stylesheet by path.
    pub fn is_link_statement(self) -> bool {
        matches!(self, NodeKind::Import | NodeKind::Use | NodeKind::Forward)
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub offset: usize,
    pub len: usize,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

#[derive(Debug, Clone)]
pub struct SyntaxTree {
    source: String,
    nodes: Vec<Node>,
}

impl SyntaxTree {
    pub(crate) fn new(source: String) -> Self {
        Self {
            source,
            nodes: Vec::new(),
        }
    }

    pub(crate) fn alloc(&mut self, kind: NodeKind, offset: usize, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            offset,
            len: 0,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        id
    }

    pub(crate) fn set_end(&mut self, id: NodeId, end: usize) {
        let node = &mut self.nodes[id.index()];
        node.len = end.saturating_sub(node.offset);
    }

    pub(crate) fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id.index()].kind = kind;
    }

    /// The root is always the first node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    pub fn text(&self, id: NodeId) -> &str {
        let node = self.node(id);
        &self.source[node.offset..node.end()]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Strict ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&current| self.parent(current))
    }

    /// All nodes in document order.
    pub fn descendants(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![self.root()];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.children(id).iter().rev().copied());
            Some(id)
        })
    }

    pub fn child_of_kind(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.kind(child) == kind)
    }

    /// Deepest node whose span contains `offset` (end inclusive).
    ///
    /// When two siblings touch at `offset`, the one starting there wins.
    pub fn node_at_offset(&self, offset: usize) -> Option<NodeId> {
        let root = self.root();
        let root_node = self.node(root);
        if offset < root_node.offset || offset > root_node.end() {
            return None;
        }

        let mut current = root;
        'descend: loop {
            let mut fallback = None;
            for &child in self.children(current) {
                let node = self.node(child);
                if node.offset <= offset && offset < node.end() {
                    current = child;
                    continue 'descend;
                }
                if node.len > 0 && node.end() == offset {
                    fallback = Some(child);
                }
            }
            match fallback {
                Some(child) => current = child,
                None => return Some(current),
            }
        }
    }

    /// The node naming a declaration or reference.
    pub fn name_node(&self, id: NodeId) -> Option<NodeId> {
        match self.kind(id) {
            NodeKind::VariableDeclaration | NodeKind::Parameter | NodeKind::KeywordArgument => {
                self.child_of_kind(id, NodeKind::VariableName)
            }
            NodeKind::MixinDeclaration
            | NodeKind::FunctionDeclaration
            | NodeKind::MixinReference
            | NodeKind::FunctionCall => self.child_of_kind(id, NodeKind::Identifier),
            NodeKind::Declaration => self.child_of_kind(id, NodeKind::Property),
            _ => None,
        }
    }

    /// Name text of a declaration or reference.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.name_node(id).map(|name| self.text(name))
    }

    /// Value of a declaration, parameter default or return statement.
    pub fn value_node(&self, id: NodeId) -> Option<NodeId> {
        self.child_of_kind(id, NodeKind::Value)
    }

    /// Declared parameters of a mixin or function.
    pub fn parameters(&self, id: NodeId) -> Vec<NodeId> {
        self.child_of_kind(id, NodeKind::ParameterList)
            .map(|list| {
                self.children(list)
                    .iter()
                    .copied()
                    .filter(|&p| self.kind(p) == NodeKind::Parameter)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// String literals of an import/use/forward statement.
    pub fn link_literals(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.kind(child) == NodeKind::StringLiteral)
            .collect()
    }
}

/// Strips the surrounding quotes of a string literal.
pub fn unquote(text: &str) -> &str {
    let text = text.trim();
    let bytes = text.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' || first == b'\'') && first == last {
            return &text[1..text.len() - 1];
        }
    }
    text.trim_matches(|c| c == '"' || c == '\'')
}
