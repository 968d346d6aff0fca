//! Hierarchical menu model: categories, items, and config-backed toggles.

mod definition;

pub use definition::{menu_tree, MenuKind};

use crate::config_store::ConfigStore;

/// Identifies what an activated item does; resolved by the action table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionId(pub &'static str);

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index path from the root category down to a node. Doubles as the node's
/// identity: the tree structure is immutable for the whole session.
pub type NodePath = Vec<usize>;

#[derive(Debug, Clone)]
pub enum MenuNode {
    Category {
        label: &'static str,
        children: Vec<MenuNode>,
        /// Expandable categories unfold inline; others open as a new view.
        expandable: bool,
        disabled_reason: Option<&'static str>,
    },
    Item {
        label: &'static str,
        action: ActionId,
        destructive: bool,
        disabled_reason: Option<&'static str>,
    },
    Toggle {
        label: &'static str,
        config_key: &'static str,
        value: bool,
        disabled_reason: Option<&'static str>,
    },
}

impl MenuNode {
    pub fn label(&self) -> &'static str {
        match self {
            MenuNode::Category { label, .. }
            | MenuNode::Item { label, .. }
            | MenuNode::Toggle { label, .. } => label,
        }
    }

    pub fn disabled_reason(&self) -> Option<&'static str> {
        match self {
            MenuNode::Category { disabled_reason, .. }
            | MenuNode::Item { disabled_reason, .. }
            | MenuNode::Toggle { disabled_reason, .. } => *disabled_reason,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled_reason().is_some()
    }

    /// Only items can be destructive; toggles never require confirmation and
    /// categories have no effect to confirm.
    pub fn is_destructive(&self) -> bool {
        matches!(self, MenuNode::Item { destructive: true, .. })
    }
}

/// The session's menu. Structure is fixed after build; only toggle values
/// move, and only through `set_toggle`.
pub struct MenuTree {
    root: MenuNode,
}

impl MenuTree {
    pub fn new(root: MenuNode) -> Self {
        debug_assert!(matches!(root, MenuNode::Category { .. }));
        Self { root }
    }

    /// Build the tree for `kind` with toggle values hydrated from the store.
    pub fn load(kind: MenuKind, store: &dyn ConfigStore) -> Self {
        let mut tree = Self::new(menu_tree(kind));
        hydrate(&mut tree.root, store);
        tree
    }

    pub fn root(&self) -> &MenuNode {
        &self.root
    }

    pub fn node_at(&self, path: &[usize]) -> Option<&MenuNode> {
        let mut node = &self.root;
        for &index in path {
            match node {
                MenuNode::Category { children, .. } => node = children.get(index)?,
                _ => return None,
            }
        }
        Some(node)
    }

    /// Direct children of the category at `path`; empty for non-categories.
    pub fn children_of(&self, path: &[usize]) -> &[MenuNode] {
        match self.node_at(path) {
            Some(MenuNode::Category { children, .. }) => children,
            _ => &[],
        }
    }

    /// Breadcrumb labels from the root down to `path`, root label first.
    pub fn labels_for(&self, path: &[usize]) -> Vec<&'static str> {
        let mut labels = vec![self.root.label()];
        for depth in 1..=path.len() {
            if let Some(node) = self.node_at(&path[..depth]) {
                labels.push(node.label());
            }
        }
        labels
    }

    /// Flip a toggle, writing through to the store first. The in-memory
    /// value changes only when the store accepted the write, so the rendered
    /// checkbox always reflects persisted state.
    pub fn set_toggle(
        &mut self,
        path: &[usize],
        value: bool,
        store: &mut dyn ConfigStore,
    ) -> bool {
        let key = match self.node_at(path) {
            Some(MenuNode::Toggle { config_key, .. }) => *config_key,
            _ => return false,
        };
        if !store.set_bool(key, value) {
            return false;
        }
        if let Some(MenuNode::Toggle { value: current, .. }) = self.node_at_mut(path) {
            *current = value;
        }
        true
    }

    /// Path of the toggle bound to `config_key`, if any.
    pub fn toggle_path_for_key(&self, config_key: &str) -> Option<NodePath> {
        fn walk(node: &MenuNode, path: &mut NodePath, key: &str) -> Option<NodePath> {
            match node {
                MenuNode::Toggle { config_key, .. } if *config_key == key => Some(path.clone()),
                MenuNode::Category { children, .. } => {
                    for (index, child) in children.iter().enumerate() {
                        path.push(index);
                        if let Some(found) = walk(child, path, key) {
                            return Some(found);
                        }
                        path.pop();
                    }
                    None
                }
                _ => None,
            }
        }
        walk(&self.root, &mut Vec::new(), config_key)
    }

    fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut MenuNode> {
        let mut node = &mut self.root;
        for &index in path {
            match node {
                MenuNode::Category { children, .. } => node = children.get_mut(index)?,
                _ => return None,
            }
        }
        Some(node)
    }
}

fn hydrate(node: &mut MenuNode, store: &dyn ConfigStore) {
    match node {
        MenuNode::Toggle {
            config_key, value, ..
        } => {
            *value = store.get_bool(config_key, *value);
        }
        MenuNode::Category { children, .. } => {
            for child in children {
                hydrate(child, store);
            }
        }
        MenuNode::Item { .. } => {}
    }
}
