//! Navigation state machine: key events in, selection/breadcrumb/expansion
//! changes plus effects out.
//!
//! Invariants maintained here: `selected` always indexes the current visible
//! view (wraparound, never clamped out of range); the breadcrumb is always
//! the path of an existing category; a pending confirmation exists exactly
//! while the mode is `ConfirmPending`.

use std::collections::HashSet;

use crate::confirm::{self, GateDecision};
use crate::decoder::KeyEvent;
use crate::menu::{ActionId, MenuNode, MenuTree, NodePath};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavMode {
    #[default]
    Idle,
    ConfirmPending,
    Exiting,
}

/// What the controller asks the runtime to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Activate(ActionId),
    ToggleSet { key: String, value: bool },
    Expand(NodePath),
    Collapse(NodePath),
    NavigateBack,
    Exit,
    RequestConfirmation(ActionId),
}

/// A destructive activation waiting on the yes/no prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    pub action: ActionId,
    pub label: &'static str,
}

/// One visible row of the current view. Children of inline-expanded
/// categories are spliced in at depth 1 right after their parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRow {
    pub path: NodePath,
    pub depth: usize,
}

/// Flatten the view under `breadcrumb`: direct children, with each expanded
/// inline category's children following it.
pub fn visible_rows(
    tree: &MenuTree,
    breadcrumb: &[usize],
    expanded: &HashSet<NodePath>,
) -> Vec<ViewRow> {
    let mut rows = Vec::new();
    for (index, child) in tree.children_of(breadcrumb).iter().enumerate() {
        let mut path: NodePath = breadcrumb.to_vec();
        path.push(index);
        let is_expanded = matches!(child, MenuNode::Category { expandable: true, .. })
            && expanded.contains(&path);
        rows.push(ViewRow {
            path: path.clone(),
            depth: 0,
        });
        if is_expanded {
            for (child_index, _) in tree.children_of(&path).iter().enumerate() {
                let mut child_path = path.clone();
                child_path.push(child_index);
                rows.push(ViewRow {
                    path: child_path,
                    depth: 1,
                });
            }
        }
    }
    rows
}

#[derive(Debug, Default)]
pub struct NavigationController {
    mode: NavMode,
    breadcrumb: NodePath,
    selected: usize,
    expanded: HashSet<NodePath>,
    pending: Option<PendingConfirmation>,
}

impl NavigationController {
    /// Fresh session: root view, first row selected. Nothing persists
    /// between invocations by design.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> NavMode {
        self.mode
    }

    pub fn breadcrumb(&self) -> &[usize] {
        &self.breadcrumb
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn expanded(&self) -> &HashSet<NodePath> {
        &self.expanded
    }

    pub fn pending(&self) -> Option<&PendingConfirmation> {
        self.pending.as_ref()
    }

    pub fn view(&self, tree: &MenuTree) -> Vec<ViewRow> {
        visible_rows(tree, &self.breadcrumb, &self.expanded)
    }

    /// Feed one key event through the state machine.
    pub fn handle(&mut self, key: &KeyEvent, tree: &MenuTree) -> Vec<Effect> {
        match self.mode {
            NavMode::Exiting => Vec::new(),
            NavMode::ConfirmPending => self.handle_confirm(key),
            NavMode::Idle => self.handle_idle(key, tree),
        }
    }

    fn handle_confirm(&mut self, key: &KeyEvent) -> Vec<Effect> {
        match key {
            KeyEvent::Char('y') | KeyEvent::Char('Y') | KeyEvent::Enter => {
                // The held effect is forwarded exactly once.
                let pending = self.pending.take();
                self.mode = NavMode::Idle;
                match pending {
                    Some(p) => vec![Effect::Activate(p.action)],
                    None => Vec::new(),
                }
            }
            KeyEvent::Char('n') | KeyEvent::Char('N') | KeyEvent::Escape => {
                self.pending = None;
                self.mode = NavMode::Idle;
                Vec::new()
            }
            // Anything else leaves the prompt up and the effect unapplied.
            _ => Vec::new(),
        }
    }

    fn handle_idle(&mut self, key: &KeyEvent, tree: &MenuTree) -> Vec<Effect> {
        let view = self.view(tree);
        match key {
            KeyEvent::Up => {
                self.move_up(view.len());
                Vec::new()
            }
            KeyEvent::Down => {
                self.move_down(view.len());
                Vec::new()
            }
            KeyEvent::Home => {
                self.selected = 0;
                Vec::new()
            }
            KeyEvent::End => {
                self.selected = view.len().saturating_sub(1);
                Vec::new()
            }
            KeyEvent::Left | KeyEvent::Escape | KeyEvent::Char('b') | KeyEvent::Char('B') => {
                self.navigate_back()
            }
            KeyEvent::Char('q') | KeyEvent::Char('Q') => {
                self.mode = NavMode::Exiting;
                vec![Effect::Exit]
            }
            KeyEvent::Enter => self.activate_selected(tree, Activation::Primary),
            KeyEvent::Space => self.activate_selected(tree, Activation::Secondary),
            KeyEvent::Right => self.activate_selected(tree, Activation::DescendOnly),
            KeyEvent::Number(n) => self.activate_number(tree, *n),
            // Timeout/Unknown (and keys without an Idle meaning) never move state.
            _ => Vec::new(),
        }
    }

    fn move_up(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        if self.selected == 0 {
            self.selected = len - 1;
        } else {
            self.selected -= 1;
        }
    }

    fn move_down(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1) % len;
    }

    /// Pop one breadcrumb level. At the root this is a no-op: only `q` exits.
    fn navigate_back(&mut self) -> Vec<Effect> {
        if self.breadcrumb.is_empty() {
            return Vec::new();
        }
        self.breadcrumb.pop();
        self.selected = 0;
        vec![Effect::NavigateBack]
    }

    fn activate_number(&mut self, tree: &MenuTree, n: u8) -> Vec<Effect> {
        if !(1..=9).contains(&n) {
            return Vec::new();
        }
        let index = (n - 1) as usize;
        if index >= self.view(tree).len() {
            return Vec::new();
        }
        // A number shortcut selects the row, then activates it like Enter.
        self.selected = index;
        self.activate_selected(tree, Activation::Primary)
    }

    fn activate_selected(&mut self, tree: &MenuTree, how: Activation) -> Vec<Effect> {
        let view = self.view(tree);
        let Some(row) = view.get(self.selected) else {
            return Vec::new();
        };
        let Some(node) = tree.node_at(&row.path) else {
            return Vec::new();
        };
        if node.is_disabled() {
            return Vec::new();
        }

        match node {
            MenuNode::Category { expandable: true, .. } => {
                if how == Activation::DescendOnly && !self.expanded.contains(&row.path) {
                    // Right arrow unfolds but never folds.
                    return self.toggle_expansion(tree, row.path.clone());
                }
                if how == Activation::DescendOnly {
                    return Vec::new();
                }
                self.toggle_expansion(tree, row.path.clone())
            }
            MenuNode::Category { .. } => {
                if how == Activation::Secondary {
                    return Vec::new();
                }
                self.breadcrumb = row.path.clone();
                self.selected = 0;
                Vec::new()
            }
            MenuNode::Toggle { config_key, value, .. } => {
                if how == Activation::DescendOnly {
                    return Vec::new();
                }
                vec![Effect::ToggleSet {
                    key: (*config_key).to_string(),
                    value: !*value,
                }]
            }
            MenuNode::Item { action, label, .. } => {
                if how != Activation::Primary {
                    return Vec::new();
                }
                match confirm::guard(Effect::Activate(*action), node.is_destructive()) {
                    GateDecision::Pass(effect) => vec![effect],
                    GateDecision::Hold(_) => {
                        self.pending = Some(PendingConfirmation {
                            action: *action,
                            label: *label,
                        });
                        self.mode = NavMode::ConfirmPending;
                        vec![Effect::RequestConfirmation(*action)]
                    }
                }
            }
        }
    }

    fn toggle_expansion(&mut self, tree: &MenuTree, path: NodePath) -> Vec<Effect> {
        if self.expanded.remove(&path) {
            // Collapsing can shrink the view; keep the selection valid.
            let len = self.view(tree).len();
            if self.selected >= len {
                self.selected = len.saturating_sub(1);
            }
            vec![Effect::Collapse(path)]
        } else {
            self.expanded.insert(path.clone());
            vec![Effect::Expand(path)]
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Activation {
    /// Enter: descend, toggle, expand, or activate.
    Primary,
    /// Space: toggle or expand only.
    Secondary,
    /// Right arrow: descend into categories, unfold inline ones.
    DescendOnly,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::test_support::sample_tree;

    fn controller() -> (NavigationController, MenuTree) {
        (NavigationController::new(), sample_tree())
    }

    #[test]
    fn opens_at_root_with_first_row_selected() {
        let (nav, tree) = controller();
        assert_eq!(nav.mode(), NavMode::Idle);
        assert!(nav.breadcrumb().is_empty());
        assert_eq!(nav.selected(), 0);
        assert_eq!(nav.view(&tree).len(), 4);
    }

    #[test]
    fn down_wraps_after_view_length_presses() {
        let (mut nav, tree) = controller();
        let len = nav.view(&tree).len();
        for start in 0..len {
            nav.handle(&KeyEvent::Down, &tree);
            let expected = (start + 1) % len;
            assert_eq!(nav.selected(), expected);
        }
        // len presses from index 0 land back on 0.
        assert_eq!(nav.selected(), 0);
    }

    #[test]
    fn up_from_first_row_wraps_to_last() {
        let (mut nav, tree) = controller();
        nav.handle(&KeyEvent::Up, &tree);
        assert_eq!(nav.selected(), nav.view(&tree).len() - 1);
    }

    #[test]
    fn home_and_end_jump() {
        let (mut nav, tree) = controller();
        nav.handle(&KeyEvent::End, &tree);
        assert_eq!(nav.selected(), nav.view(&tree).len() - 1);
        nav.handle(&KeyEvent::Home, &tree);
        assert_eq!(nav.selected(), 0);
    }

    #[test]
    fn enter_on_category_descends_and_resets_selection() {
        let (mut nav, tree) = controller();
        nav.handle(&KeyEvent::Down, &tree);
        nav.handle(&KeyEvent::Home, &tree);
        let effects = nav.handle(&KeyEvent::Enter, &tree);
        assert!(effects.is_empty());
        assert_eq!(nav.breadcrumb(), &[0]);
        assert_eq!(nav.selected(), 0);
    }

    #[test]
    fn escape_pops_one_level_and_is_noop_at_root() {
        let (mut nav, tree) = controller();
        nav.handle(&KeyEvent::Enter, &tree); // into Settings
        assert_eq!(nav.breadcrumb(), &[0]);
        let effects = nav.handle(&KeyEvent::Escape, &tree);
        assert_eq!(effects, vec![Effect::NavigateBack]);
        assert!(nav.breadcrumb().is_empty());
        // At the root, Escape must not exit.
        let effects = nav.handle(&KeyEvent::Escape, &tree);
        assert!(effects.is_empty());
        assert_eq!(nav.mode(), NavMode::Idle);
    }

    #[test]
    fn b_key_also_navigates_back() {
        let (mut nav, tree) = controller();
        nav.handle(&KeyEvent::Enter, &tree);
        let effects = nav.handle(&KeyEvent::Char('B'), &tree);
        assert_eq!(effects, vec![Effect::NavigateBack]);
        assert!(nav.breadcrumb().is_empty());
    }

    #[test]
    fn q_exits_from_any_depth() {
        let (mut nav, tree) = controller();
        nav.handle(&KeyEvent::Enter, &tree); // Settings
        nav.handle(&KeyEvent::Down, &tree); // Advanced
        nav.handle(&KeyEvent::Enter, &tree); // expand inline
        let effects = nav.handle(&KeyEvent::Char('q'), &tree);
        assert_eq!(effects, vec![Effect::Exit]);
        assert_eq!(nav.mode(), NavMode::Exiting);
        // Once exiting, further keys do nothing.
        assert!(nav.handle(&KeyEvent::Enter, &tree).is_empty());
    }

    #[test]
    fn space_on_toggle_emits_toggle_set() {
        let (mut nav, tree) = controller();
        nav.handle(&KeyEvent::Enter, &tree); // into Settings
        let effects = nav.handle(&KeyEvent::Space, &tree);
        assert_eq!(
            effects,
            vec![Effect::ToggleSet {
                key: "ui.animations".to_string(),
                value: true,
            }]
        );
    }

    #[test]
    fn enter_on_toggle_behaves_like_space() {
        let (mut nav, tree) = controller();
        nav.handle(&KeyEvent::Enter, &tree);
        let effects = nav.handle(&KeyEvent::Enter, &tree);
        assert!(matches!(effects.as_slice(), [Effect::ToggleSet { .. }]));
    }

    #[test]
    fn expandable_category_expands_inline_and_collapses() {
        let (mut nav, tree) = controller();
        nav.handle(&KeyEvent::Enter, &tree); // Settings: [Animations, Advanced]
        assert_eq!(nav.view(&tree).len(), 2);
        nav.handle(&KeyEvent::Down, &tree); // select Advanced
        let effects = nav.handle(&KeyEvent::Space, &tree);
        assert_eq!(effects, vec![Effect::Expand(vec![0, 1])]);
        let view = nav.view(&tree);
        assert_eq!(view.len(), 3);
        assert_eq!(view[2].depth, 1);
        // Breadcrumb unchanged: expansion is inline, not a descent.
        assert_eq!(nav.breadcrumb(), &[0]);
        let effects = nav.handle(&KeyEvent::Space, &tree);
        assert_eq!(effects, vec![Effect::Collapse(vec![0, 1])]);
        assert_eq!(nav.view(&tree).len(), 2);
    }

    #[test]
    fn collapse_clamps_selection_into_view() {
        let (mut nav, tree) = controller();
        nav.handle(&KeyEvent::Enter, &tree); // Settings
        nav.handle(&KeyEvent::Down, &tree); // Advanced
        nav.handle(&KeyEvent::Space, &tree); // expand -> 3 rows
        nav.handle(&KeyEvent::End, &tree); // select spliced child
        assert_eq!(nav.selected(), 2);
        // Collapse via number shortcut on the parent row.
        nav.handle(&KeyEvent::Number(2), &tree);
        assert!(nav.selected() < nav.view(&tree).len());
    }

    #[test]
    fn destructive_item_requires_confirmation() {
        let (mut nav, tree) = controller();
        nav.handle(&KeyEvent::Down, &tree); // Restore backup
        let effects = nav.handle(&KeyEvent::Enter, &tree);
        assert_eq!(
            effects,
            vec![Effect::RequestConfirmation(ActionId("backup.restore"))]
        );
        assert_eq!(nav.mode(), NavMode::ConfirmPending);
        assert_eq!(nav.pending().unwrap().label, "Restore backup");
    }

    #[test]
    fn confirm_yes_forwards_held_effect_once() {
        let (mut nav, tree) = controller();
        nav.handle(&KeyEvent::Down, &tree);
        nav.handle(&KeyEvent::Enter, &tree);
        let effects = nav.handle(&KeyEvent::Char('y'), &tree);
        assert_eq!(effects, vec![Effect::Activate(ActionId("backup.restore"))]);
        assert_eq!(nav.mode(), NavMode::Idle);
        assert!(nav.pending().is_none());
    }

    #[test]
    fn confirm_decline_discards_held_effect() {
        let (mut nav, tree) = controller();
        nav.handle(&KeyEvent::Down, &tree);
        nav.handle(&KeyEvent::Enter, &tree);
        let effects = nav.handle(&KeyEvent::Escape, &tree);
        assert!(effects.is_empty());
        assert_eq!(nav.mode(), NavMode::Idle);
        assert!(nav.pending().is_none());
    }

    #[test]
    fn other_keys_while_pending_never_apply_the_effect() {
        let (mut nav, tree) = controller();
        nav.handle(&KeyEvent::Down, &tree);
        nav.handle(&KeyEvent::Enter, &tree);
        for key in [
            KeyEvent::Up,
            KeyEvent::Down,
            KeyEvent::Space,
            KeyEvent::Char('x'),
            KeyEvent::Number(3),
            KeyEvent::Timeout,
        ] {
            let effects = nav.handle(&key, &tree);
            assert!(effects.is_empty(), "{key:?} must not resolve the prompt");
            assert_eq!(nav.mode(), NavMode::ConfirmPending);
        }
        // Still resolvable afterwards.
        let effects = nav.handle(&KeyEvent::Enter, &tree);
        assert_eq!(effects, vec![Effect::Activate(ActionId("backup.restore"))]);
    }

    #[test]
    fn number_shortcut_selects_and_activates() {
        let (mut nav, tree) = controller();
        let effects = nav.handle(&KeyEvent::Number(2), &tree);
        // Row 2 is the destructive restore item: same confirmation rule.
        assert_eq!(
            effects,
            vec![Effect::RequestConfirmation(ActionId("backup.restore"))]
        );
        assert_eq!(nav.selected(), 1);
    }

    #[test]
    fn number_zero_and_out_of_range_are_noops() {
        let (mut nav, tree) = controller();
        assert!(nav.handle(&KeyEvent::Number(0), &tree).is_empty());
        assert!(nav.handle(&KeyEvent::Number(9), &tree).is_empty());
        assert_eq!(nav.selected(), 0);
    }

    #[test]
    fn disabled_rows_never_activate() {
        let (mut nav, tree) = controller();
        nav.handle(&KeyEvent::End, &tree); // "AI assistant" (coming soon)
        let effects = nav.handle(&KeyEvent::Enter, &tree);
        assert!(effects.is_empty());
        assert_eq!(nav.mode(), NavMode::Idle);
    }

    #[test]
    fn timeout_and_unknown_change_nothing() {
        let (mut nav, tree) = controller();
        nav.handle(&KeyEvent::Down, &tree);
        let before = (nav.selected(), nav.breadcrumb().to_vec());
        assert!(nav.handle(&KeyEvent::Timeout, &tree).is_empty());
        assert!(nav
            .handle(&KeyEvent::Unknown(vec![0x1b, b'[']), &tree)
            .is_empty());
        assert_eq!((nav.selected(), nav.breadcrumb().to_vec()), before);
    }

    #[test]
    fn right_descends_into_category_and_left_backs_out() {
        let (mut nav, tree) = controller();
        let effects = nav.handle(&KeyEvent::Right, &tree);
        assert!(effects.is_empty());
        assert_eq!(nav.breadcrumb(), &[0]);
        let effects = nav.handle(&KeyEvent::Left, &tree);
        assert_eq!(effects, vec![Effect::NavigateBack]);
        assert!(nav.breadcrumb().is_empty());
    }
}
