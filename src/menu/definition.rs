//! Built-in menu definitions.
//!
//! One schema drives rendering, navigation, and dispatch; toggle defaults
//! here are what an empty config store hydrates to.

use clap::ValueEnum;

use super::{ActionId, MenuNode};

/// Which root the `menu` subcommand opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum MenuKind {
    /// Full menu: settings, tools, integrations
    #[default]
    Main,
    /// Jump straight into the settings category
    Settings,
}

impl std::fmt::Display for MenuKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MenuKind::Main => write!(f, "main"),
            MenuKind::Settings => write!(f, "settings"),
        }
    }
}

pub fn menu_tree(kind: MenuKind) -> MenuNode {
    match kind {
        MenuKind::Main => main_menu(),
        MenuKind::Settings => settings_menu("Settings"),
    }
}

fn main_menu() -> MenuNode {
    MenuNode::Category {
        label: "Shellmate",
        expandable: false,
        disabled_reason: None,
        children: vec![
            settings_menu("Settings"),
            MenuNode::Category {
                label: "Tools",
                expandable: false,
                disabled_reason: None,
                children: vec![
                    MenuNode::Item {
                        label: "Create config backup",
                        action: ActionId("backup.create"),
                        destructive: false,
                        disabled_reason: None,
                    },
                    MenuNode::Item {
                        label: "Restore config backup",
                        action: ActionId("backup.restore"),
                        destructive: true,
                        disabled_reason: None,
                    },
                    MenuNode::Item {
                        label: "Clear caches",
                        action: ActionId("tools.clear_caches"),
                        destructive: true,
                        disabled_reason: None,
                    },
                    MenuNode::Item {
                        label: "System report",
                        action: ActionId("tools.system_report"),
                        destructive: false,
                        disabled_reason: None,
                    },
                ],
            },
            MenuNode::Category {
                label: "Integrations",
                expandable: false,
                disabled_reason: None,
                children: vec![
                    MenuNode::Item {
                        label: "AI assistant",
                        action: ActionId("ai.open"),
                        destructive: false,
                        disabled_reason: Some("coming soon"),
                    },
                    MenuNode::Item {
                        label: "Prompt themes",
                        action: ActionId("themes.open"),
                        destructive: false,
                        disabled_reason: Some("coming soon"),
                    },
                ],
            },
            MenuNode::Item {
                label: "About",
                action: ActionId("about.show"),
                destructive: false,
                disabled_reason: None,
            },
        ],
    }
}

fn settings_menu(label: &'static str) -> MenuNode {
    MenuNode::Category {
        label,
        expandable: false,
        disabled_reason: None,
        children: vec![
            MenuNode::Toggle {
                label: "Animations",
                config_key: "ui.animations",
                value: false,
                disabled_reason: None,
            },
            MenuNode::Toggle {
                label: "Greeting on startup",
                config_key: "ui.greeting",
                value: true,
                disabled_reason: None,
            },
            MenuNode::Toggle {
                label: "Metrics footer",
                config_key: "ui.metrics_footer",
                value: true,
                disabled_reason: None,
            },
            MenuNode::Category {
                label: "Advanced",
                expandable: true,
                disabled_reason: None,
                children: vec![
                    MenuNode::Toggle {
                        label: "Compact prompt",
                        config_key: "prompt.compact",
                        value: false,
                        disabled_reason: None,
                    },
                    MenuNode::Toggle {
                        label: "Unicode borders",
                        config_key: "ui.unicode_borders",
                        value: true,
                        disabled_reason: None,
                    },
                ],
            },
        ],
    }
}
