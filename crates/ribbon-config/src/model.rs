//! The merged ribbon.

use crate::extension::GeneratedExtension;
use crate::group::SizeKind;
use crate::menu::Menu;
use crate::tab::Tab;
use serde::Serialize;
use std::collections::BTreeSet;

/// Result of merging every fragment.
///
/// A model is never modified once built. Rebuilding produces a new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RibbonModel {
    tabs: Vec<Tab>,
    app_menu: Menu,
    user_menu: Menu,
    extensions: Vec<GeneratedExtension>,
}

impl RibbonModel {
    pub(crate) fn new(
        tabs: Vec<Tab>,
        app_menu: Menu,
        user_menu: Menu,
        extensions: Vec<GeneratedExtension>,
    ) -> Self {
        Self {
            tabs,
            app_menu,
            user_menu,
            extensions,
        }
    }

    /// Tabs in display order.
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn app_menu(&self) -> &Menu {
        &self.app_menu
    }

    pub fn user_menu(&self) -> &Menu {
        &self.user_menu
    }

    /// Controls and tabs defined inline by fragments.
    pub fn extensions(&self) -> &[GeneratedExtension] {
        &self.extensions
    }

    /// First tab whose label is `label`, by key or as `catalogue:key`.
    pub fn find_tab(&self, label: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.label.is_named(label))
    }

    /// Every control id referenced anywhere in the ribbon.
    pub fn control_ids(&self) -> BTreeSet<&str> {
        let mut ids = BTreeSet::new();
        for menu in [&self.app_menu, &self.user_menu] {
            for element in menu.elements() {
                element.collect_control_ids(&mut ids);
            }
        }
        for tab in &self.tabs {
            for group in tab.groups() {
                for kind in SizeKind::ALL {
                    if let Some(size) = group.size(kind) {
                        ids.extend(size.control_ids());
                    }
                }
            }
        }
        ids
    }
}
