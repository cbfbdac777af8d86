//! Header navigation: static links plus the mobile menu flag.

use serde::Serialize;
use tracing::debug;

pub const TITLE: &str = "CI Status";
pub const REGISTRATION: &str = "CEEAN PROJECT PTY(LTD) reg: 2023/129836/07";

/// One entry of the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub icon: &'static str,
    pub href: &'static str,
}

pub const NAV_ITEMS: [NavItem; 3] = [
    NavItem {
        label: "Overview",
        icon: "layout-dashboard",
        href: "#overview",
    },
    NavItem {
        label: "Builds",
        icon: "list-checks",
        href: "#builds",
    },
    NavItem {
        label: "Artifacts",
        icon: "package",
        href: "#artifacts",
    },
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderState {
    mobile_menu_open: bool,
}

impl HeaderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &'static [NavItem] {
        &NAV_ITEMS
    }

    pub fn is_menu_open(&self) -> bool {
        self.mobile_menu_open
    }

    pub fn set_menu_open(&mut self, open: bool) {
        self.mobile_menu_open = open;
    }

    /// Returns the new open state.
    pub fn toggle_menu(&mut self) -> bool {
        self.mobile_menu_open = !self.mobile_menu_open;
        self.mobile_menu_open
    }

    /// Follow a link. Closes the mobile menu whether or not the target is
    /// known.
    pub fn navigate(&mut self, href: &str) -> Option<NavItem> {
        self.mobile_menu_open = false;
        let item = NAV_ITEMS.iter().copied().find(|item| item.href == href);
        debug!(
            event = "core.header.navigated",
            href = href,
            found = item.is_some()
        );
        item
    }
}
