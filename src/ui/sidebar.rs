//! Collapsible sidebar.
//!
//! DESIGN
//! ======
//! The sidebar owns a single `open` flag. Uncontrolled, it keeps the flag
//! itself (closed by default). Controlled, the caller owns the flag: the
//! sidebar reports requested changes through `on_change` and only moves
//! when the caller hands it a new value via [`Sidebar::sync`].
//!
//! With `animate` on, the sidebar is 300px open and 60px closed and link
//! labels hide while closed. With it off, the sidebar stays expanded.

use std::fmt;

use askama::Template;

pub const OPEN_WIDTH: &str = "300px";
pub const CLOSED_WIDTH: &str = "60px";

type OnChange = Box<dyn Fn(bool) + Send + Sync>;

enum OpenState {
    Uncontrolled(bool),
    Controlled { open: bool, on_change: Option<OnChange> },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidebarLink {
    pub label: String,
    pub href: String,
    pub active: bool,
}

impl SidebarLink {
    #[must_use]
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self { label: label.into(), href: href.into(), active: false }
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Icon glyph shown while the label is hidden.
    #[must_use]
    pub fn initial(&self) -> char {
        self.label.chars().next().unwrap_or(' ')
    }
}

#[derive(Template)]
#[template(path = "ui/sidebar.html")]
pub struct Sidebar {
    state: OpenState,
    animate: bool,
    links: Vec<SidebarLink>,
}

impl fmt::Debug for Sidebar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sidebar")
            .field("open", &self.is_open())
            .field("controlled", &self.is_controlled())
            .field("animate", &self.animate)
            .field("links", &self.links)
            .finish()
    }
}

impl Default for Sidebar {
    fn default() -> Self {
        Self::new()
    }
}

impl Sidebar {
    /// Uncontrolled sidebar, initially closed.
    #[must_use]
    pub fn new() -> Self {
        Self { state: OpenState::Uncontrolled(false), animate: true, links: Vec::new() }
    }

    /// Sidebar whose open flag is owned by the caller.
    #[must_use]
    pub fn controlled(open: bool) -> Self {
        Self { state: OpenState::Controlled { open, on_change: None }, ..Self::new() }
    }

    /// Callback for requested changes of a controlled sidebar. Ignored when
    /// uncontrolled.
    #[must_use]
    pub fn on_change(mut self, callback: impl Fn(bool) + Send + Sync + 'static) -> Self {
        if let OpenState::Controlled { on_change, .. } = &mut self.state {
            *on_change = Some(Box::new(callback));
        }
        self
    }

    #[must_use]
    pub fn animate(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    #[must_use]
    pub fn link(mut self, link: SidebarLink) -> Self {
        self.links.push(link);
        self
    }

    #[must_use]
    pub fn links(&self) -> &[SidebarLink] {
        &self.links
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        match &self.state {
            OpenState::Uncontrolled(open) | OpenState::Controlled { open, .. } => *open,
        }
    }

    #[must_use]
    pub fn is_controlled(&self) -> bool {
        matches!(self.state, OpenState::Controlled { .. })
    }

    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.animate
    }

    /// Request a new open state.
    pub fn set_open(&mut self, value: bool) {
        match &mut self.state {
            OpenState::Uncontrolled(open) => *open = value,
            OpenState::Controlled { on_change, .. } => {
                if let Some(callback) = on_change {
                    callback(value);
                }
            }
        }
    }

    /// Accept the caller's value for a controlled sidebar.
    pub fn sync(&mut self, value: bool) {
        if let OpenState::Controlled { open, .. } = &mut self.state {
            *open = value;
        }
    }

    pub fn mouse_enter(&mut self) {
        self.set_open(true);
    }

    pub fn mouse_leave(&mut self) {
        self.set_open(false);
    }

    #[must_use]
    pub fn width(&self) -> &'static str {
        if self.animate && !self.is_open() { CLOSED_WIDTH } else { OPEN_WIDTH }
    }

    /// Whether link labels are shown next to their icons.
    #[must_use]
    pub fn labels_visible(&self) -> bool {
        !self.animate || self.is_open()
    }
}

#[cfg(test)]
#[path = "sidebar_test.rs"]
mod tests;
