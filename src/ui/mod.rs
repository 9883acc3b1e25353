//! Server-rendered UI kit.
//!
//! Each component is a plain Rust value that implements
//! [`askama::Template`]. Pages embed components as pre-escaped fragments
//! (`{{ component|safe }}`); the component's own template escapes its data.

pub mod button;
pub mod form_control;
pub mod sidebar;
pub mod toggle;

pub use button::{ActionButton, Button, ButtonKind, ButtonStatus, Variant};
pub use form_control::FormControl;
pub use sidebar::{Sidebar, SidebarLink};
pub use toggle::Toggle;
