//! View state for the single-page inventory tracker.
//!
//! The page is modelled as plain data ([`ViewState`]) changed only through
//! [`update`], which answers each [`ViewAction`] with at most one
//! [`Effect`]. [`ViewController`] runs those effects against an
//! [`InventoryRepository`](pantry_infra::InventoryRepository) and feeds the
//! outcome back in. Rendering is left to whatever front end holds the state.

pub mod action;
pub mod controller;
pub mod state;
pub mod update;

pub use action::{Effect, ViewAction};
pub use controller::ViewController;
pub use state::{AddDialog, EditDialog, Notice, ViewState};
pub use update::update;
