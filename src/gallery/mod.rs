// SPDX-License-Identifier: MPL-2.0
//! The gallery as an iced component.

pub mod component;
mod view;

pub use component::{Effect, Message, State, SCROLLABLE_ID};
pub use view::format_size;
