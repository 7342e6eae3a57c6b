// SPDX-License-Identifier: MPL-2.0
//! `iced_gallery` is a paginated media gallery built with the Iced GUI framework.
//!
//! Items arrive page by page from a host as the user scrolls toward either
//! edge of the loaded window. Selected items are shown on a double-buffered
//! slide stage so the previous item stays visible until the next one is ready.
//!
//! The gallery core (pagination, stage buffers, selection) is independent of
//! where items come from; [`host`] defines the ports and [`app`] implements
//! them over a local directory.

#![doc(html_root_url = "https://docs.rs/iced_gallery/0.1.0")]

pub mod app;
pub mod collection;
pub mod config;
pub mod domain;
pub mod error;
pub mod gallery;
pub mod host;
pub mod media;
pub mod pagination;
pub mod selection;
pub mod stage;
