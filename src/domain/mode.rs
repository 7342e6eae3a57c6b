// SPDX-License-Identifier: MPL-2.0
//! Gallery layouts.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    /// Compact rows: tiny preview and title.
    List,
    /// Rows with title, modification date and size.
    Details,
    /// Wrapped grid of thumbnails.
    #[default]
    Thumbnails,
    /// Full-size stage showing the selected item.
    Slide,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 4] = [
        DisplayMode::List,
        DisplayMode::Details,
        DisplayMode::Thumbnails,
        DisplayMode::Slide,
    ];

    #[must_use]
    pub fn is_slide(self) -> bool {
        matches!(self, DisplayMode::Slide)
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DisplayMode::List => "List",
            DisplayMode::Details => "Details",
            DisplayMode::Thumbnails => "Thumbnails",
            DisplayMode::Slide => "Slide",
        };
        f.write_str(label)
    }
}
