//! Code browser side tabs: file tree vs. symbol structure.
//!
//! The selected tab lives in the `tab` query parameter. Anything other than
//! `structure` means the file tab. The structure tab is disabled while
//! browsing a directory or when the current file has no symbols.

use serde::{Deserialize, Serialize};

/// Keyboard shortcut that toggles between the two tabs.
pub const SHORTCUT_KEY: char = 't';
pub const SHORTCUT_HELP: &str = "Toggle tree and symbol view in sidebar";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideTab {
    #[default]
    File,
    Structure,
}

impl SideTab {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Structure => "structure",
        }
    }

    /// Read the selected tab from a query string, with or without leading `?`.
    ///
    /// Keys and values are form-decoded. A repeated `tab` parameter is
    /// ambiguous and selects the file tab.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut tabs = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
            .filter(|(key, _)| form_decode(key) == "tab")
            .map(|(_, value)| form_decode(value));
        match (tabs.next(), tabs.next()) {
            (Some(tab), None) if tab == "structure" => Self::Structure,
            _ => Self::File,
        }
    }

    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::File => Self::Structure,
            Self::Structure => Self::File,
        }
    }
}

/// Decode one form component; malformed escapes are kept verbatim.
fn form_decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

/// Whether the current path points at a directory or a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathType {
    Tree,
    Blob,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TabDescriptor {
    pub id: SideTab,
    pub name: &'static str,
    pub is_selected: bool,
    pub disabled: bool,
    pub loading: bool,
    pub test_subj: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SideTabs {
    pub loading_file_tree: bool,
    pub loading_structure_tree: bool,
    pub has_structure: bool,
    pub path_type: PathType,
}

impl SideTabs {
    #[must_use]
    pub fn structure_disabled(&self) -> bool {
        self.path_type == PathType::Tree || !self.has_structure
    }

    #[must_use]
    pub fn tabs(&self, selected: SideTab) -> [TabDescriptor; 2] {
        [
            TabDescriptor {
                id: SideTab::File,
                name: "File",
                is_selected: selected == SideTab::File,
                disabled: false,
                loading: self.loading_file_tree,
                test_subj: "codeFileTreeTab",
            },
            TabDescriptor {
                id: SideTab::Structure,
                name: "Structure",
                is_selected: selected == SideTab::Structure,
                disabled: self.structure_disabled(),
                loading: self.loading_structure_tree,
                test_subj: "codeStructureTreeTab",
            },
        ]
    }
}

#[cfg(test)]
#[path = "side_tabs_test.rs"]
mod tests;
