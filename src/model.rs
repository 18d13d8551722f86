//! Records returned by Grafana's `/api/search` endpoint.

use serde::Deserialize;

/// Type tag Grafana assigns to folders in search results.
pub const FOLDER_TYPE: &str = "dash-folder";

/// One entry of the search response array.
///
/// Fields absent from the payload fall back to their zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Dashboard {
    pub uid: String,
    pub title: String,
    /// Relative to the Grafana host, e.g. `/d/abc/cpu-load`.
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub is_starred: bool,
    pub folder_title: String,
}

impl Dashboard {
    pub fn is_folder(&self) -> bool {
        self.kind == FOLDER_TYPE
    }
}
