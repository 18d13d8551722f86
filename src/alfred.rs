//! Alfred script filter output.
//!
//! Output shape:
//! `{"items":[{"arg","title","subtitle","match","uid","icon":{"path"}}]}`

use std::io::Write;

use reqwest::Url;
use serde::Serialize;

use crate::client::join_path;
use crate::model::Dashboard;

pub const STAR_ICON: &str = "icons/star.svg";
pub const FOLDER_ICON: &str = "icons/folder.svg";
pub const DASHBOARD_ICON: &str = "icons/dashboard.svg";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Icon {
    pub path: String,
}

impl Icon {
    /// Starred beats folder beats the plain dashboard icon.
    pub fn for_dashboard(dash: &Dashboard) -> Self {
        let path = if dash.is_starred {
            STAR_ICON
        } else if dash.is_folder() {
            FOLDER_ICON
        } else {
            DASHBOARD_ICON
        };
        Self {
            path: path.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlfredItem {
    pub arg: String,
    pub title: String,
    pub subtitle: String,
    #[serde(rename = "match")]
    pub match_text: String,
    pub uid: String,
    pub icon: Icon,
}

/// Title with `(`, `)` and `/` removed, for Alfred's fuzzy matching.
pub fn match_string(title: &str) -> String {
    title.chars().filter(|c| !matches!(c, '(' | ')' | '/')).collect()
}

impl AlfredItem {
    pub fn from_dashboard(dash: &Dashboard, host: &Url) -> Self {
        Self {
            arg: join_path(host, &dash.url).to_string(),
            title: dash.title.clone(),
            subtitle: dash.folder_title.clone(),
            match_text: match_string(&dash.title),
            uid: dash.uid.clone(),
            icon: Icon::for_dashboard(dash),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlfredCollection {
    pub items: Vec<AlfredItem>,
}

impl AlfredCollection {
    pub fn from_dashboards(dashboards: &[Dashboard], host: &Url) -> Self {
        Self {
            items: dashboards
                .iter()
                .map(|d| AlfredItem::from_dashboard(d, host))
                .collect(),
        }
    }

    /// Compact JSON followed by a newline.
    pub fn write_json<W: Write>(&self, mut out: W) -> anyhow::Result<()> {
        serde_json::to_writer(&mut out, self)?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}
