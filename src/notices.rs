//! User-facing notifications.
//!
//! Conditions the user can act on (unsupported splits, cells outside the
//! active dataset, hidden post-embryonic cells) are reported here instead of
//! failing the operation.

use serde::{Deserialize, Serialize};

use crate::config::Thresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoticeKind {
    SplitUnsupported,
    SplitMembersFiltered,
    PostembryonicHidden,
    ConnectionsElsewhere,
}

impl NoticeKind {
    pub fn id(&self) -> &'static str {
        match self {
            NoticeKind::SplitUnsupported => "split-unsupported",
            NoticeKind::SplitMembersFiltered => "split-members-filtered",
            NoticeKind::PostembryonicHidden => "postembryonic-hidden",
            NoticeKind::ConnectionsElsewhere => "connections-elsewhere",
        }
    }

    pub fn level(&self) -> NoticeLevel {
        match self {
            NoticeKind::SplitUnsupported | NoticeKind::PostembryonicHidden => NoticeLevel::Warning,
            NoticeKind::SplitMembersFiltered | NoticeKind::ConnectionsElsewhere => NoticeLevel::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub kind: NoticeKind,
    pub message: String,
    pub cells: Vec<String>,
}

impl Notice {
    fn new(kind: NoticeKind, message: String, cells: Vec<String>) -> Self {
        Self {
            level: kind.level(),
            kind,
            message,
            cells,
        }
    }

    pub fn split_unsupported(classes: Vec<String>) -> Self {
        let message = format!(
            "{} cannot be split in the selected dataset",
            classes.join(", ")
        );
        Self::new(NoticeKind::SplitUnsupported, message, classes)
    }

    pub fn split_members_filtered(classes: Vec<String>, thresholds: Thresholds) -> Self {
        let message = format!(
            "No member of {} has connections above the current thresholds \
             (chemical {}, electrical {})",
            classes.join(", "),
            thresholds.chemical,
            thresholds.electrical
        );
        Self::new(NoticeKind::SplitMembersFiltered, message, classes)
    }

    pub fn postembryonic_hidden(cells: Vec<String>) -> Self {
        let message = format!(
            "{} only appear after embryogenesis; turn on post-embryonic cells to see them",
            cells.join(", ")
        );
        Self::new(NoticeKind::PostembryonicHidden, message, cells)
    }

    pub fn connections_elsewhere(cells: Vec<String>) -> Self {
        let message = format!(
            "{} are not in the selected datasets but have connections in others",
            cells.join(", ")
        );
        Self::new(NoticeKind::ConnectionsElsewhere, message, cells)
    }
}
