//! Status icons

use std::fmt;

use crate::cell::status::{CellStatus, DeploymentStatus};

/// Icon identifiers, rendered as `ion-md-{name}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconId {
    Minus,
    Refresh,
    OkCircle,
    Link,
    Unlink,
    Trash,
    AddCircle,
    BanCircle,
}

impl IconId {
    pub fn name(&self) -> &'static str {
        match self {
            IconId::Minus => "minus",
            IconId::Refresh => "refresh",
            IconId::OkCircle => "ok-circle",
            IconId::Link => "link",
            IconId::Unlink => "unlink",
            IconId::Trash => "trash",
            IconId::AddCircle => "add-circle",
            IconId::BanCircle => "ban-circle",
        }
    }

    /// Short glyph for terminal output
    pub fn glyph(&self) -> &'static str {
        match self {
            IconId::Minus => "-",
            IconId::Refresh => "~",
            IconId::OkCircle => "✓",
            IconId::Link => "+",
            IconId::Unlink => "×",
            IconId::Trash => "!",
            IconId::AddCircle => "⊕",
            IconId::BanCircle => "⊘",
        }
    }
}

impl fmt::Display for IconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Icon of a status; pending and confirmed share the icon
pub fn icon_for(status: CellStatus) -> IconId {
    match status.base {
        DeploymentStatus::Undeployed => IconId::Minus,
        DeploymentStatus::Deploying => IconId::Refresh,
        DeploymentStatus::Deployed => IconId::OkCircle,
        DeploymentStatus::Undeploying => IconId::Refresh,
        DeploymentStatus::Balancing => IconId::Link,
        DeploymentStatus::Unbalancing => IconId::Unlink,
        DeploymentStatus::Removed => IconId::Trash,
    }
}

/// Class list of a version icon element
pub fn icon_classes(icon: IconId, status: CellStatus) -> String {
    let mut classes = format!(
        "icon ion-md-{} version-icon version-icon-{}",
        icon.name(),
        status.base
    );
    if status.pending {
        classes.push_str(" version-icon-pending");
    }
    classes
}
