//! Static project/activity metadata exposed to hosts.
//!
//! Tipee has no notion of projects or activities; attendance is just
//! check-in/check-out pairs. Hosts still expect selectable choices, so a
//! single fixed project with a single "no activity" slot is exposed.

/// A selectable activity within a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    /// Numeric activity identifier.
    pub id: u32,
    /// Display name.
    pub name: String,
}

/// A selectable project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Short alias used to reference the project.
    pub alias: String,
    /// Display name.
    pub name: String,
    /// Whether the project is currently selectable.
    pub active: bool,
    /// The activities available under this project.
    pub activities: Vec<Activity>,
}

/// Returns the fixed project list.
pub fn available_projects() -> Vec<Project> {
    vec![Project {
        alias: "tipee".to_string(),
        name: "tipee".to_string(),
        active: true,
        activities: vec![Activity {
            id: 0,
            name: "no activity".to_string(),
        }],
    }]
}
