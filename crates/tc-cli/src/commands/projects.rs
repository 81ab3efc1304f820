//! Projects command: list the selectable projects and activities.

use anyhow::Result;

use tc_core::available_projects;

pub fn run() -> Result<()> {
    for project in available_projects() {
        let status = if project.active { "active" } else { "inactive" };
        println!("{} ({status})", project.alias);
        for activity in &project.activities {
            println!("  {}  {}", activity.id, activity.name);
        }
    }
    Ok(())
}
