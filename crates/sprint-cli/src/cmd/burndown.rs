use crate::output::{print_json, print_table};
use chrono::Utc;
use serde::Serialize;
use sprint_core::burndown;
use sprint_core::cancel::CancelToken;
use sprint_core::git::GitLog;
use sprint_core::history::BurndownDataPoint;
use sprint_core::sprint::Sprint;
use std::path::Path;

#[derive(Serialize)]
struct BurndownReport {
    sprint: Sprint,
    points: Vec<BurndownDataPoint>,
}

pub fn run(root: &Path, query: Option<&str>, json: bool, cancel: &CancelToken) -> anyhow::Result<()> {
    let log = GitLog::discover(root)?;
    let today = Utc::now().date_naive();
    let (sprint, points) = burndown::generate(root, query, &log, today, cancel)?;

    if json {
        return print_json(&BurndownReport { sprint, points });
    }

    println!("burndown for {}", sprint.identifier);
    let rows = points
        .iter()
        .map(|p| {
            vec![
                p.date.to_string(),
                format!("{}/{}", p.remaining_tasks, p.total_tasks),
                match (p.remaining_points, p.total_points) {
                    (Some(rem), Some(total)) => format!("{rem}/{total}"),
                    _ => "-".to_string(),
                },
            ]
        })
        .collect();
    print_table(&["DATE", "TASKS LEFT", "POINTS LEFT"], rows);
    Ok(())
}
