use crate::output::{print_json, print_table};
use chrono::Utc;
use sprint_core::lifecycle::{self, ActivationOutcome};
use sprint_core::{paths, sprint};
use std::path::Path;

pub fn plan(
    root: &Path,
    name: Option<&str>,
    description: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let created = lifecycle::plan(root, name, description)?;
    if json {
        return print_json(&created);
    }
    println!("planned {} ({})", created.identifier, created.folder_name);
    Ok(())
}

pub fn start(root: &Path, name: Option<&str>, duration: u32, json: bool) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();
    let outcome = lifecycle::start(root, name, today, duration)?;
    report_activation(&outcome, json)
}

pub fn close(root: &Path, json: bool) -> anyhow::Result<()> {
    let archived = lifecycle::close(root)?;
    if json {
        return print_json(&archived);
    }
    println!("archived {} ({})", archived.identifier, archived.folder_name);
    Ok(())
}

pub fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let sprints = sprint::load_all(&paths::sprints_dir(root))?;
    if json {
        return print_json(&sprints);
    }
    let rows = sprints
        .iter()
        .map(|s| {
            vec![
                s.identifier.clone(),
                s.status.display_name().to_string(),
                s.description.clone().unwrap_or_default(),
                s.start_date.map(|d| d.to_string()).unwrap_or_default(),
                s.end_date.map(|d| d.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["SPRINT", "STATUS", "DESCRIPTION", "START", "END"], rows);
    Ok(())
}

fn report_activation(outcome: &ActivationOutcome, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(outcome);
    }
    if let Some(archived) = &outcome.archived {
        println!("archived {} ({})", archived.identifier, archived.folder_name);
    }
    let activated = &outcome.activated;
    println!(
        "activated {} ({})",
        activated.identifier, activated.folder_name
    );
    if let (Some(start), Some(end)) = (activated.start_date, activated.end_date) {
        println!("  {start} -> {end}");
    }
    Ok(())
}
