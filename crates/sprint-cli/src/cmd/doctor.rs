use crate::output::{print_json, print_table};
use serde::Serialize;
use sprint_core::cancel::CancelToken;
use sprint_core::doctor::{self, Inconsistency, PointerReport, RepairResult};
use std::path::Path;

#[derive(Serialize)]
struct DoctorReport {
    inconsistencies: Vec<Inconsistency>,
    pointer: PointerReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    repair: Option<RepairResult>,
}

pub fn run(root: &Path, fix: bool, json: bool, cancel: &CancelToken) -> anyhow::Result<()> {
    let inconsistencies = doctor::detect(root, cancel)?;
    let pointer = doctor::check_pointer(root)?;

    let repair = if fix && !inconsistencies.is_empty() {
        Some(doctor::repair(root, &inconsistencies, cancel)?)
    } else {
        None
    };

    if json {
        return print_json(&DoctorReport {
            inconsistencies,
            pointer,
            repair,
        });
    }

    if inconsistencies.is_empty() {
        println!("all sprint folders agree with their status markers");
    } else {
        let rows = inconsistencies
            .iter()
            .map(|i| {
                vec![
                    i.folder_name.clone(),
                    i.folder_status.to_string(),
                    i.marker_status
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "missing".to_string()),
                    i.expected_name.clone().unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect();
        print_table(&["FOLDER", "NAME SAYS", "MARKER SAYS", "EXPECTED"], rows);
    }

    match &pointer {
        PointerReport::Absent => println!("current pointer: absent"),
        PointerReport::Valid { path } => println!("current pointer: ok -> {}", path.display()),
        PointerReport::Dangling { path } => {
            println!("current pointer: DANGLING -> {}", path.display())
        }
        PointerReport::NotActive { path, status } => println!(
            "current pointer: NOT ACTIVE -> {} (marker: {})",
            path.display(),
            status.map(|s| s.to_string()).unwrap_or_else(|| "missing".to_string())
        ),
    }

    if let Some(result) = repair {
        println!(
            "repaired {} sprint(s), {} failed",
            result.repaired, result.failed
        );
        for failure in &result.failures {
            println!(
                "  failed {}: {} ({})",
                failure.path.display(),
                failure.attempted,
                failure.reason
            );
        }
        result.into_result()?;
    } else if !inconsistencies.is_empty() {
        println!("run 'sprint doctor --fix' to repair");
    }

    Ok(())
}
