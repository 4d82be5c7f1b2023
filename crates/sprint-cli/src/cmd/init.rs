use sprint_core::{io, paths};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let sprints = paths::sprints_dir(root);
    let existed = sprints.is_dir();
    io::ensure_dir(&sprints)?;
    if existed {
        println!("already initialized: {}", sprints.display());
    } else {
        println!("initialized {}", sprints.display());
    }
    Ok(())
}
