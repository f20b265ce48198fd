use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;

use crate::core::config::DepsortConfig;
use crate::core::fs::LocalFs;
use crate::core::plan::plan_order;
use crate::core::style;

pub async fn run(config: Option<PathBuf>, json: bool, explain: bool) -> Result<()> {
    let (config, root, config_path) = match config {
        Some(path) => {
            let loaded = DepsortConfig::from_file(&path)?;
            let root = config_root(&path)?;
            (loaded, root, path)
        }
        None => {
            let cwd = std::env::current_dir()?;
            let (loaded, root) = DepsortConfig::find_and_load(&cwd)?;
            let path = root.join(crate::core::config::CONFIG_FILE);
            (loaded, root, path)
        }
    };

    let plan = plan_order(&config, &root, LocalFs).await?;
    let order = plan.order();

    if json {
        let out = serde_json::to_string_pretty(&order).context("Failed to serialize order")?;
        println!("{}", out);
        return Ok(());
    }

    eprintln!(
        "{}",
        style::project_header(config.units.len(), &config_path.display().to_string())
    );
    eprintln!();

    for (i, label) in order.iter().enumerate() {
        let size = plan.units.get(label).map(|u| u.tree.num_nodes()).unwrap_or(0);
        println!("{}", style::order_entry(i + 1, label, size));
    }

    if explain {
        eprintln!();
        eprintln!("{}", style::header("Derived order"));
        eprintln!("{}", plan.derived.render());
        eprintln!();
        eprintln!(
            "{}",
            style::hint("Units listed after a colon run before the unit that reaches them.")
        );
    }

    if order.len() == 1 {
        eprintln!();
        eprintln!("{}", "Only one unit configured.".dimmed());
    }

    Ok(())
}

/// Directory a config file's relative paths resolve against.
fn config_root(config_path: &Path) -> Result<PathBuf> {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
        _ => Ok(std::env::current_dir()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_root_uses_parent_dir() {
        let root = config_root(Path::new("/work/proj/depsort.toml")).unwrap();
        assert_eq!(root, PathBuf::from("/work/proj"));
    }

    #[test]
    fn test_config_root_bare_file_name_uses_cwd() {
        let root = config_root(Path::new("depsort.toml")).unwrap();
        assert_eq!(root, std::env::current_dir().unwrap());
    }
}
