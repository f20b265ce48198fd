use std::path::PathBuf;

use anyhow::Result;

use crate::core::builder::TreeBuilder;
use crate::core::config::{DepsortConfig, ScanConfig};
use crate::core::fs::LocalFs;
use crate::core::style;

pub async fn run(entry: PathBuf, max_depth: Option<usize>, flat: bool) -> Result<()> {
    let cwd = std::env::current_dir()?;

    // Scan settings come from depsort.toml when there is one
    let scan = match DepsortConfig::locate(&cwd) {
        Some(path) => DepsortConfig::from_file(&path)?.scan,
        None => ScanConfig::default(),
    };

    let builder = TreeBuilder::new(LocalFs, scan.scanner()?)
        .with_max_depth(max_depth.unwrap_or(scan.max_depth));
    let tree = builder.build_tree(&entry).await?;

    if flat {
        for key in tree.flatten() {
            println!("{}", key);
        }
    } else {
        println!("{}", tree);
    }

    eprintln!();
    eprintln!(
        "{}",
        style::success(&format!(
            "{} node(s), depth {}",
            tree.num_nodes(),
            tree.depth()
        ))
    );

    Ok(())
}
