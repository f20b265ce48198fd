use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::core::builder::TreeBuilder;
use crate::core::config::DepsortConfig;
use crate::core::fs::{FileAccess, absolutize};
use crate::core::order::{DerivedOrder, Unit};

/// Built units together with their derived order.
#[derive(Debug, Clone)]
pub struct Plan {
    pub units: BTreeMap<String, Unit>,
    pub derived: DerivedOrder,
}

impl Plan {
    /// Labels in run order.
    pub fn order(&self) -> Vec<String> {
        self.derived.sorted()
    }
}

/// Build one dependency tree per configured unit and derive the run order.
///
/// Paths in the config are resolved against `root`, the directory holding
/// depsort.toml. Any unit failing to build aborts the whole plan.
pub async fn plan_order<F: FileAccess>(config: &DepsortConfig, root: &Path, fs: F) -> Result<Plan> {
    let builder = TreeBuilder::new(fs, config.scan.scanner()?).with_max_depth(config.scan.max_depth);

    let mut units = BTreeMap::new();
    for unit in &config.units {
        let entry = absolutize(&unit.entry, root);
        let representative = absolutize(unit.representative(), root);

        let tree = builder.build_tree(&entry).await.with_context(|| {
            format!(
                "Failed to build dependency tree for unit '{}' ({})",
                unit.label,
                entry.display()
            )
        })?;

        units.insert(
            unit.label.clone(),
            Unit::new(representative.to_string_lossy().into_owned(), tree),
        );
    }

    let derived = DerivedOrder::build(&units)?;
    info!(units = units.len(), "derived unit order");
    Ok(Plan { units, derived })
}
