use crate::cli::DebugCommands;
use crate::core::config::DepsortConfig;
use crate::core::plan::plan_order;
use crate::core::fs::LocalFs;
use crate::core::style;

pub async fn run(what: DebugCommands) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let (config, root) = DepsortConfig::find_and_load(&cwd)?;

    match what {
        DebugCommands::Config => dump_config(&config, &root),
        DebugCommands::Units => dump_units(&config, &root).await?,
    }

    Ok(())
}

fn dump_config(config: &DepsortConfig, root: &std::path::Path) {
    println!("{}", style::header("CONFIG (depsort.toml)"));
    println!();
    println!("{}", style::summary_line("scan.call", &config.scan.call));
    println!("{}", style::summary_line("scan.extension", &config.scan.extension));
    println!("{}", style::summary_line("scan.max_depth", &config.scan.max_depth.to_string()));
    println!("{}", style::summary_line("root", &root.display().to_string()));
    println!();
    for unit in &config.units {
        println!("  [{}]", unit.label);
        println!("    entry:  {}", unit.entry.display());
        println!("    source: {}", unit.representative().display());
    }
}

async fn dump_units(config: &DepsortConfig, root: &std::path::Path) -> anyhow::Result<()> {
    let plan = plan_order(config, root, LocalFs).await?;

    println!("{}", style::header(&format!("UNITS ({})", plan.units.len())));
    println!();

    for (label, unit) in &plan.units {
        println!("  {} → {}", label, unit.representative_path);
        println!("{}", unit.tree.arena().render_indented(unit.tree.root(), 2));
        println!(
            "    --- {} node(s), depth {} ---",
            unit.tree.num_nodes(),
            unit.tree.depth()
        );
        println!();
    }

    Ok(())
}
