//! Locate a file inside a directory tree and select it in an explorer view
//!
//! Usage:
//!   cargo run --example locate <root> <file> [--visible-only]
//!
//! Sub-directories containing a Cargo.toml are searched as embedded projects.
//! Set `RUST_LOG=trace` to watch every node the search visits.

use anyhow::{bail, Context, Result};
use hierarchy::prelude::*;
use solution_tree::prelude::*;
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let visible_only = args.iter().any(|a| a == "--visible-only");
    let positional: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();
    let [root, file] = positional.as_slice() else {
        bail!("usage: locate <root> <file> [--visible-only]");
    };

    let tree = FilesystemHierarchy::new(root)?;
    let target = Path::new(root).join(file);
    let target = target.to_string_lossy();

    let policy = if visible_only {
        TraversalPolicy::visible_only()
    } else {
        TraversalPolicy::default()
    };
    let searcher = HierarchySearcher::new(policy);

    let mut widget = ExplorerTree::mirror(&tree, policy.visible_only)
        .context("Failed to build explorer view")?;
    let widget_root = widget.root();

    let path = find_and_select(&searcher, &tree, &mut widget, widget_root, &target)
        .with_context(|| format!("Search for {} failed", target))?;

    if path.is_empty() {
        println!("{} not found", target);
        return Ok(());
    }

    println!("Found {}:", target);
    for (depth, segment) in path.iter().enumerate() {
        println!("{}{}", "  ".repeat(depth), segment);
    }

    println!();
    println!("Explorer:");
    print!("{}", widget.render());

    Ok(())
}
