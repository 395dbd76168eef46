//! List command implementation.

use std::path::Path;

use anyhow::Result;

use crate::commands::{load_manager, print_table};
use crate::index::ContainerIndex;

/// Executes the list command.
pub async fn execute(config_path: Option<&Path>) -> Result<()> {
    let (_cfg, manager) = load_manager(config_path)?;
    let index = ContainerIndex::load(&manager).await?;

    if index.list().is_empty() {
        println!("No containers registered");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = index
        .list()
        .iter()
        .map(|c| {
            vec![
                c.id.clone(),
                c.name.clone(),
                c.image.clone(),
                c.endpoint.clone(),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "IMAGE", "ENDPOINT"], &rows);

    Ok(())
}
