//! The `examgate accounts` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use examgate_core::config::load_config_from;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let directory = config.build_directory()?;

    let mut table = Table::new();
    table.set_header(vec!["Username", "Role", "Tests", "Questions"]);

    for account in directory.iter() {
        let (tests, questions) = match account.as_teacher() {
            Some(t) => (
                t.tests().len().to_string(),
                t.tests().iter().map(|test| test.len()).sum::<usize>().to_string(),
            ),
            None => ("-".to_string(), "-".to_string()),
        };
        table.add_row(vec![
            Cell::new(account.username()),
            Cell::new(account.role()),
            Cell::new(tests),
            Cell::new(questions),
        ]);
    }

    println!("{table}");
    println!(
        "Directory edits by administrators: {}",
        if config.admin_edits_directory {
            "enabled"
        } else {
            "disabled"
        }
    );

    Ok(())
}
