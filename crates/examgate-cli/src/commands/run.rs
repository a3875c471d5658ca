//! The `examgate run` command.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};

use examgate_core::config::load_config_from;
use examgate_core::console::StdConsole;
use examgate_core::session::{Session, SessionEnd};

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let directory = config
        .build_directory()
        .context("invalid account configuration")?;

    let stdin = io::stdin();
    let mut console = StdConsole::new(stdin.lock(), io::stdout().lock());
    let mut session = Session::new(directory, config.session_config());

    match session.run(&mut console).context("console session failed")? {
        SessionEnd::AdminExit => tracing::debug!("administrator exit"),
        SessionEnd::InputClosed => tracing::debug!("input closed"),
    }

    Ok(())
}
