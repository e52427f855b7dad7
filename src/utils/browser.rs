use anyhow::{Context, Result};
use std::process::Command;

/// Otevře dashboard v defaultním prohlížeči podle OS
pub fn open_browser(url: &str) -> Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(url);
        c
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", url]);
        c
    } else {
        let mut c = Command::new("xdg-open");
        c.arg(url);
        c
    };

    command
        .spawn()
        .with_context(|| format!("Failed to open browser for {}", url))?;

    tracing::info!("Opened dashboard in browser: {}", url);
    Ok(())
}
