use anyhow::{bail, Context, Result};
use tokio::process::Command;

/// Opens `url` with the platform's default handler
pub async fn open_in_browser(url: &str) -> Result<()> {
    let mut command = if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", "", url]);
        c
    } else if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(url);
        c
    } else {
        let mut c = Command::new("xdg-open");
        c.arg(url);
        c
    };

    let status = command
        .status()
        .await
        .context("Failed to launch the browser")?;
    if !status.success() {
        bail!("Browser launcher exited with {}", status);
    }
    Ok(())
}
