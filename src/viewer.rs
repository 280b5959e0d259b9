use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use tokio::task::JoinHandle;

/// Platform program that opens a file in its default application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opener {
    MacOpen,      // open
    WindowsStart, // cmd /C start
    XdgOpen,      // xdg-open
}

impl Opener {
    pub fn detect() -> Self {
        Self::for_os(std::env::consts::OS)
    }

    pub fn for_os(os: &str) -> Self {
        match os {
            "macos" => Opener::MacOpen,
            "windows" => Opener::WindowsStart,
            _ => Opener::XdgOpen,
        }
    }

    fn command(&self, path: &Path) -> Command {
        match self {
            Opener::MacOpen => {
                let mut cmd = Command::new("open");
                cmd.arg(path);
                cmd
            }
            Opener::WindowsStart => {
                let mut cmd = Command::new("cmd");
                cmd.arg("/C").arg("start").arg("").arg(path);
                cmd
            }
            Opener::XdgOpen => {
                let mut cmd = Command::new("xdg-open");
                cmd.arg(path);
                cmd
            }
        }
    }
}

/// Launches the system viewer for `path` without waiting for it.
pub fn show_image(path: &Path) -> io::Result<()> {
    spawn_detached(Opener::detect().command(path))?;
    Ok(())
}

/// Starts `cmd` and reaps it from a background task once it exits.
fn spawn_detached(cmd: Command) -> io::Result<JoinHandle<()>> {
    let mut cmd = tokio::process::Command::from(cmd);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    let mut child = cmd.spawn()?;

    Ok(tokio::spawn(async move {
        match child.wait().await {
            Ok(status) => log::debug!("image viewer exited with {}", status),
            Err(e) => log::warn!("could not wait for image viewer: {}", e),
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_opener_per_platform() {
        assert_eq!(Opener::for_os("macos"), Opener::MacOpen);
        assert_eq!(Opener::for_os("windows"), Opener::WindowsStart);
        assert_eq!(Opener::for_os("linux"), Opener::XdgOpen);
        assert_eq!(Opener::for_os("freebsd"), Opener::XdgOpen);
    }

    #[test]
    fn windows_start_gets_an_empty_title() {
        let cmd = Opener::WindowsStart.command(Path::new("img.png"));
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, vec!["/C", "start", "", "img.png"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn viewer_process_is_waited_on_in_the_background() {
        let handle = spawn_detached(Command::new("true")).unwrap();
        tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .expect("viewer task did not finish")
            .unwrap();
    }

    #[tokio::test]
    async fn missing_viewer_is_a_spawn_error() {
        assert!(spawn_detached(Command::new("dchat-no-such-viewer")).is_err());
    }
}
