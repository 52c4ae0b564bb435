//! Hands job links to the system browser, outside the terminal view.

use std::io;
use std::process::{Command, Stdio};

pub fn open_in_browser(url: &str) -> io::Result<()> {
    let mut command = browser_command(url);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}

#[cfg(target_os = "macos")]
fn browser_command(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}

#[cfg(target_os = "windows")]
fn browser_command(url: &str) -> Command {
    // `cmd /C start` would interpret `&` in query strings.
    let mut command = Command::new("rundll32");
    command.arg("url.dll,FileProtocolHandler").arg(url);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn browser_command(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}

#[cfg(test)]
mod tests {
    use super::browser_command;

    #[test]
    fn url_is_passed_as_a_single_argument() {
        let url = "https://example.com/jobs?q=a&b=c";
        let command = browser_command(url);
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args.last().and_then(|arg| arg.to_str()), Some(url));
    }
}
