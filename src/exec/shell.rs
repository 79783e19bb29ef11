// src/exec/shell.rs

use std::process::Stdio;

use tokio::process::Command;

/// Build a shell command appropriate for the platform.
///
/// The child inherits our stdin, stdout and stderr so its console output is
/// visible live. On unix it is placed in a new process group whose id equals
/// its pid, so the whole tree it spawns can be signaled at once.
pub fn shell_command(cmd_line: &str) -> Command {
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd_line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd_line);
        c
    };

    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    #[cfg(unix)]
    cmd.process_group(0);

    cmd
}
