//! The cooperative mainloop, signal recovery and CLI surface.
//!
//! Single-threaded: the loop blocks on the Ui's key poll, bounded by the
//! current mode's idle timeout. Signals never unwind the editor; handlers
//! set process-global flags that the loop inspects after each wakeup.
//! A SIGBUS against a memory-mapped buffer closes the affected windows
//! (keeping the name for a warning) and only turns fatal when no window
//! remains.

use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use crate::Editor;

/// Set by the SIGBUS handler; checked after every loop wakeup.
pub static SIGBUS_FLAG: AtomicBool = AtomicBool::new(false);
/// Set by SIGINT; translated into the editor's cancel flag.
pub static SIGINT_FLAG: AtomicBool = AtomicBool::new(false);

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install SIGBUS/SIGINT handlers flipping the loop's flags.
pub fn install_signal_handlers() {
    extern "C" fn on_sigbus(_: libc::c_int) {
        SIGBUS_FLAG.store(true, Ordering::SeqCst);
    }
    extern "C" fn on_sigint(_: libc::c_int) {
        SIGINT_FLAG.store(true, Ordering::SeqCst);
    }
    let bus: extern "C" fn(libc::c_int) = on_sigbus;
    let int: extern "C" fn(libc::c_int) = on_sigint;
    unsafe {
        libc::signal(libc::SIGBUS, bus as usize as libc::sighandler_t);
        libc::signal(libc::SIGINT, int as usize as libc::sighandler_t);
    }
}

/// Parse the command line, open the initial windows and drive the editor
/// until it exits. Returns the exit status.
pub fn run(ed: &mut Editor, args: &[String]) -> Result<i32> {
    if !parse_args(ed, args)? {
        return Ok(0);
    }
    ed.draw();
    ed.running = true;
    ed.exit_status = 0;
    let mut idle_armed = false;

    while ed.running {
        if SIGINT_FLAG.swap(false, Ordering::SeqCst) {
            ed.cancel_filter = true;
            info!(target: "signal", "sigint");
        }
        if SIGBUS_FLAG.swap(false, Ordering::SeqCst) {
            sigbus_recover(ed)?;
            if !ed.running {
                break;
            }
        }
        ed.update();
        let timeout = if idle_armed { ed.idle_timeout() } else { None };
        match ed.ui.poll_key(timeout)? {
            Some(key) => {
                drain_key(ed, &key);
                while let Some(key) = ed.ui.try_key()? {
                    drain_key(ed, &key);
                }
                idle_armed = ed.idle_timeout().is_some();
            }
            None => {
                ed.keys_flush();
                ed.mode_idle();
                idle_armed = false;
            }
        }
    }
    Ok(ed.exit_status)
}

fn drain_key(ed: &mut Editor, key: &str) {
    ed.ui.info_hide();
    ed.keys(key);
}

/// Close windows whose file lost its backing store; fatal when the last
/// window goes.
fn sigbus_recover(ed: &mut Editor) -> Result<()> {
    for f in ed.files.iter_mut().flatten() {
        if f.text.sigbus(0) {
            f.truncated = true;
        }
    }
    let mut name: Option<String> = None;
    for wid in ed.order.clone() {
        let Some(fid) = ed.win_ref(wid).map(|w| w.file) else {
            continue;
        };
        if ed.file(fid).is_some_and(|f| f.truncated) {
            name = ed.file(fid).and_then(|f| f.name.clone()).or(name);
            ed.window_close(wid);
        }
    }
    let Some(name) = name else {
        return Ok(()); // spurious wakeup, nothing was truncated
    };
    warn!(target: "signal", file = %name, "sigbus_truncated");
    if ed.order.is_empty() {
        return Err(ed.die(&format!("WARNING: file `{name}' truncated!")));
    }
    ed.info(&format!("WARNING: file `{name}' truncated!"));
    Ok(())
}

/// The flag surface lives in clap; everything positional keeps its
/// vis-style meaning and is collected raw into `tail`.
#[derive(Parser, Debug)]
#[command(
    name = "ved",
    version = VERSION,
    about = "ved - a modal terminal editor",
    disable_version_flag = true
)]
struct Cli {
    /// Print version information and exit.
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: Option<bool>,
    /// `+CMD` (applied to the next file), filenames (duplicates share a
    /// buffer), and a trailing `-` that reads stdin.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    tail: Vec<String>,
}

/// Parse the command line and open the initial windows. Returns false
/// when startup already finished (version/help output).
fn parse_args(ed: &mut Editor, args: &[String]) -> Result<bool> {
    let argv = std::iter::once("ved".to_string()).chain(args.iter().cloned());
    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(err)
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayVersion | clap::error::ErrorKind::DisplayHelp
            ) =>
        {
            let _ = err.print();
            return Ok(false);
        }
        Err(err) => return Err(ed.die(&err.to_string())),
    };
    let mut cmd: Option<String> = None;
    let mut end_of_options = false;
    for arg in &cli.tail {
        if !end_of_options && arg.len() > 1 && arg.starts_with('-') {
            match arg.as_str() {
                "--" => end_of_options = true,
                other => {
                    return Err(ed.die(&format!("Unknown command option: {other}")));
                }
            }
        } else if let Some(rest) = arg.strip_prefix('+') {
            cmd = Some(rest.to_string());
        } else if arg == "-" {
            continue; // picked up below if it was the last argument
        } else {
            if let Err(err) = ed.window_new(Some(arg)) {
                return Err(ed.die(&format!("Can not load `{arg}': {err:#}")));
            }
            if let Some(c) = cmd.take() {
                startup_cmd(ed, &c);
            }
        }
    }
    if ed.order.is_empty() {
        if cli.tail.last().is_some_and(|a| a == "-") {
            stdin_window(ed)?;
        } else if let Err(err) = ed.window_new(None) {
            return Err(ed.die(&format!("Can not create empty buffer: {err:#}")));
        }
        if let Some(c) = cmd.take() {
            startup_cmd(ed, &c);
        }
    }
    Ok(true)
}

/// `+/pat` searches, `+?pat` searches backward, `+:cmd` and `+cmd` go to
/// the ex-command hook.
fn startup_cmd(ed: &mut Editor, cmd: &str) {
    if let Some(pat) = cmd.strip_prefix('/') {
        ed.prompt_cmd('/', pat);
    } else if let Some(pat) = cmd.strip_prefix('?') {
        ed.prompt_cmd('?', pat);
    } else {
        ed.prompt_cmd(':', cmd.strip_prefix(':').unwrap_or(cmd));
    }
}

/// `-`: read stdin into a new buffer, then hand the tty back to fd 0.
fn stdin_window(ed: &mut Editor) -> Result<()> {
    if ed.window_new(None).is_err() {
        return Err(ed.die("Can not create empty buffer"));
    }
    let mut data = String::new();
    if std::io::stdin().read_to_string(&mut data).is_err() {
        return Err(ed.die("Can not read from stdin"));
    }
    let fid = ed.cur_file_id();
    ed.text_insert(fid, 0, &data);
    if let Some(f) = ed.file_mut(fid) {
        f.is_stdin = true;
        f.text.snapshot();
    }
    let fd = unsafe { libc::open(c"/dev/tty".as_ptr(), libc::O_RDONLY) };
    if fd == -1 {
        return Err(ed.die("Can not reopen stdin"));
    }
    unsafe {
        libc::dup2(fd, libc::STDIN_FILENO);
        libc::close(fd);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_ui::ScriptedUi;

    fn quit_handler(ed: &mut Editor, cmd: &str) -> bool {
        match cmd {
            "q" => {
                let wid = ed.win;
                if !ed.window_close(wid) {
                    ed.exit(0);
                }
                true
            }
            _ => false,
        }
    }

    #[test]
    fn scripted_session_edits_and_quits() {
        let ui = ScriptedUi::new(["ihello", "<Esc>", ":q", "<Enter>"]);
        let mut ed = Editor::new(Box::new(ui));
        ed.cmd_handler = Some(quit_handler);
        let status = run(&mut ed, &[]).unwrap();
        assert_eq!(status, 0);
    }

    #[test]
    fn version_flag_short_circuits() {
        let ui = ScriptedUi::new(Vec::<String>::new());
        let mut ed = Editor::new(Box::new(ui));
        let status = run(&mut ed, &["-v".to_string()]).unwrap();
        assert_eq!(status, 0);
        assert!(!ed.running);
    }

    #[test]
    fn unknown_option_is_fatal() {
        let ui = ScriptedUi::new(Vec::<String>::new());
        let mut ed = Editor::new(Box::new(ui));
        assert!(run(&mut ed, &["-x".to_string()]).is_err());
    }

    #[test]
    fn duplicate_filenames_share_one_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "shared\n").unwrap();
        let path = tmp.path().to_str().unwrap().to_string();
        let ui = ScriptedUi::new([":q", "<Enter>", ":q", "<Enter>"]);
        let mut ed = Editor::new(Box::new(ui));
        ed.cmd_handler = Some(quit_handler);
        let status = run(&mut ed, &[path.clone(), path]).unwrap();
        assert_eq!(status, 0);
        // two windows, one shared file with refcount 2 at startup
    }

    #[test]
    fn sigbus_with_no_truncated_file_is_spurious() {
        let ui = ScriptedUi::new([":q", "<Enter>"]);
        let mut ed = Editor::new(Box::new(ui));
        ed.cmd_handler = Some(quit_handler);
        SIGBUS_FLAG.store(true, Ordering::SeqCst);
        let status = run(&mut ed, &[]).unwrap();
        assert_eq!(status, 0);
    }
}
