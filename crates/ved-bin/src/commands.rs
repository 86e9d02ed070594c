//! The ex-command set shipped with the binary.
//!
//! The core only knows a command *hook*; this is the evaluator plugged
//! into it: quit/write plus `:set` for the runtime options.

use std::path::Path;

use core_editor::Editor;
use tracing::info;

pub fn handle(ed: &mut Editor, cmd: &str) -> bool {
    let mut parts = cmd.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).filter(|s| !s.is_empty());
    match name {
        "q" | "q!" => {
            let wid = ed.win;
            if !ed.window_close(wid) {
                ed.exit(0);
            }
            true
        }
        "qa" | "qa!" => {
            ed.exit(0);
            true
        }
        "w" | "write" => write(ed, arg),
        "wq" | "x" => {
            if write(ed, arg) {
                let wid = ed.win;
                if !ed.window_close(wid) {
                    ed.exit(0);
                }
                true
            } else {
                false
            }
        }
        "sp" | "split" => ed.window_split(),
        "set" => set_option(ed, arg),
        _ => {
            ed.info(&format!("Not an editor command: {name}"));
            false
        }
    }
}

fn write(ed: &mut Editor, arg: Option<&str>) -> bool {
    let fid = ed.cur_file_id();
    let target = match arg
        .map(str::to_string)
        .or_else(|| ed.file(fid).and_then(|f| f.name.clone()))
    {
        Some(t) => t,
        None => {
            ed.info("No file name");
            return false;
        }
    };
    let (result, bytes) = match ed.file(fid) {
        Some(f) => (f.text.save(Path::new(&target)), f.text.size()),
        None => return false,
    };
    match result {
        Ok(()) => {
            if let Some(f) = ed.file_mut(fid) {
                f.text.snapshot();
                if f.name.is_none() {
                    f.name = Some(target.clone());
                }
            }
            info!(target: "cmd", file = %target, bytes, "written");
            ed.info(&format!("\"{target}\" {bytes}B written"));
            true
        }
        Err(err) => {
            ed.info(&format!("Can not write `{target}': {err:#}"));
            false
        }
    }
}

fn set_option(ed: &mut Editor, arg: Option<&str>) -> bool {
    let Some(arg) = arg else {
        ed.info("set what?");
        return false;
    };
    let (name, value) = match arg.split_once('=') {
        Some((n, v)) => (n.trim(), Some(v.trim())),
        None => (arg, None),
    };
    match (name, value) {
        ("tabwidth" | "tw", Some(v)) => match v.parse::<usize>() {
            Ok(n) if (1..=8).contains(&n) => {
                ed.options.tabwidth = n;
                true
            }
            _ => {
                ed.info(&format!("Invalid tabwidth: {v}"));
                false
            }
        },
        ("expandtab" | "et", None) => {
            ed.options.expandtab = true;
            true
        }
        ("noexpandtab" | "noet", None) => {
            ed.options.expandtab = false;
            true
        }
        ("autoindent" | "ai", None) => {
            ed.options.autoindent = true;
            true
        }
        ("noautoindent" | "noai", None) => {
            ed.options.autoindent = false;
            true
        }
        _ => {
            ed.info(&format!("Unknown option: {name}"));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_ui::ScriptedUi;

    fn editor() -> Editor {
        let mut ed = Editor::new(Box::new(ScriptedUi::new(Vec::<String>::new())));
        ed.cmd_handler = Some(handle);
        ed.window_new(None).unwrap();
        ed
    }

    #[test]
    fn set_toggles_options() {
        let mut ed = editor();
        assert!(handle(&mut ed, "set expandtab"));
        assert!(ed.options.expandtab);
        assert!(handle(&mut ed, "set tabwidth=4"));
        assert_eq!(ed.options.tabwidth, 4);
        assert!(!handle(&mut ed, "set tabwidth=99"));
        assert!(handle(&mut ed, "set noexpandtab"));
        assert!(!ed.options.expandtab);
    }

    #[test]
    fn write_saves_buffer() {
        let mut ed = editor();
        ed.keys("iout<Esc>");
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let path = tmp.path().to_str().unwrap().to_string();
        assert!(handle(&mut ed, &format!("w {path}")));
        assert_eq!(std::fs::read_to_string(tmp.path()).unwrap(), "out");
    }

    #[test]
    fn quit_closes_and_exits_on_last_window() {
        let mut ed = editor();
        ed.running = true;
        assert!(handle(&mut ed, "q"));
        assert!(!ed.running);
        assert_eq!(ed.exit_status, 0);
    }

    #[test]
    fn unknown_command_reports() {
        let mut ed = editor();
        assert!(!handle(&mut ed, "frobnicate"));
    }
}
