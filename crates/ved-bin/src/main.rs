//! ved entrypoint.

use anyhow::Result;
use core_editor::{Editor, mainloop};
use core_ui::term::TermUi;
use tracing::{error, info};

mod commands;
mod config;

fn main() -> Result<()> {
    // file logging (ved.log, non-blocking); the terminal belongs to the UI
    let file_appender = tracing_appender::rolling::never(".", "ved.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(writer)
        .init();
    info!(target: "runtime", version = mainloop::VERSION, "startup");

    // log panics before the terminal guard unwinds raw mode
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        error!(target: "runtime.panic", %panic, "panic");
        default_panic(panic);
    }));

    let cfg = config::load_from(None)?;
    let options = config::to_options(&cfg);

    let ui = TermUi::new()?;
    let mut ed = Editor::new(Box::new(ui));
    ed.set_options(options);
    ed.cmd_handler = Some(commands::handle);

    mainloop::install_signal_handlers();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let status = mainloop::run(&mut ed, &args)?;
    info!(target: "runtime", status, "exit");
    std::process::exit(status);
}
