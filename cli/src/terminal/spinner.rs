use std::io;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

const TICK: Duration = Duration::from_millis(100);

/// The spinner currently on screen, if any. Log lines go through it so they
/// do not tear the animation.
static ACTIVE: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// Spinner shown while a long operation runs. Cleared on drop.
pub struct SpinnerHandle {
    spinner: ProgressBar,
}

impl Drop for SpinnerHandle {
    fn drop(&mut self) {
        self.spinner.finish_and_clear();
        ACTIVE.lock().unwrap_or_else(PoisonError::into_inner).take();
    }
}

pub fn start(message: &str) -> SpinnerHandle {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue} {msg} {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ]);

    pb.set_style(style);
    pb.set_message(message.italic().to_string());
    pb.enable_steady_tick(TICK);

    *ACTIVE.lock().unwrap_or_else(PoisonError::into_inner) = Some(pb.clone());
    SpinnerHandle { spinner: pb }
}

/// `MakeWriter` target for the log subscriber: prints above the active
/// spinner, or straight to stderr when there is none.
pub struct SpinnerWriter;

impl io::Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let msg = String::from_utf8_lossy(buf);
        let msg = msg.trim_end();
        match ACTIVE.lock().unwrap_or_else(PoisonError::into_inner).as_ref() {
            Some(pb) => pb.println(msg),
            None => eprintln!("{msg}"),
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
