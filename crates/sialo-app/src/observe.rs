//! Live DQ5 observation driven by a clock, a mark source and a stop signal.
//!
//! The loop owns none of its inputs. The command line feeds marks from a
//! plain thread reading stdin, so a pending read never holds the runtime
//! open after the loop returns.

use std::future::Future;
use std::io::BufRead;
use std::time::Duration;

use sialo_core::models::evaluation::SessionKind;
use sialo_storage::store::KeyValueStore;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::session::Session;
use crate::timer::TimerEvent;

/// Progress reported while the countdown runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    SlotStarted(usize),
    Marked(usize),
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Finished,
    /// Stopped early; the timer keeps its position.
    Stopped { slot: usize },
}

/// Count down one session, marking the current slot for every message on
/// `marks`, until the timer finishes or `stop` resolves. A closed mark
/// channel only ends marking; the countdown carries on.
pub async fn run<S, F>(
    session: &mut Session<S>,
    kind: SessionKind,
    second: Duration,
    mut marks: mpsc::UnboundedReceiver<()>,
    stop: F,
    mut progress: impl FnMut(Progress),
) -> Result<Outcome, AppError>
where
    S: KeyValueStore,
    F: Future<Output = ()>,
{
    session.timer_mut().start(kind);
    let mut ticks = tokio::time::interval(second);
    ticks.tick().await;
    let mut marks_open = true;
    tokio::pin!(stop);

    loop {
        tokio::select! {
            _ = ticks.tick() => match session.timer_mut().tick() {
                TimerEvent::SlotStarted(slot) => progress(Progress::SlotStarted(slot)),
                TimerEvent::Finished => {
                    tracing::info!(session = kind.label(), "observation finished");
                    return Ok(Outcome::Finished);
                }
                TimerEvent::Second { .. } | TimerEvent::Idle => {}
            },
            mark = marks.recv(), if marks_open => match mark {
                Some(()) => {
                    let slot = session.mark_current_slot()?;
                    progress(Progress::Marked(slot));
                }
                None => marks_open = false,
            },
            _ = &mut stop => {
                session.timer_mut().stop();
                let slot = session.timer().slot();
                tracing::info!(session = kind.label(), slot, "observation stopped");
                return Ok(Outcome::Stopped { slot });
            }
        }
    }
}

/// One mark per line read from stdin, on a detached thread. The channel
/// closes at end of input.
pub fn stdin_marks() -> mpsc::UnboundedReceiver<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            if line.is_err() || tx.send(()).is_err() {
                break;
            }
        }
    });
    rx
}
