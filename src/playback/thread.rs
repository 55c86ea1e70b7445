use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, error};

use super::controller::QueueController;
use super::decoder::Decoder;
use super::error::Result;
use super::observable::Session;
use super::types::PlayerCmd;

/// How long the loop waits for a command before checking decoder events.
const EVENT_POLL: Duration = Duration::from_millis(50);

/// Spawn the player thread. The decoder is built on that thread because
/// audio output handles are not `Send`.
pub(super) fn spawn_player_thread<D, F>(
    make_decoder: F,
    rx: Receiver<PlayerCmd>,
    session: Session,
    poll_interval: Duration,
    ready: Sender<Result<()>>,
) -> std::io::Result<JoinHandle<()>>
where
    D: Decoder + 'static,
    F: FnOnce() -> Result<D> + Send + 'static,
{
    thread::Builder::new()
        .name("canto-player".to_string())
        .spawn(move || {
            let decoder = match make_decoder() {
                Ok(d) => d,
                Err(e) => {
                    error!(error = %e, "audio output unavailable");
                    let _ = ready.send(Err(e));
                    return;
                }
            };
            let _ = ready.send(Ok(()));

            let mut controller = QueueController::new(decoder, session, poll_interval);
            run_loop(&mut controller, &rx);
        })
}

fn run_loop<D: Decoder>(controller: &mut QueueController<D>, rx: &Receiver<PlayerCmd>) {
    loop {
        match rx.recv_timeout(EVENT_POLL) {
            Ok(PlayerCmd::Quit) => {
                controller.stop();
                break;
            }
            Ok(cmd) => {
                debug!(?cmd, "player command");
                controller.handle(cmd);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                controller.stop();
                break;
            }
        }

        controller.pump();
        controller.tick(Instant::now());
    }
}
