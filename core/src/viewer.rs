//! Threaded live viewer.
//!
//! The replay runs on its own thread. Messages go out on one channel,
//! controls come in on another. The thread exits when the replay is
//! done or cancelled, or when the control side hangs up.

use crate::{
    command::LiveCommand,
    live::{LiveMessage, LiveSim},
};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, SendError, Sender};
use log::debug;
use std::{
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

const TICK: Duration = Duration::from_millis(16);

pub struct ViewerHandle {
    pub messages: Receiver<LiveMessage>,
    controls:     Sender<LiveCommand>,
    thread:       JoinHandle<()>,
}

impl ViewerHandle {
    pub fn send(&self, command: LiveCommand) -> Result<(), SendError<LiveCommand>> {
        self.controls.send(command)
    }

    pub fn controls(&self) -> Sender<LiveCommand> {
        self.controls.clone()
    }

    /// Wait for the replay thread to exit.
    pub fn join(self) -> thread::Result<()> {
        drop(self.controls);
        self.thread.join()
    }
}

pub fn spawn_viewer(live: LiveSim) -> ViewerHandle {
    let (message_tx, messages) = unbounded::<LiveMessage>();
    let (controls, control_rx) = unbounded::<LiveCommand>();
    let thread = thread::spawn(move || run_viewer(live, control_rx, message_tx));
    ViewerHandle { messages, controls, thread }
}

fn run_viewer(mut live: LiveSim, controls: Receiver<LiveCommand>, out: Sender<LiveMessage>) {
    let mut last = Instant::now();
    while !live.is_done() {
        let batch = match controls.recv_timeout(TICK) {
            Ok(command) => live.handle(command),
            Err(RecvTimeoutError::Timeout) => Vec::new(),
            Err(RecvTimeoutError::Disconnected) => break,
        };
        let now = Instant::now();
        let due = live.poll(now.duration_since(last));
        last = now;

        for message in batch.into_iter().chain(due) {
            if out.send(message).is_err() {
                debug!("viewer receiver dropped at event {}", live.position());
                return;
            }
        }
    }
    debug!("viewer finished at event {}", live.position());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        clock::ReplaySpeed,
        command::SkipTo,
        config::SimConfig,
        engine::simulate_game,
        fixtures::demo_team,
        types::SportKind,
    };

    fn live() -> LiveSim {
        let config = SimConfig::default_for(SportKind::Hockey);
        let home = demo_team(SportKind::Hockey, "H", "Home", 3);
        let away = demo_team(SportKind::Hockey, "A", "Away", 4);
        LiveSim::from_result(simulate_game(&home, &away, &config, 5, None).unwrap())
    }

    #[test]
    fn viewer_delivers_final_after_fast_forward() {
        let handle = spawn_viewer(live());
        handle.send(LiveCommand::SetSpeed { speed: ReplaySpeed::FastForward }).unwrap();
        handle.send(LiveCommand::FastForward { to: SkipTo::EndOfGame }).unwrap();
        let got: Vec<LiveMessage> = handle.messages.iter().collect();
        assert!(matches!(got.last(), Some(LiveMessage::Final { .. })));
        handle.join().unwrap();
    }

    #[test]
    fn cancel_stops_the_thread() {
        let handle = spawn_viewer(live());
        handle.send(LiveCommand::Next).unwrap();
        handle.send(LiveCommand::Cancel).unwrap();
        let got: Vec<LiveMessage> = handle.messages.iter().collect();
        assert_eq!(got.len(), 1);
        handle.join().unwrap();
    }
}
