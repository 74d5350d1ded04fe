//! Hop from background threads onto the UI thread
//!
//! The tray thread posts [`UiCommand`]s; only the UI frame loop drains
//! them, so window state is never touched off the UI thread.

use crossbeam_channel::{Receiver, Sender};

/// Action to run on the UI thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Show,
    Hide,
    OpenSettings,
    Exit,
}

/// Producer half, cloneable and `Send`
#[derive(Debug, Clone)]
pub struct UiSender {
    tx: Sender<UiCommand>,
}

impl UiSender {
    /// Enqueue a command. Fire-and-forget: a gone UI is not an error.
    pub fn post(&self, command: UiCommand) {
        if self.tx.send(command).is_err() {
            tracing::debug!("UI queue closed, dropping {:?}", command);
        }
    }
}

/// Consumer half, owned by the UI app
#[derive(Debug)]
pub struct UiQueue {
    rx: Receiver<UiCommand>,
}

impl UiQueue {
    /// Take every pending command in the order it was posted
    pub fn drain(&self) -> Vec<UiCommand> {
        self.rx.try_iter().collect()
    }
}

pub fn channel() -> (UiSender, UiQueue) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (UiSender { tx }, UiQueue { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_in_post_order() {
        let (sender, queue) = channel();
        sender.post(UiCommand::Hide);
        sender.post(UiCommand::Show);

        assert_eq!(queue.drain(), vec![UiCommand::Hide, UiCommand::Show]);
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_post_from_another_thread() {
        let (sender, queue) = channel();
        std::thread::spawn(move || sender.post(UiCommand::OpenSettings))
            .join()
            .unwrap();

        assert_eq!(queue.drain(), vec![UiCommand::OpenSettings]);
    }

    #[test]
    fn test_post_after_queue_dropped_does_not_panic() {
        let (sender, queue) = channel();
        drop(queue);
        sender.post(UiCommand::Exit);
    }
}
