// Command sink: where the control loop sends its velocity commands
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::messages::VelocityCommand;

/// Accepts velocity commands; delivery is the sink's problem
///
/// `send` must not block. The control loop never learns whether a command
/// was delivered.
pub trait CommandSink: Send {
    fn send(&mut self, cmd: VelocityCommand);
}

/// Forwards commands to an async dispatcher over an unbounded channel
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<VelocityCommand>,
    closed: bool,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<VelocityCommand>) -> Self {
        Self { tx, closed: false }
    }

    /// Create a sink together with the receiving end for the dispatcher
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<VelocityCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl CommandSink for ChannelSink {
    fn send(&mut self, cmd: VelocityCommand) {
        if self.tx.send(cmd).is_err() {
            // Only warn once, the dispatcher is gone for good
            if !self.closed {
                warn!("Command dispatcher stopped, dropping commands");
                self.closed = true;
            }
            debug!("Dropped command: {:?}", cmd);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_sink_forwards() {
        let (mut sink, mut rx) = ChannelSink::channel();
        sink.send(VelocityCommand::new(0.2, 0.0));
        sink.send(VelocityCommand::zero());

        assert_eq!(rx.try_recv().unwrap(), VelocityCommand::new(0.2, 0.0));
        assert_eq!(rx.try_recv().unwrap(), VelocityCommand::zero());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_sink_survives_closed_receiver() {
        let (mut sink, rx) = ChannelSink::channel();
        drop(rx);

        sink.send(VelocityCommand::new(0.5, 0.0));
        sink.send(VelocityCommand::zero());
        assert!(sink.closed);
    }
}
