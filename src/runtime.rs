// Teleop runtime: wires keyboard, control loop and zenoh publisher together
//
// The control loop blocks on keyboard polls, so it runs on a blocking thread.
// Commands cross to an async dispatcher over a channel; the dispatcher owns
// the zenoh publisher. Shutdown (signal, Ctrl+C key or keyboard failure)
// always ends with a zero command, then the terminal is restored.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::control::ControlLoop;
use crate::error::{Result, TeleopError};
use crate::input::{InputSource, KeyboardInput, RawModeGuard};
use crate::messages::VelocityCommand;
use crate::sink::{ChannelSink, CommandSink};

pub async fn run(config: Config) -> Result<()> {
    let (sink, rx) = ChannelSink::channel();

    let dispatcher = if config.transport.dry_run {
        info!("Dry run: commands are logged, not published");
        tokio::spawn(log_commands(rx))
    } else {
        info!("Opening Zenoh session...");
        let session = zenoh::open(zenoh::Config::default())
            .await
            .map_err(TeleopError::transport)?;
        let publisher = session
            .declare_publisher(config.transport.topic.clone())
            .await
            .map_err(TeleopError::transport)?;
        info!("Publishing to: {}", config.transport.topic);

        tokio::spawn(async move {
            let sent = publish_commands(&publisher, rx).await;
            drop(publisher);
            if let Err(e) = session.close().await {
                warn!("Failed to close Zenoh session: {}", e);
            }
            sent
        })
    };

    print_controls();
    let raw_mode = RawModeGuard::enable()?;

    drive(
        KeyboardInput::new(),
        sink,
        dispatcher,
        raw_mode,
        &config,
        shutdown_signal(),
    )
    .await
}

/// Run the control loop until it ends or `shutdown` resolves, then stop the robot
///
/// On every exit path a zero command is sent and the dispatcher is drained
/// before `terminal` is dropped.
pub async fn drive<I, T>(
    input: I,
    sink: ChannelSink,
    dispatcher: JoinHandle<u64>,
    terminal: T,
    config: &Config,
    shutdown: impl Future<Output = ()>,
) -> Result<()>
where
    I: InputSource + Send + 'static,
{
    let mut fallback_sink = sink.clone();

    let stop = Arc::new(AtomicBool::new(false));
    let mut control = ControlLoop::new(input, sink, config, stop.clone());
    let mut task = tokio::task::spawn_blocking(move || {
        let outcome = control.run();
        (control, outcome)
    });

    let joined = tokio::select! {
        joined = &mut task => joined,
        _ = shutdown => {
            info!("Shutdown signal received, stopping control loop...");
            stop.store(true, Ordering::SeqCst);
            task.await
        }
    };

    // Stop the robot before anything else is released
    let outcome = match joined {
        Ok((mut control, outcome)) => {
            control.stop_robot();
            outcome
        }
        Err(e) => {
            error!("Control task failed: {}", e);
            fallback_sink.send(VelocityCommand::zero());
            Err(TeleopError::ControlTask(e.to_string()))
        }
    };
    drop(fallback_sink);

    // All senders are gone, the dispatcher drains and returns
    match dispatcher.await {
        Ok(sent) => info!("Dispatched {} commands", sent),
        Err(e) => warn!("Command dispatcher failed: {}", e),
    }

    drop(terminal);
    info!("Keyboard teleop stopped");
    outcome
}

/// Publish every command as JSON until the channel closes
///
/// Publish failures are logged and skipped. Returns the number of commands
/// published.
pub async fn publish_commands(
    publisher: &zenoh::pubsub::Publisher<'_>,
    mut rx: UnboundedReceiver<VelocityCommand>,
) -> u64 {
    let mut sent = 0;
    while let Some(cmd) = rx.recv().await {
        let json = match serde_json::to_string(&cmd) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize command: {}", e);
                continue;
            }
        };
        match publisher.put(json).await {
            Ok(()) => sent += 1,
            Err(e) => warn!("Failed to publish command: {}", e),
        }
    }
    sent
}

/// Dry-run dispatcher: log every command until the channel closes
pub async fn log_commands(mut rx: UnboundedReceiver<VelocityCommand>) -> u64 {
    let mut sent = 0;
    while let Some(cmd) = rx.recv().await {
        info!("cmd_vel: linear_x={:.3} angular_z={:.3}", cmd.linear_x, cmd.angular_z);
        sent += 1;
    }
    sent
}

/// Resolves on Ctrl+C (SIGINT) or, on unix, SIGTERM
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = ctrl_c() => debug!("SIGINT received"),
                    _ = term.recv() => debug!("SIGTERM received"),
                }
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    ctrl_c().await;
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a handler the only way out is the Ctrl+C key in raw mode
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

fn print_controls() {
    println!("Reading from keyboard");
    println!("Use WASD keys to control the robot, E stops turning");
    println!("Press Shift to move faster, any other key stops");
    println!("Ctrl+C to quit");
}
