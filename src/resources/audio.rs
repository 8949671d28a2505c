//! ECS resources that bridge the main thread with the background audio thread.
//!
//! Use [`setup_audio`] once during initialization to spawn the audio thread
//! and insert the [`AudioBridge`] and message resources. Call
//! [`shutdown_audio`] during teardown to stop the thread and free audio
//! resources before the window goes away.

use std::time::{Duration, Instant};

use crate::error::LoadError;
use crate::events::audio::{AudioCmd, AudioMessage};
use crate::systems::audio::audio_thread;
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use log::{debug, info};
use rustc_hash::FxHashSet;

/// Shared bridge between the ECS world and the audio thread.
///
/// Systems can send commands via [`AudioBridge::tx_cmd`] and poll for replies
/// via [`AudioBridge::rx_msg`].
#[derive(Resource)]
pub struct AudioBridge {
    /// Sender for [`AudioCmd`] messages (ECS -> audio thread).
    pub tx_cmd: Sender<AudioCmd>,
    /// Receiver for [`AudioMessage`] messages (audio thread -> ECS).
    pub rx_msg: Receiver<AudioMessage>,
    /// Join handle for the background audio thread.
    pub handle: std::thread::JoinHandle<()>,
}

/// Spawn the audio thread and register bridge resources.
pub fn setup_audio(world: &mut World) {
    let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
    let (tx_msg, rx_msg) = unbounded::<AudioMessage>();

    let handle = std::thread::spawn(move || audio_thread(rx_cmd, tx_msg));

    world.insert_resource(AudioBridge {
        tx_cmd,
        rx_msg,
        handle,
    });
    world.insert_resource(Messages::<AudioMessage>::default());
    world.insert_resource(Messages::<AudioCmd>::default());
}

/// Send a command straight to the audio thread, bypassing the message queue.
///
/// Used during setup, before any schedule runs.
pub fn send_audio_cmd(world: &World, cmd: AudioCmd) {
    if let Some(bridge) = world.get_resource::<AudioBridge>() {
        let _ = bridge.tx_cmd.send(cmd);
    }
}

/// Block until the audio thread has acknowledged every load in `ids`.
///
/// Each reply received while waiting is also written to
/// `Messages<AudioMessage>` so regular readers still see it. The first load
/// failure, a dead audio thread, or running past `timeout` is an error.
pub fn wait_for_assets(world: &mut World, ids: &[&str], timeout: Duration) -> Result<(), LoadError> {
    let rx = match world.get_resource::<AudioBridge>() {
        Some(bridge) => bridge.rx_msg.clone(),
        None => {
            return Err(LoadError::Audio {
                id: ids.first().copied().unwrap_or_default().to_string(),
                reason: "audio thread not running".into(),
            });
        }
    };

    let mut pending: FxHashSet<&str> = ids.iter().copied().collect();
    let deadline = Instant::now() + timeout;

    while !pending.is_empty() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let msg = match rx.recv_timeout(remaining) {
            Ok(msg) => msg,
            Err(RecvTimeoutError::Timeout) => {
                let mut missing: Vec<&str> = pending.into_iter().collect();
                missing.sort_unstable();
                return Err(LoadError::Audio {
                    id: missing.join(", "),
                    reason: format!("no load acknowledgement within {:?}", timeout),
                });
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(LoadError::Audio {
                    id: ids.join(", "),
                    reason: "audio thread exited".into(),
                });
            }
        };
        debug!("audio reply during setup: {:?}", msg);

        match &msg {
            AudioMessage::MusicLoaded { id } | AudioMessage::FxLoaded { id } => {
                pending.remove(id.as_str());
            }
            AudioMessage::MusicLoadFailed { id, error }
            | AudioMessage::FxLoadFailed { id, error } => {
                return Err(LoadError::Audio {
                    id: id.clone(),
                    reason: error.clone(),
                });
            }
            _ => {}
        }

        if let Some(mut messages) = world.get_resource_mut::<Messages<AudioMessage>>() {
            messages.write(msg);
        }
    }

    info!("audio assets ready: {:?}", ids);
    Ok(())
}

/// Request shutdown of the audio thread and join it.
///
/// If the bridge resource exists, sends [`AudioCmd::Shutdown`], waits for the
/// thread to exit, and removes the resource from the world.
pub fn shutdown_audio(world: &mut World) {
    if let Some(bridge) = world.remove_resource::<AudioBridge>() {
        let _ = bridge.tx_cmd.send(AudioCmd::Shutdown);
        if bridge.handle.join().is_err() {
            log::error!("audio thread panicked");
        }
    }
}
