//! Audio playback on a dedicated thread, plus the systems that bridge it
//! with the ECS world.
//!
//! - [`audio_thread`] owns the Raylib audio device and every `Music`/`Sound`
//!   handle, processes [`AudioCmd`]s and replies with [`AudioMessage`]s.
//! - [`forward_audio_cmds`] / [`update_bevy_audio_cmds`] move commands written
//!   by systems onto the channel.
//! - [`poll_audio_messages`] / [`update_bevy_audio_messages`] drain replies
//!   into the ECS message queue.
//! - [`footstep_audio`] starts the footstep loop when a controlled entity
//!   starts walking and stops it when every controlled entity stands still.
//!
//! See also: [`crate::resources::audio`].

use crate::components::inputcontrolled::InputControlled;
use crate::components::signals::{MOVING, Signals};
use crate::events::audio::{AudioCmd, AudioMessage};
use crate::resources::audio::AudioBridge;
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, info, warn};
use raylib::core::audio::{Music, RaylibAudio, Sound};
use rustc_hash::{FxHashMap, FxHashSet};

/// Drain pending replies from the audio thread into `Messages<AudioMessage>`.
pub fn poll_audio_messages(bridge: Res<AudioBridge>, mut writer: MessageWriter<AudioMessage>) {
    writer.write_batch(bridge.rx_msg.try_iter());
}

/// Advance the ECS message queue for [`AudioMessage`].
pub fn update_bevy_audio_messages(mut msgs: ResMut<Messages<AudioMessage>>) {
    msgs.update();
}

/// Forward ECS [`AudioCmd`] messages to the audio thread.
pub fn forward_audio_cmds(bridge: Res<AudioBridge>, mut reader: MessageReader<AudioCmd>) {
    for cmd in reader.read() {
        // ignore send error on shutdown
        let _ = bridge.tx_cmd.send(cmd.clone());
    }
}

/// Advance the ECS message queue for [`AudioCmd`].
pub fn update_bevy_audio_cmds(mut msgs: ResMut<Messages<AudioCmd>>) {
    msgs.update();
}

/// Which sound effect plays while walking, and whether it is playing now.
#[derive(Resource, Debug, Clone)]
pub struct FootstepAudio {
    pub fx_id: String,
    pub playing: bool,
}

impl FootstepAudio {
    pub fn new(fx_id: impl Into<String>) -> Self {
        Self {
            fx_id: fx_id.into(),
            playing: false,
        }
    }
}

/// Edge-triggered footstep loop.
///
/// Sends exactly one [`AudioCmd::PlayFxLooped`] when walking starts and one
/// [`AudioCmd::StopFx`] when it stops. Nothing is sent while the state holds.
pub fn footstep_audio(
    query: Query<&Signals, With<InputControlled>>,
    mut footsteps: ResMut<FootstepAudio>,
    mut writer: MessageWriter<AudioCmd>,
) {
    let walking = query.iter().any(|signals| signals.has_flag(MOVING));
    if walking == footsteps.playing {
        return;
    }
    footsteps.playing = walking;
    let id = footsteps.fx_id.clone();
    if walking {
        writer.write(AudioCmd::PlayFxLooped { id });
    } else {
        writer.write(AudioCmd::StopFx { id });
    }
}

/// Entry point of the dedicated audio thread.
///
/// Drains commands without blocking, pumps music streams, restarts looped
/// tracks and sounds, and sleeps briefly between iterations. Returns after
/// [`AudioCmd::Shutdown`] once every handle has been released, or right away
/// if the audio device cannot be opened.
pub fn audio_thread(rx_cmd: Receiver<AudioCmd>, tx_msg: Sender<AudioMessage>) {
    let audio = match RaylibAudio::init_audio_device() {
        Ok(device) => device,
        Err(e) => {
            error!("failed to initialize audio device: {}", e);
            // Fail every load so setup can report it instead of waiting.
            for cmd in rx_cmd.iter() {
                match cmd {
                    AudioCmd::LoadMusic { id, .. } => {
                        let _ = tx_msg.send(AudioMessage::MusicLoadFailed {
                            id,
                            error: e.to_string(),
                        });
                    }
                    AudioCmd::LoadFx { id, .. } => {
                        let _ = tx_msg.send(AudioMessage::FxLoadFailed {
                            id,
                            error: e.to_string(),
                        });
                    }
                    AudioCmd::Shutdown => break,
                    _ => {}
                }
            }
            return;
        }
    };

    info!("audio thread starting (id={:?})", std::thread::current().id());

    let mut musics: FxHashMap<String, Music> = FxHashMap::default();
    let mut playing: FxHashSet<String> = FxHashSet::default();
    let mut looped: FxHashSet<String> = FxHashSet::default();
    let mut sounds: FxHashMap<String, Sound> = FxHashMap::default();
    let mut fx_looped: FxHashSet<String> = FxHashSet::default();

    'run: loop {
        // 1) Drain commands
        for cmd in rx_cmd.try_iter() {
            match cmd {
                AudioCmd::LoadMusic { id, path } => match audio.new_music(&path) {
                    Ok(music) => {
                        debug!("music loaded id='{}' path='{}'", id, path);
                        musics.insert(id.clone(), music);
                        let _ = tx_msg.send(AudioMessage::MusicLoaded { id });
                    }
                    Err(e) => {
                        warn!("music load failed id='{}' path='{}': {}", id, path, e);
                        let _ = tx_msg.send(AudioMessage::MusicLoadFailed {
                            id,
                            error: e.to_string(),
                        });
                    }
                },
                AudioCmd::PlayMusic {
                    id,
                    looped: want_loop,
                } => {
                    if let Some(music) = musics.get(&id) {
                        debug!("music play id='{}' looped={}", id, want_loop);
                        music.seek_stream(0.0);
                        music.play_stream();
                        playing.insert(id.clone());
                        if want_loop {
                            looped.insert(id.clone());
                        } else {
                            looped.remove(&id);
                        }
                        let _ = tx_msg.send(AudioMessage::MusicPlayStarted { id });
                    } else {
                        warn!("music play failed id='{}': not loaded", id);
                    }
                }
                AudioCmd::LoadFx { id, path } => match audio.new_sound(&path) {
                    Ok(sound) => {
                        debug!("fx loaded id='{}' path='{}'", id, path);
                        sounds.insert(id.clone(), sound);
                        let _ = tx_msg.send(AudioMessage::FxLoaded { id });
                    }
                    Err(e) => {
                        warn!("fx load failed id='{}' path='{}': {}", id, path, e);
                        let _ = tx_msg.send(AudioMessage::FxLoadFailed {
                            id,
                            error: e.to_string(),
                        });
                    }
                },
                AudioCmd::PlayFxLooped { id } => {
                    if let Some(sound) = sounds.get(&id) {
                        debug!("fx loop start id='{}'", id);
                        if !sound.is_playing() {
                            sound.play();
                        }
                        fx_looped.insert(id);
                    } else {
                        warn!("fx loop failed id='{}': not loaded", id);
                    }
                }
                AudioCmd::StopFx { id } => {
                    if let Some(sound) = sounds.get(&id) {
                        debug!("fx stop id='{}'", id);
                        sound.stop();
                        fx_looped.remove(&id);
                        let _ = tx_msg.send(AudioMessage::FxStopped { id });
                    }
                }
                AudioCmd::VolumeFx { id, vol } => {
                    if let Some(sound) = sounds.get(&id) {
                        sound.set_volume(vol.clamp(0.0, 1.0));
                    }
                }
                AudioCmd::Shutdown => {
                    info!("audio shutdown requested");
                    break 'run;
                }
            }
        }

        // 2) Pump streaming and detect ends.
        //    `update_stream()` must be called regularly while playing.
        let mut ended: Vec<String> = Vec::new();
        for id in playing.iter() {
            if let Some(music) = musics.get(id) {
                if music.is_stream_playing() {
                    music.update_stream();
                } else if music.get_time_played() >= music.get_time_length() - 0.01 {
                    ended.push(id.clone());
                }
            }
        }
        for id in ended {
            if looped.contains(&id) {
                if let Some(music) = musics.get(&id) {
                    music.seek_stream(0.0);
                    music.play_stream();
                }
            } else {
                debug!("music finished id='{}'", id);
                playing.remove(&id);
                let _ = tx_msg.send(AudioMessage::MusicFinished { id });
            }
        }

        // 3) Restart looped sound effects that ran out.
        for id in fx_looped.iter() {
            if let Some(sound) = sounds.get(id) {
                if !sound.is_playing() {
                    sound.play();
                }
            }
        }

        std::thread::sleep(std::time::Duration::from_millis(10));
    } // 'run

    for music in musics.values() {
        music.stop_stream();
    }
    musics.clear();
    sounds.clear();

    info!("audio thread exiting (id={:?})", std::thread::current().id());
    // handles drop before `audio`, closing the device last
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_world() -> (World, Entity) {
        let mut world = World::new();
        world.insert_resource(FootstepAudio::new("steps"));
        world.insert_resource(Messages::<AudioCmd>::default());
        let player = world
            .spawn((InputControlled::new(500.0), Signals::default()))
            .id();
        (world, player)
    }

    fn run_footsteps(world: &mut World) -> Vec<AudioCmd> {
        let mut schedule = Schedule::default();
        schedule.add_systems(footstep_audio);
        schedule.run(world);
        world.resource_mut::<Messages<AudioCmd>>().drain().collect()
    }

    fn set_moving(world: &mut World, player: Entity, moving: bool) {
        world
            .get_mut::<Signals>(player)
            .unwrap()
            .set_flag_to(MOVING, moving);
    }

    #[test]
    fn test_idle_sends_nothing() {
        let (mut world, _) = make_world();
        assert!(run_footsteps(&mut world).is_empty());
    }

    #[test]
    fn test_start_and_stop_are_edge_triggered() {
        let (mut world, player) = make_world();

        set_moving(&mut world, player, true);
        assert_eq!(
            run_footsteps(&mut world),
            vec![AudioCmd::PlayFxLooped { id: "steps".into() }]
        );
        assert!(run_footsteps(&mut world).is_empty());
        assert!(world.resource::<FootstepAudio>().playing);

        set_moving(&mut world, player, false);
        assert_eq!(
            run_footsteps(&mut world),
            vec![AudioCmd::StopFx { id: "steps".into() }]
        );
        assert!(run_footsteps(&mut world).is_empty());
    }
}
