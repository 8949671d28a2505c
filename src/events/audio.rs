use bevy_ecs::message::Message;

/// Commands sent *to* the audio thread
#[derive(Message, Debug, Clone, PartialEq)]
pub enum AudioCmd {
    LoadMusic { id: String, path: String },
    PlayMusic { id: String, looped: bool },
    LoadFx { id: String, path: String },
    /// Play and restart every time the sound runs out, until [`AudioCmd::StopFx`].
    PlayFxLooped { id: String },
    StopFx { id: String },
    VolumeFx { id: String, vol: f32 },
    Shutdown,
}

/// Messages sent *back* from the audio thread
#[derive(Message, Debug, Clone, PartialEq)]
pub enum AudioMessage {
    MusicLoaded { id: String },
    MusicLoadFailed { id: String, error: String },
    MusicPlayStarted { id: String },
    MusicFinished { id: String }, // reached end for non looping
    FxLoaded { id: String },
    FxLoadFailed { id: String, error: String },
    FxStopped { id: String },
}

