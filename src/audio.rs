//! Sound cues
//!
//! The game only decides *which* cue plays and how loud. Synthesis belongs to
//! an `AudioSink`; each cue carries a small oscillator patch a backend can
//! render. The bundled `LogSink` just logs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Laser volley fired
    Laser,
    /// Bomb released
    Bomb,
    /// Enemy destroyed or rammed
    Explosion,
    /// Non-lethal hit on an enemy or the player
    Hit,
    /// Pickup collected or stage reached
    PowerUp,
    /// Run ended
    GameOver,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    /// Low-passed white noise
    Noise,
}

/// One synthesized note: a frequency sweep under a decaying gain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    /// Peak gain before the effect volume is applied
    pub gain: f32,
    /// Offset from the cue start (ms)
    pub delay_ms: f32,
    pub duration_ms: f32,
}

const fn voice(waveform: Waveform, start_hz: f32, end_hz: f32, gain: f32, duration_ms: f32) -> Voice {
    Voice {
        waveform,
        start_hz,
        end_hz,
        gain,
        delay_ms: 0.0,
        duration_ms,
    }
}

const fn note(hz: f32, delay_ms: f32) -> Voice {
    Voice {
        waveform: Waveform::Sine,
        start_hz: hz,
        end_hz: hz,
        gain: 0.1,
        delay_ms,
        duration_ms: 300.0,
    }
}

const LASER: [Voice; 1] = [voice(Waveform::Square, 800.0, 800.0, 0.1, 100.0)];
const BOMB: [Voice; 1] = [voice(Waveform::Sawtooth, 400.0, 100.0, 0.15, 200.0)];
const EXPLOSION: [Voice; 1] = [voice(Waveform::Noise, 1000.0, 100.0, 0.3, 300.0)];
const HIT: [Voice; 1] = [voice(Waveform::Square, 200.0, 50.0, 0.2, 150.0)];
const POWER_UP: [Voice; 1] = [voice(Waveform::Sine, 400.0, 800.0, 0.1, 200.0)];
/// Descending five-note phrase
const GAME_OVER: [Voice; 5] = [
    note(400.0, 0.0),
    note(350.0, 150.0),
    note(300.0, 300.0),
    note(250.0, 450.0),
    note(200.0, 600.0),
];

impl SoundEffect {
    /// Synth patch for this cue
    pub fn voices(self) -> &'static [Voice] {
        match self {
            SoundEffect::Laser => &LASER,
            SoundEffect::Bomb => &BOMB,
            SoundEffect::Explosion => &EXPLOSION,
            SoundEffect::Hit => &HIT,
            SoundEffect::PowerUp => &POWER_UP,
            SoundEffect::GameOver => &GAME_OVER,
        }
    }

    /// Total length including delayed notes (ms)
    pub fn duration_ms(self) -> f32 {
        self.voices()
            .iter()
            .map(|v| v.delay_ms + v.duration_ms)
            .fold(0.0, f32::max)
    }
}

impl fmt::Display for SoundEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SoundEffect::Laser => "laser",
            SoundEffect::Bomb => "bomb",
            SoundEffect::Explosion => "explosion",
            SoundEffect::Hit => "hit",
            SoundEffect::PowerUp => "power-up",
            SoundEffect::GameOver => "game over",
        };
        f.write_str(name)
    }
}

/// Audio backend. Playback is fire-and-forget; a backend that cannot play
/// drops the cue silently.
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Headless backend: logs every cue
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!(
            "sfx {} at {:.2} ({} voices, {} ms)",
            effect,
            volume,
            effect.voices().len(),
            effect.duration_ms()
        );
    }
}

/// Volume and mute handling in front of a sink
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(LogSink))
    }
}

impl fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioManager")
            .field("master_volume", &self.master_volume)
            .field("sfx_volume", &self.sfx_volume)
            .field("muted", &self.muted)
            .finish_non_exhaustive()
    }
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// The menu's sound toggle
    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.set_muted(!enabled);
    }

    pub fn is_sound_enabled(&self) -> bool {
        !self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }
}
