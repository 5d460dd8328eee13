use std::str::FromStr;

use anyhow::{anyhow, Context};

use crate::instrument::Instrument;
use crate::note::{Velocity, MAX_VELOCITY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// The built-in synthesizer.
    Synth,
    /// A system MIDI output port.
    Midi,
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "synth" => Ok(Backend::Synth),
            "midi" => Ok(Backend::Midi),
            other => Err(anyhow!("unknown backend {:?}, expected `synth` or `midi`", other)),
        }
    }
}

/// Startup settings, overridable through `KEYMIDI_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend: Backend,
    pub device: usize,
    pub instrument: Instrument,
    pub velocity: Velocity,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            backend: Backend::Synth,
            device: 0,
            instrument: Instrument::ACOUSTIC_GRAND_PIANO,
            velocity: MAX_VELOCITY,
        }
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();
        if let Some(value) = lookup("KEYMIDI_BACKEND") {
            settings.backend = value.parse().context("KEYMIDI_BACKEND")?;
        }
        if let Some(value) = lookup("KEYMIDI_DEVICE") {
            settings.device = value.trim().parse().context("KEYMIDI_DEVICE")?;
        }
        if let Some(value) = lookup("KEYMIDI_INSTRUMENT") {
            let id: u8 = value.trim().parse().context("KEYMIDI_INSTRUMENT")?;
            settings.instrument = Instrument::new(id)
                .ok_or_else(|| anyhow!("KEYMIDI_INSTRUMENT: program {} is above 127", id))?;
        }
        if let Some(value) = lookup("KEYMIDI_VELOCITY") {
            let velocity: Velocity = value.trim().parse().context("KEYMIDI_VELOCITY")?;
            if velocity > MAX_VELOCITY {
                return Err(anyhow!("KEYMIDI_VELOCITY: {} is above 127", velocity));
            }
            settings.velocity = velocity;
        }
        Ok(settings)
    }
}
