use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use lockfree::prelude::spsc;

use crate::device::MidiDriver;
use crate::error::{DeviceError, Result};
use crate::midi::{MidiEvent, ShortMessage};
use crate::synth::Synthesiser;

/// Plays through the built-in synthesizer on the default audio output.
pub struct SynthDriver {
    host: cpal::Host,
    stream: Option<cpal::Stream>,
    tx: Option<spsc::Sender<MidiEvent>>,
}

impl SynthDriver {
    pub fn new() -> Self {
        SynthDriver {
            host: cpal::default_host(),
            stream: None,
            tx: None,
        }
    }
}

impl Default for SynthDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MidiDriver for SynthDriver {
    fn device_count(&self) -> usize {
        usize::from(self.host.default_output_device().is_some())
    }

    fn device_name(&self, _index: usize) -> Option<String> {
        self.host.default_output_device().and_then(|d| d.name().ok())
    }

    fn open(&mut self, _index: usize) -> Result<()> {
        let device = self
            .host
            .default_output_device()
            .ok_or_else(|| DeviceError::Device("no output device available".into()))?;
        let config = device
            .default_output_config()
            .map_err(|e| DeviceError::Device(e.to_string()))?;

        let (tx, rx) = spsc::create();
        let synth = Synthesiser::with_default_voice(config.sample_rate().0, rx)
            .map_err(|e| DeviceError::Device(e.to_string()))?;
        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => run::<f32>(&device, &config.into(), synth),
            cpal::SampleFormat::I16 => run::<i16>(&device, &config.into(), synth),
            cpal::SampleFormat::U16 => run::<u16>(&device, &config.into(), synth),
        }?;
        stream.play().map_err(|e| DeviceError::Device(e.to_string()))?;

        self.stream = Some(stream);
        self.tx = Some(tx);
        Ok(())
    }

    fn send_short_message(&mut self, message: ShortMessage) -> Result<()> {
        let tx = self.tx.as_mut().ok_or(DeviceError::NotOpen)?;
        match MidiEvent::decode(message) {
            Some(event) => tx.send(event).map_err(|_| DeviceError::Rejected {
                message: message.raw(),
                reason: "synth stopped".into(),
            }),
            None => {
                log::debug!("synth ignores {:#08x}", message.raw());
                Ok(())
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        self.tx = None;
        self.stream = None;
        Ok(())
    }
}

fn run<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut synth: Synthesiser,
) -> Result<cpal::Stream>
where
    T: cpal::Sample,
{
    let channels = config.channels as usize;
    let err_fn = |err| log::error!("an error occurred on stream: {}", err);

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                synth.process_messages();
                // Mono synth, same sample on every channel of a frame.
                for frame in data.chunks_mut(channels) {
                    let value: T = cpal::Sample::from::<f32>(&synth.next_sample());
                    frame.fill(value);
                }
            },
            err_fn,
        )
        .map_err(|e| DeviceError::Device(e.to_string()))
}
