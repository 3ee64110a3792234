use std::sync::Arc;

use anyhow::Context;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::audio_api::{command_queue, MixerHandle};
use crate::loader::SampleSource;
use crate::shared::{CHANNELS, SAMPLE_RATE};

mod engine;
mod frame;
mod sample_buffer;
mod sample_id;
mod voice;

pub use engine::Mixer;
pub use frame::MixFrame;
pub use sample_buffer::PcmBuffer;
pub use sample_id::SampleId;
pub use voice::Voice;

pub struct AudioHandle {
    mixer: MixerHandle,
    _output_stream: cpal::Stream,
}

impl AudioHandle {
    pub fn mixer(&self) -> &MixerHandle {
        &self.mixer
    }
}

pub fn start_audio(source: Arc<dyn SampleSource>) -> anyhow::Result<AudioHandle> {
    let (tx, rx) = command_queue();

    let host = cpal::default_host();
    let device = host.default_output_device().context("no default output device")?;
    let supported = device.default_output_config().context("no default output config")?;
    let sample_format = supported.sample_format();

    let mut config: cpal::StreamConfig = supported.into();
    config.channels = CHANNELS as u16;
    config.sample_rate = SAMPLE_RATE;

    let mixer = Mixer::new(rx);
    let output_stream = match sample_format {
        cpal::SampleFormat::I16 => build_output_stream_i16(&device, &config, mixer)?,
        cpal::SampleFormat::F32 => build_output_stream_f32(&device, &config, mixer)?,
        other => anyhow::bail!("unsupported output sample format {other:?} (need i16 or f32)"),
    };
    output_stream.play().context("failed to play output stream")?;
    log::info!("audio output running: {sample_format:?}, {CHANNELS} ch @ {SAMPLE_RATE} Hz");

    Ok(AudioHandle {
        mixer: MixerHandle::new(tx, source),
        _output_stream: output_stream,
    })
}

// ── Output stream ─────────────────────────────────────────────────

fn build_output_stream_i16(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut mixer: Mixer,
) -> anyhow::Result<cpal::Stream> {
    let err_fn = |err| log::error!("audio output stream error: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [i16], _info: &cpal::OutputCallbackInfo| {
            mixer.render(data);
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}

fn build_output_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut mixer: Mixer,
) -> anyhow::Result<cpal::Stream> {
    let err_fn = |err| log::error!("audio output stream error: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
            mixer.render_f32(data);
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}
