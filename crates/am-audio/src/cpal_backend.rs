//! CPAL-based audio output backend.

use am_engine::{Engine, MAX_OUTPUT_CHANNELS};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{
    Device, FromSample, Sample, SampleFormat, SampleRate, SizedSample, Stream, StreamConfig,
    SupportedStreamConfig,
};

use crate::traits::{AudioError, AudioOutput, OutputRequest};

/// CPAL-based audio output.
pub struct CpalOutput {
    device: Device,
    config: StreamConfig,
    sample_format: SampleFormat,
    stream: Option<Stream>,
}

impl CpalOutput {
    /// Open the default output device.
    ///
    /// Uses a configuration with the requested channel count and rate when the
    /// device offers one, otherwise the device default.
    pub fn open(request: OutputRequest) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        let supported = match preferred_config(&device, request) {
            Some(config) => config,
            None => device
                .default_output_config()
                .map_err(|e| AudioError::DeviceInit(e.to_string()))?,
        };

        let sample_format = supported.sample_format();
        if !is_writable(sample_format) {
            return Err(AudioError::UnsupportedFormat(format!("{:?}", sample_format)));
        }
        let config: StreamConfig = supported.into();

        log::info!(
            "Audio: {} @ {}Hz, {} channel(s), {:?}",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            config.sample_rate.0,
            config.channels,
            sample_format
        );
        if config.channels != request.channels {
            log::warn!(
                "Output device opened with {} channel(s), {} requested",
                config.channels,
                request.channels
            );
        }

        Ok(Self {
            device,
            config,
            sample_format,
            stream: None,
        })
    }
}

fn is_writable(format: SampleFormat) -> bool {
    matches!(format, SampleFormat::F32 | SampleFormat::I16 | SampleFormat::U16)
}

fn preferred_config(device: &Device, request: OutputRequest) -> Option<SupportedStreamConfig> {
    let rate = SampleRate(request.sample_rate);
    device
        .supported_output_configs()
        .ok()?
        .filter(|range| range.channels() == request.channels && is_writable(range.sample_format()))
        .filter(|range| range.min_sample_rate() <= rate && rate <= range.max_sample_rate())
        .max_by_key(|range| range.sample_format() == SampleFormat::F32)
        .map(|range| range.with_sample_rate(rate))
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    mut engine: Engine,
) -> Result<Stream, AudioError>
where
    T: SizedSample + FromSample<i16>,
{
    let channels = config.channels as usize;
    let mut frame = [0i16; MAX_OUTPUT_CHANNELS];

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                for chunk in data.chunks_mut(channels) {
                    let width = chunk.len().min(MAX_OUTPUT_CHANNELS);
                    engine.next_frame(&mut frame[..width]);
                    // Device channels beyond the engine's width stay silent.
                    for (i, sample) in chunk.iter_mut().enumerate() {
                        *sample = if i < width {
                            T::from_sample(frame[i])
                        } else {
                            T::EQUILIBRIUM
                        };
                    }
                }
            },
            |err| log::error!("Audio stream error: {}", err),
            None,
        )
        .map_err(|e| AudioError::StreamCreate(e.to_string()))
}

impl AudioOutput for CpalOutput {
    fn sample_rate(&self) -> u32 {
        self.config.sample_rate.0
    }

    fn channels(&self) -> Option<u16> {
        Some(self.config.channels).filter(|&c| c > 0)
    }

    fn start(&mut self, engine: Engine) -> Result<(), AudioError> {
        let stream = match self.sample_format {
            SampleFormat::F32 => build_stream::<f32>(&self.device, &self.config, engine)?,
            SampleFormat::I16 => build_stream::<i16>(&self.device, &self.config, engine)?,
            SampleFormat::U16 => build_stream::<u16>(&self.device, &self.config, engine)?,
            other => return Err(AudioError::UnsupportedFormat(format!("{:?}", other))),
        };
        stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        self.stream = Some(stream);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        if let Some(stream) = self.stream.take() {
            stream.pause().map_err(|e| AudioError::Playback(e.to_string()))?;
            log::info!("Audio stream stopped");
        }
        Ok(())
    }
}
