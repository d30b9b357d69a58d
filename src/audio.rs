use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    SampleFormat,
};

use crate::synth::Mixer;

/// Owns the output stream. Sounds are queued on the [`Mixer`]; without a
/// device they are simply never heard.
pub struct AudioManager {
    current_device: Option<cpal::Device>,
    configuration: Option<cpal::StreamConfig>,
    stream: Option<cpal::Stream>,
    mixer: Mixer,
}

impl Default for AudioManager {
    fn default() -> Self {
        let host = cpal::default_host();
        let current_device = host.default_output_device();
        let configuration = current_device
            .as_ref()
            .and_then(|device| device.supported_output_configs().ok())
            .and_then(|configs| {
                let configs: Vec<_> = configs.collect();
                configs
                    .iter()
                    .find(|config| config.sample_format() == SampleFormat::F32)
                    .or_else(|| configs.first())
                    .cloned()
            })
            .map(|config| config.with_max_sample_rate().config());

        Self {
            current_device,
            configuration,
            stream: None,
            mixer: Mixer::default(),
        }
    }
}

impl AudioManager {
    pub fn build_output_stream(&mut self) -> Result<(), cpal::BuildStreamError> {
        let device = self
            .current_device
            .as_ref()
            .ok_or(cpal::BuildStreamError::DeviceNotAvailable)?;

        let config = self
            .configuration
            .as_ref()
            .ok_or(cpal::BuildStreamError::InvalidArgument)?;

        let mixer = self.mixer.clone();
        let channels = config.channels as usize;
        let sample_rate = config.sample_rate.0 as f32;

        let stream = device.build_output_stream(
            config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                mixer.render(data, channels, sample_rate);
            },
            move |err| {
                log::error!("an error occurred on the output audio stream: {}", err);
            },
            None,
        )?;

        if let Err(e) = stream.play() {
            log::error!("Failed to start output stream: {}", e);
        }
        log::info!(
            "Audio output on {} ({} ch @ {} Hz)",
            device.name().unwrap_or_else(|_| "unknown device".to_string()),
            channels,
            sample_rate
        );
        self.stream = Some(stream);
        Ok(())
    }

    /// Opens the output stream, logging instead of failing when there is no
    /// usable device.
    pub fn start(&mut self) {
        if let Err(e) = self.build_output_stream() {
            log::warn!("Audio disabled: {}", e);
        }
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    pub fn mixer(&self) -> Mixer {
        self.mixer.clone()
    }

    pub fn device_name(&self) -> Option<String> {
        self.current_device
            .as_ref()
            .and_then(|device| device.name().ok())
    }
}
