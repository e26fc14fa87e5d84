// crates/flame_audio/src/lib.rs

use flame_core::AudioSink;
use log::info;
use std::f32::consts::TAU;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tinyaudio::prelude::*;

// ============================================================================
//  CONFIGURACIÓN Y ERRORES
// ============================================================================

#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub sample_rate: usize,
    pub channels: usize,
    /// Muestras por canal en cada callback (latencia)
    pub channel_sample_count: usize,
    pub amplitude: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            channels: 2,
            channel_sample_count: 512, // Baja latencia
            amplitude: 0.1,
        }
    }
}

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Failed to open audio device: {0}")]
    Device(String),
}

// ============================================================================
//  FRECUENCIA COMPARTIDA (hilo principal <-> callback de audio)
// ============================================================================

/// Frecuencia en Hz guardada como bits de f32 en un atómico.
#[derive(Debug, Clone, Default)]
pub struct SharedFrequency(Arc<AtomicU32>);

impl SharedFrequency {
    pub fn set(&self, hz: f32) {
        self.0.store(hz.to_bits(), Ordering::Relaxed);
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }
}

// ============================================================================
//  OSCILADOR
// ============================================================================

pub struct SineOscillator {
    sample_rate: f32,
    amplitude: f32,
    phase: f32,
}

impl SineOscillator {
    pub fn new(sample_rate: usize, amplitude: f32) -> Self {
        Self {
            sample_rate: sample_rate as f32,
            amplitude,
            phase: 0.0,
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Siguiente muestra. Frecuencia <= 0 es silencio y congela la fase.
    /// La fase se mantiene en [0, 2π] aunque el paso supere una vuelta (hz > sample_rate).
    pub fn next_sample(&mut self, hz: f32) -> f32 {
        if hz <= 0.0 {
            return 0.0;
        }
        let sample = self.amplitude * self.phase.sin();
        let step = (TAU * hz / self.sample_rate).rem_euclid(TAU);
        self.phase = (self.phase + step).rem_euclid(TAU);
        sample
    }

    /// Rellena un buffer entrelazado: la misma muestra en todos los canales.
    pub fn fill(&mut self, data: &mut [f32], channels: usize, hz: f32) {
        for frame in data.chunks_mut(channels.max(1)) {
            let sample = self.next_sample(hz);
            frame.fill(sample);
        }
    }
}

// ============================================================================
//  DISPOSITIVO DE AUDIO
// ============================================================================

pub struct FlameAudio {
    frequency: SharedFrequency,
    // Mantener vivo: al soltarlo se cierra el stream
    _device: OutputDevice,
}

impl FlameAudio {
    /// Abre el dispositivo de salida y arranca la reproducción (en silencio).
    pub fn new(config: AudioConfig) -> Result<Self, AudioError> {
        let frequency = SharedFrequency::default();
        let shared = frequency.clone();
        let channels = config.channels;
        let mut oscillator = SineOscillator::new(config.sample_rate, config.amplitude);

        let device = run_output_device(
            OutputDeviceParameters {
                channels_count: config.channels,
                sample_rate: config.sample_rate,
                channel_sample_count: config.channel_sample_count,
            },
            move |data| oscillator.fill(data, channels, shared.get()),
        )
        .map_err(|e| AudioError::Device(e.to_string()))?;

        info!(
            "Audio device opened: {} Hz, {} channels, {} samples/buffer",
            config.sample_rate, config.channels, config.channel_sample_count
        );

        Ok(Self {
            frequency,
            _device: device,
        })
    }
}

impl AudioSink for FlameAudio {
    fn set_tone_frequency(&mut self, hz: f32) {
        self.frequency.set(hz);
    }
}
