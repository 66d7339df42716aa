/// Sound engine: fire-and-forget effects via rodio.
///
/// Each effect is looked up as a WAV file in the assets directory
/// (`move.wav`, `key.wav`, `trap.wav`, `level.wav`). A missing or
/// undecodable file is logged and replaced by a procedurally generated
/// 8-bit style buffer.
///
/// Compile without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

#[cfg(feature = "sound")]
mod inner {
    use std::f32::consts::TAU;
    use std::io::Cursor;
    use std::path::Path;
    use std::sync::Arc;

    use log::{debug, warn};
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;

    /// In-memory WAV buffers for each effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_move: Arc<Vec<u8>>,
        sfx_key: Arc<Vec<u8>>,
        sfx_trap: Arc<Vec<u8>>,
        sfx_level: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        /// `None` when no audio device is available.
        pub fn new(assets_dir: &Path) -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("audio disabled: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_move: load_effect(assets_dir, "move.wav", gen_move),
                sfx_key: load_effect(assets_dir, "key.wav", gen_key),
                sfx_trap: load_effect(assets_dir, "trap.wav", gen_trap),
                sfx_level: load_effect(assets_dir, "level.wav", gen_level),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        pub fn play_move(&self) { self.play(&self.sfx_move); }
        pub fn play_key(&self) { self.play(&self.sfx_key); }
        pub fn play_trap(&self) { self.play(&self.sfx_trap); }
        pub fn play_level(&self) { self.play(&self.sfx_level); }
    }

    /// Read `dir/name` if it decodes, otherwise synthesize `fallback`.
    pub(super) fn load_effect(dir: &Path, name: &str, fallback: fn() -> Vec<f32>) -> Arc<Vec<u8>> {
        let path = dir.join(name);
        match std::fs::read(&path) {
            Ok(bytes) => match Decoder::new(Cursor::new(bytes.clone())) {
                Ok(_) => {
                    debug!("loaded sound {}", path.display());
                    return Arc::new(bytes);
                }
                Err(e) => warn!("cannot decode {}: {e}; using built-in effect", path.display()),
            },
            Err(e) => warn!("cannot load {}: {e}; using built-in effect", path.display()),
        }
        Arc::new(make_wav(&fallback()))
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators — all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    fn tone(freq: f32, duration: f32, volume: f32, out: &mut Vec<f32>) {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32).powf(0.5);
            // sine + 3rd harmonic for a square-ish retro timbre
            let wave = (t * freq * TAU).sin() * 0.7 + (t * freq * 3.0 * TAU).sin() * 0.3;
            out.push(wave * env * volume);
        }
    }

    /// Footstep: very short low tick
    pub(super) fn gen_move() -> Vec<f32> {
        let mut samples = Vec::new();
        tone(220.0, 0.025, 0.12, &mut samples);
        samples
    }

    /// Key pickup: quick ascending arpeggio C6→E6→G6
    pub(super) fn gen_key() -> Vec<f32> {
        let mut samples = Vec::new();
        for freq in [1047.0, 1319.0, 1568.0] {
            tone(freq, 0.045, 0.25, &mut samples);
        }
        samples
    }

    /// Trap: noisy descending buzz
    pub(super) fn gen_trap() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.3) as usize;
        let mut rng: u32 = 0x5eed;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 420.0 - t * 300.0;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let buzz = (ti * freq * TAU).sin().signum();
                // Simple LCG noise
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                (buzz * 0.6 + noise * 0.4) * (1.0 - t).powf(0.7) * 0.25
            })
            .collect()
    }

    /// Level clear: ascending fanfare C5→E5→G5→C6 with a held top note
    pub(super) fn gen_level() -> Vec<f32> {
        let mut samples = Vec::new();
        for freq in [523.0, 659.0, 784.0] {
            tone(freq, 0.09, 0.3, &mut samples);
        }
        tone(1047.0, 0.3, 0.3, &mut samples);
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder — wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    pub(super) fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API — compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new(_assets_dir: &std::path::Path) -> Option<Self> { Some(SoundEngine) }
    pub fn play_move(&self) {}
    pub fn play_key(&self) {}
    pub fn play_trap(&self) {}
    pub fn play_level(&self) {}
}
