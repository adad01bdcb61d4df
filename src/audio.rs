//! Audio system using Web Audio API
//!
//! Procedurally generated sound cues - no external files needed. One-shot
//! cues are short oscillator envelopes; the tea and milk pours are held tones
//! that run between their start and stop cues.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::{SoundCue, Tier};

/// A tone that keeps playing until stopped
struct HeldTone {
    osc: OscillatorNode,
    gain: GainNode,
}

/// Audio manager for the shop
pub struct AudioManager {
    ctx: Option<AudioContext>,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    tea: Option<HeldTone>,
    milk: Option<HeldTone>,
    music: Option<Vec<HeldTone>>,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            sfx_volume: settings.effective_sfx_volume(),
            music_volume: settings.effective_music_volume(),
            muted: false,
            tea: None,
            milk: None,
            music: None,
        }
    }

    /// Resume audio context (required after user gesture) and start music
    pub fn resume(&mut self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
        if self.music.is_none() && self.music_volume > 0.0 && !self.muted {
            self.start_music();
        }
    }

    /// Re-read volumes after the player changed settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_volume = settings.effective_sfx_volume();
        self.music_volume = settings.effective_music_volume();
        if self.music_volume <= 0.0 {
            self.stop_music();
        }
    }

    /// Mute/unmute all audio; held tones are cut immediately
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            stop_tone(self.tea.take());
            stop_tone(self.milk.take());
            self.stop_music();
        }
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.sfx_volume }
    }

    /// Play a cue emitted by the simulation
    pub fn play(&mut self, cue: SoundCue) {
        match cue {
            SoundCue::TeaPourStop => return stop_tone(self.tea.take()),
            SoundCue::MilkPourStop => return stop_tone(self.milk.take()),
            _ => {}
        }

        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            SoundCue::BobaDrop => play_boba_drop(ctx, vol),
            SoundCue::IceDrop => play_ice_drop(ctx, vol),
            SoundCue::Serve => play_serve(ctx, vol),
            SoundCue::Verdict(tier) => play_verdict(ctx, vol, tier),
            SoundCue::SessionEnd => play_session_end(ctx, vol),
            SoundCue::TeaPourStart => {
                if self.tea.is_none() {
                    self.tea = start_pour(ctx, vol, 220.0);
                }
            }
            SoundCue::MilkPourStart => {
                if self.milk.is_none() {
                    self.milk = start_pour(ctx, vol, 330.0);
                }
            }
            SoundCue::TeaPourStop | SoundCue::MilkPourStop => {}
        }
    }

    /// Quiet two-note pad under the game
    fn start_music(&mut self) {
        let Some(ctx) = &self.ctx else { return };
        let vol = self.music_volume * 0.05;
        let tones: Vec<HeldTone> = [196.0, 293.66]
            .iter()
            .filter_map(|&freq| {
                let (osc, gain) = create_osc(ctx, freq, OscillatorType::Sine)?;
                gain.gain().set_value(vol);
                osc.start().ok()?;
                Some(HeldTone { osc, gain })
            })
            .collect();
        log::debug!("Music started ({} voices)", tones.len());
        self.music = Some(tones);
    }

    fn stop_music(&mut self) {
        if let Some(tones) = self.music.take() {
            for tone in tones {
                stop_tone(Some(tone));
            }
        }
    }
}

// === Sound generators ===

/// Create an oscillator with gain envelope
fn create_osc(
    ctx: &AudioContext,
    freq: f32,
    osc_type: OscillatorType,
) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;

    osc.set_type(osc_type);
    osc.frequency().set_value(freq);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    Some((osc, gain))
}

fn stop_tone(tone: Option<HeldTone>) {
    if let Some(tone) = tone {
        tone.gain.gain().set_value(0.0);
        tone.osc.stop().ok();
    }
}

/// Pour - soft wobbling triangle until released
fn start_pour(ctx: &AudioContext, vol: f32, freq: f32) -> Option<HeldTone> {
    let (osc, gain) = create_osc(ctx, freq, OscillatorType::Triangle)?;
    let t = ctx.current_time();

    gain.gain().set_value_at_time(0.01, t).ok();
    gain.gain()
        .linear_ramp_to_value_at_time(vol * 0.15, t + 0.1)
        .ok();
    osc.start().ok()?;
    Some(HeldTone { osc, gain })
}

/// Boba drop - short low plop
fn play_boba_drop(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 300.0, OscillatorType::Sine) else {
        return;
    };
    let t = ctx.current_time();

    gain.gain().set_value_at_time(vol * 0.4, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 0.12)
        .ok();
    osc.frequency().set_value_at_time(300.0, t).ok();
    osc.frequency()
        .exponential_ramp_to_value_at_time(90.0, t + 0.1)
        .ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.15).ok();
}

/// Ice drop - bright clink
fn play_ice_drop(ctx: &AudioContext, vol: f32) {
    for (i, freq) in [2200.0, 3300.0].iter().enumerate() {
        let delay = i as f64 * 0.03;
        if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Sine) {
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.2).ok();
        }
    }
}

/// Serve - rising whoosh
fn play_serve(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 200.0, OscillatorType::Triangle) else {
        return;
    };
    let t = ctx.current_time();

    gain.gain().set_value_at_time(vol * 0.4, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 0.3)
        .ok();
    osc.frequency().set_value_at_time(200.0, t).ok();
    osc.frequency()
        .exponential_ramp_to_value_at_time(700.0, t + 0.25)
        .ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.35).ok();
}

/// Verdict jingle, brighter for better tiers
fn play_verdict(ctx: &AudioContext, vol: f32, tier: Tier) {
    let (notes, osc_type): (&[f32], OscillatorType) = match tier {
        Tier::Perfect => (&[523.25, 659.25, 783.99, 1046.5], OscillatorType::Triangle),
        Tier::Good => (&[523.25, 659.25, 783.99], OscillatorType::Triangle),
        Tier::Okay => (&[440.0, 523.25], OscillatorType::Sine),
        Tier::TryAgain => (&[392.0, 311.13], OscillatorType::Sine),
    };
    for (i, freq) in notes.iter().enumerate() {
        let delay = i as f64 * 0.1;
        if let Some((osc, gain)) = create_osc(ctx, *freq, osc_type) {
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.35).ok();
        }
    }
}

/// Shop closed - slow closing chord
fn play_session_end(ctx: &AudioContext, vol: f32) {
    for (i, freq) in [392.0, 493.88, 587.33, 783.99].iter().enumerate() {
        let delay = i as f64 * 0.2;
        if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Sine) {
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.8)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 1.0).ok();
        }
    }
}
