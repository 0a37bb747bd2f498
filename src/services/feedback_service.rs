// ============================================================================
// FEEDBACK - Tonos sintetizados + vibración para pending/success/error
// ============================================================================
// Capa no crítica: sin AudioContext o sin navigator.vibrate todo es no-op,
// nunca bloquea ni falla el ciclo de escaneo.
// ============================================================================

use std::cell::RefCell;

use wasm_bindgen::JsValue;
use web_sys::{AudioContext, AudioContextState, OscillatorType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackCue {
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
}

impl From<Waveform> for OscillatorType {
    fn from(waveform: Waveform) -> Self {
        match waveform {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Square => OscillatorType::Square,
        }
    }
}

/// Un tono: frecuencia, forma de onda, duración y retardo desde el inicio del cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub waveform: Waveform,
    pub duration_ms: u32,
    pub offset_ms: u32,
    pub volume: f32,
}

const PENDING_TONES: &[Tone] = &[Tone {
    frequency_hz: 660.0,
    waveform: Waveform::Sine,
    duration_ms: 120,
    offset_ms: 0,
    volume: 0.12,
}];

const SUCCESS_TONES: &[Tone] = &[
    Tone {
        frequency_hz: 880.0,
        waveform: Waveform::Sine,
        duration_ms: 120,
        offset_ms: 0,
        volume: 0.25,
    },
    Tone {
        frequency_hz: 1320.0,
        waveform: Waveform::Sine,
        duration_ms: 120,
        offset_ms: 130,
        volume: 0.25,
    },
];

const ERROR_TONES: &[Tone] = &[Tone {
    frequency_hz: 220.0,
    waveform: Waveform::Square,
    duration_ms: 400,
    offset_ms: 0,
    volume: 0.2,
}];

impl FeedbackCue {
    /// Patrón de navigator.vibrate (ms on/off/on...)
    pub fn vibration_pattern(self) -> &'static [u32] {
        match self {
            FeedbackCue::Pending => &[60],
            FeedbackCue::Success => &[100, 60, 100],
            FeedbackCue::Error => &[400],
        }
    }

    pub fn tones(self) -> &'static [Tone] {
        match self {
            FeedbackCue::Pending => PENDING_TONES,
            FeedbackCue::Success => SUCCESS_TONES,
            FeedbackCue::Error => ERROR_TONES,
        }
    }
}

/// Destino de los cues (navegador en producción, grabadora en tests)
pub trait FeedbackSink {
    fn emit(&self, cue: FeedbackCue);
}

// AudioContext global: se crea al primer uso y vive toda la sesión
thread_local! {
    static AUDIO_CONTEXT: RefCell<Option<AudioContext>> = const { RefCell::new(None) };
}

/// Único punto de acceso al AudioContext compartido
fn with_audio_context<R>(f: impl FnOnce(&AudioContext) -> R) -> Option<R> {
    AUDIO_CONTEXT.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            match AudioContext::new() {
                Ok(ctx) => *slot = Some(ctx),
                Err(_) => {
                    log::debug!("🔇 [FEEDBACK] AudioContext no disponible");
                    return None;
                }
            }
        }
        slot.as_ref().map(f)
    })
}

fn play_tone(ctx: &AudioContext, tone: &Tone) -> Result<(), JsValue> {
    let start = ctx.current_time() + f64::from(tone.offset_ms) / 1000.0;
    let end = start + f64::from(tone.duration_ms) / 1000.0;

    let oscillator = ctx.create_oscillator()?;
    oscillator.set_type(tone.waveform.into());
    oscillator.frequency().set_value(tone.frequency_hz);

    let gain = ctx.create_gain()?;
    gain.gain().set_value_at_time(tone.volume, start)?;
    gain.gain().exponential_ramp_to_value_at_time(0.001, end)?;

    oscillator.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&ctx.destination())?;
    oscillator.start_with_when(start)?;
    oscillator.stop_with_when(end)?;
    Ok(())
}

fn vibrate(pattern: &[u32]) {
    let Some(navigator) = web_sys::window().map(|w| w.navigator()) else {
        return;
    };
    let supported = js_sys::Reflect::has(&navigator, &JsValue::from_str("vibrate")).unwrap_or(false);
    if !supported {
        return;
    }
    let array = pattern.iter().map(|ms| JsValue::from(*ms)).collect::<js_sys::Array>();
    navigator.vibrate_with_pattern(&array);
}

/// Emisor real: Web Audio + Vibration API
#[derive(Clone, Copy, Default)]
pub struct WebFeedback;

impl FeedbackSink for WebFeedback {
    fn emit(&self, cue: FeedbackCue) {
        vibrate(cue.vibration_pattern());

        let played = with_audio_context(|ctx| {
            // Safari/Chrome arrancan el contexto suspendido hasta un gesto del usuario
            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            cue.tones().iter().try_for_each(|tone| play_tone(ctx, tone))
        });
        if let Some(Err(e)) = played {
            log::debug!("🔇 [FEEDBACK] No se pudo reproducir {:?}: {:?}", cue, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vibration_patterns_match_outcome() {
        assert_eq!(FeedbackCue::Pending.vibration_pattern(), &[60]);
        assert_eq!(FeedbackCue::Success.vibration_pattern().len(), 3);
        let long = FeedbackCue::Error.vibration_pattern();
        assert_eq!(long.len(), 1);
        assert!(long[0] > FeedbackCue::Pending.vibration_pattern()[0]);
    }

    #[test]
    fn success_chime_ascends() {
        let tones = FeedbackCue::Success.tones();
        assert_eq!(tones.len(), 2);
        assert!(tones[1].frequency_hz > tones[0].frequency_hz);
        assert!(tones[1].offset_ms >= tones[0].duration_ms);
    }

    #[test]
    fn cues_have_distinct_first_tones() {
        let first = |cue: FeedbackCue| cue.tones()[0];
        assert_ne!(first(FeedbackCue::Pending), first(FeedbackCue::Success));
        assert_ne!(first(FeedbackCue::Success), first(FeedbackCue::Error));
        assert_eq!(first(FeedbackCue::Error).waveform, Waveform::Square);
    }
}
