//! Piezo buzzer on a PWM channel.
//!
//! Tones are square waves at 50 % duty. [`Tone::play_tone`] only starts the
//! note and records when it must stop; the drive loop calls
//! [`Piezo::service`] to silence it once the deadline passes, so the
//! interaction cycle never blocks on audio.

use crate::config::{INTRO_CHIME, INTRO_GAP_MS};
use crate::hal::Tone;
use defmt::debug;
use embassy_nrf::pwm::{Instance, Prescaler, SimplePwm};
use embassy_time::{Duration, Instant, Timer};

/// PWM counter clock with `Prescaler::Div16`.
const PWM_CLOCK_HZ: u32 = 1_000_000;

pub struct Piezo<'d, T: Instance> {
    pwm: SimplePwm<'d, T>,
    stop_at: Option<Instant>,
}

impl<'d, T: Instance> Piezo<'d, T> {
    pub fn new(pwm: SimplePwm<'d, T>) -> Self {
        pwm.set_prescaler(Prescaler::Div16);
        pwm.disable();
        Self { pwm, stop_at: None }
    }

    /// When the current note must end, if one is playing.
    pub fn deadline(&self) -> Option<Instant> {
        self.stop_at
    }

    /// Silence the note if its deadline has passed.
    pub fn service(&mut self) {
        if self.stop_at.is_some_and(|t| Instant::now() >= t) {
            self.stop();
        }
    }

    pub fn stop(&mut self) {
        self.pwm.disable();
        self.stop_at = None;
    }

    /// Power-on chime. Blocks the caller for its whole length.
    pub async fn play_chime(&mut self) {
        for (hz, ms) in INTRO_CHIME {
            self.play_tone(hz, ms);
            Timer::after(Duration::from_millis(ms as u64)).await;
            self.stop();
            Timer::after(Duration::from_millis(INTRO_GAP_MS)).await;
        }
    }
}

impl<T: Instance> Tone for Piezo<'_, T> {
    fn play_tone(&mut self, frequency_hz: u32, duration_ms: u32) {
        if frequency_hz == 0 || duration_ms == 0 {
            return;
        }
        let top = (PWM_CLOCK_HZ / frequency_hz).clamp(2, i16::MAX as u32) as u16;
        debug!("piezo: {} Hz for {} ms", frequency_hz, duration_ms);
        self.pwm.set_max_duty(top);
        self.pwm.set_duty(0, top / 2);
        self.pwm.enable();
        self.stop_at = Some(Instant::now() + Duration::from_millis(duration_ms as u64));
    }
}
