//! Quadrature rotary encoder.
//!
//! Wiring (see [`config`](crate::config)): A and B on two GPIOs with
//! pull-ups, push button active-low. A sampling task reads A/B every
//! `ENCODER_SAMPLE_MS`, decodes Gray-code transitions and pushes one step
//! per detent into a [`RotaryAccumulator`]. The engine drains it once per
//! cycle through [`KnobInput`].
//!
//! ```text
//!   A  ‾‾|__|‾‾|__       state = A<<1 | B
//!   B  ‾|__|‾‾|__|‾      00 → 01 → 11 → 10 → 00   one detent = 4 transitions
//! ```

use crate::config::STEPS_PER_NOTCH;

/// Direction of each (previous, current) state pair. Invalid jumps count 0.
const TRANSITIONS: [i8; 16] = [0, -1, 1, 0, 1, 0, 0, -1, -1, 0, 0, 1, 0, 1, -1, 0];

/// Turns raw A/B samples into whole detent steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuadratureDecoder {
    state: u8,
    partial: i8,
}

impl QuadratureDecoder {
    /// Start from the current pin levels.
    pub fn new(a: bool, b: bool) -> Self {
        Self {
            state: Self::encode(a, b),
            partial: 0,
        }
    }

    fn encode(a: bool, b: bool) -> u8 {
        ((a as u8) << 1) | b as u8
    }

    /// Feed one sample. Returns `±1` once a full detent has been turned.
    pub fn update(&mut self, a: bool, b: bool) -> i32 {
        let next = Self::encode(a, b);
        let index = ((self.state << 2) | next) as usize;
        self.state = next;
        self.partial += TRANSITIONS[index];

        if self.partial >= STEPS_PER_NOTCH {
            self.partial = 0;
            1
        } else if self.partial <= -STEPS_PER_NOTCH {
            self.partial = 0;
            -1
        } else {
            0
        }
    }
}

#[cfg(feature = "embedded")]
pub use self::firmware::*;

#[cfg(feature = "embedded")]
mod firmware {
    use super::QuadratureDecoder;
    use crate::config::ENCODER_SAMPLE_MS;
    use crate::hal::{InputDevice, RotaryAccumulator};
    use embassy_nrf::gpio::Input;
    use embassy_time::{Duration, Ticker};

    /// Sample the encoder pins forever, pushing detents into `steps`.
    pub async fn sample_encoder(a: Input<'static>, b: Input<'static>, steps: &RotaryAccumulator) -> ! {
        let mut decoder = QuadratureDecoder::new(a.is_high(), b.is_high());
        let mut ticker = Ticker::every(Duration::from_millis(ENCODER_SAMPLE_MS));
        loop {
            let step = decoder.update(a.is_high(), b.is_high());
            if step != 0 {
                steps.push(step);
            }
            ticker.next().await;
        }
    }

    /// Push button plus the shared step accumulator.
    pub struct KnobInput<'d> {
        button: Input<'d>,
        steps: &'d RotaryAccumulator,
    }

    impl<'d> KnobInput<'d> {
        pub fn new(button: Input<'d>, steps: &'d RotaryAccumulator) -> Self {
            Self { button, steps }
        }
    }

    impl InputDevice for KnobInput<'_> {
        fn poll_rotation_delta(&mut self) -> i32 {
            self.steps.drain()
        }

        fn poll_raw_button_level(&mut self) -> bool {
            // Active-low with pull-up.
            self.button.is_low()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive the decoder through a sequence of (A, B) levels.
    fn feed(dec: &mut QuadratureDecoder, seq: &[(bool, bool)]) -> i32 {
        seq.iter().map(|&(a, b)| dec.update(a, b)).sum()
    }

    const FORWARD: [(bool, bool); 4] = [(false, true), (true, true), (true, false), (false, false)];
    const BACKWARD: [(bool, bool); 4] = [(true, false), (true, true), (false, true), (false, false)];

    #[test]
    fn one_detent_per_four_transitions() {
        let mut dec = QuadratureDecoder::new(false, false);
        assert_eq!(dec.update(false, true), 0);
        assert_eq!(dec.update(true, true), 0);
        assert_eq!(dec.update(true, false), 0);
        assert_eq!(dec.update(false, false), -1);
    }

    #[test]
    fn directions_are_opposite() {
        let mut dec = QuadratureDecoder::new(false, false);
        let fwd = feed(&mut dec, &FORWARD);
        let back = feed(&mut dec, &BACKWARD);
        assert_eq!(fwd, -back);
        assert_ne!(fwd, 0);
    }

    #[test]
    fn repeated_samples_do_not_count() {
        let mut dec = QuadratureDecoder::new(false, false);
        for _ in 0..10 {
            assert_eq!(dec.update(false, false), 0);
        }
    }

    #[test]
    fn bounce_cancels_out() {
        let mut dec = QuadratureDecoder::new(false, false);
        let seq = [(false, true), (false, false), (false, true), (false, false)];
        assert_eq!(feed(&mut dec, &seq), 0);
        assert_eq!(feed(&mut dec, &FORWARD), -1);
    }
}
