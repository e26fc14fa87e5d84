// crates/systems/flame_wii/src/demo.rs
use flame_input::WiiButtons;

pub const TONE_STEP: u32 = 10;
pub const TONE_MIN: u32 = 100;
pub const TONE_MAX: u32 = 2000;
pub const TONE_DEFAULT: u32 = 440;

const RED_STEP: u32 = 0x0100_0000;
const GREEN_STEP: u32 = 0x0001_0000;

/// Register values the loop writes back each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterWrites {
    pub bg_color: u32,
    pub tone: u32,
}

/// Demo program state driven by the input register: arrows tint the
/// background, A/B move the tone, TOGGLE switches audio on its press edge.
pub struct DemoState {
    pub color: u32,
    pub tone: u32,
    pub audio_on: bool,
    toggle_held: bool,
}

impl Default for DemoState {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoState {
    pub fn new() -> Self {
        Self {
            color: 0x0000_0000,
            tone: TONE_DEFAULT,
            audio_on: false,
            toggle_held: false,
        }
    }

    pub fn step(&mut self, raw_buttons: u32) -> RegisterWrites {
        let buttons = WiiButtons::from_bits_truncate(raw_buttons);

        if buttons.contains(WiiButtons::UP) {
            self.color = self.color.wrapping_add(RED_STEP);
        }
        if buttons.contains(WiiButtons::DOWN) {
            self.color = self.color.wrapping_sub(RED_STEP);
        }
        if buttons.contains(WiiButtons::LEFT) {
            self.color = self.color.wrapping_add(GREEN_STEP);
        }
        if buttons.contains(WiiButtons::RIGHT) {
            self.color = self.color.wrapping_sub(GREEN_STEP);
        }

        if buttons.contains(WiiButtons::A) {
            self.tone = (self.tone + TONE_STEP).min(TONE_MAX);
        }
        if buttons.contains(WiiButtons::B) {
            self.tone = self.tone.saturating_sub(TONE_STEP).max(TONE_MIN);
        }

        let toggle = buttons.contains(WiiButtons::TOGGLE);
        if toggle && !self.toggle_held {
            self.audio_on = !self.audio_on;
        }
        self.toggle_held = toggle;

        RegisterWrites {
            bg_color: self.color,
            tone: if self.audio_on { self.tone } else { 0 },
        }
    }
}
