// crates/flame-core/src/address_space.rs
use crate::map::{classify, Region, Register, Target};
use crate::peripheral::{AudioSink, Binding, InputSource, VideoSink};
use crate::ram::RamRegion;
use crate::{Access, BusFault, MemoryBus};
use log::{trace, warn};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// The Wii physical address space: MEM1 + MEM2 (each reachable through a
/// cached and an uncached window) and three memory-mapped I/O registers.
///
/// Peripherals are borrowed weakly; the host owns them and may bind,
/// rebind or drop them at any time. Hooks run inline inside `write32`.
pub struct AddressSpace {
    mem1: RamRegion,
    mem2: RamRegion,
    bg_color: u32,
    tone_freq: u32,
    video: Binding<dyn VideoSink>,
    audio: Binding<dyn AudioSink>,
    input: Binding<dyn InputSource>,
    fault: Cell<Option<BusFault>>,
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressSpace {
    pub fn new() -> Self {
        Self {
            mem1: RamRegion::new(Region::Mem1),
            mem2: RamRegion::new(Region::Mem2),
            bg_color: 0x0000_0000, // black
            tone_freq: 0,
            video: Binding::new(),
            audio: Binding::new(),
            input: Binding::new(),
            fault: Cell::new(None),
        }
    }

    // --- Peripheral bindings ---

    pub fn bind_video<V: VideoSink + 'static>(&mut self, video: &Rc<RefCell<V>>) {
        let weak: Weak<RefCell<dyn VideoSink>> = Rc::<RefCell<V>>::downgrade(video);
        self.video.set(Some(weak));
    }

    pub fn bind_audio<A: AudioSink + 'static>(&mut self, audio: &Rc<RefCell<A>>) {
        let weak: Weak<RefCell<dyn AudioSink>> = Rc::<RefCell<A>>::downgrade(audio);
        self.audio.set(Some(weak));
    }

    pub fn bind_input<I: InputSource + 'static>(&mut self, input: &Rc<RefCell<I>>) {
        let weak: Weak<RefCell<dyn InputSource>> = Rc::<RefCell<I>>::downgrade(input);
        self.input.set(Some(weak));
    }

    pub fn set_video_binding(&mut self, video: Option<Weak<RefCell<dyn VideoSink>>>) {
        self.video.set(video);
    }

    pub fn set_audio_binding(&mut self, audio: Option<Weak<RefCell<dyn AudioSink>>>) {
        self.audio.set(audio);
    }

    pub fn set_input_binding(&mut self, input: Option<Weak<RefCell<dyn InputSource>>>) {
        self.input.set(input);
    }

    pub fn unbind_video(&mut self) {
        self.video.clear();
    }

    pub fn unbind_audio(&mut self) {
        self.audio.clear();
    }

    pub fn unbind_input(&mut self) {
        self.input.clear();
    }

    // --- Inspection ---

    pub fn ram(&self, region: Region) -> &RamRegion {
        match region {
            Region::Mem1 => &self.mem1,
            Region::Mem2 => &self.mem2,
        }
    }

    fn ram_mut(&mut self, region: Region) -> &mut RamRegion {
        match region {
            Region::Mem1 => &mut self.mem1,
            Region::Mem2 => &mut self.mem2,
        }
    }

    pub fn background_color(&self) -> u32 {
        self.bg_color
    }

    pub fn tone_frequency(&self) -> u32 {
        self.tone_freq
    }

    fn report(&self, fault: BusFault) {
        warn!("{}", fault);
        self.fault.set(Some(fault));
    }

    // --- MMIO ---

    fn read_register(&self, register: Register) -> u32 {
        match register {
            Register::BackgroundColor => self.bg_color,
            Register::InputState => self
                .input
                .with(|input| input.button_state())
                .unwrap_or(0),
            Register::ToneFrequency => self.tone_freq,
        }
    }

    fn write_register(&mut self, register: Register, value: u32) {
        match register {
            Register::BackgroundColor => {
                self.bg_color = value;
                trace!("MMIO {} <- 0x{:08X}", register, value);
                self.video.with_mut(|video| video.set_background_color(value));
            }
            Register::InputState => self.report(BusFault::ProtectedWrite { register, value }),
            Register::ToneFrequency => {
                self.tone_freq = value;
                trace!("MMIO {} <- 0x{:08X}", register, value);
                self.audio.with_mut(|audio| audio.set_tone_frequency(value as f32));
            }
        }
    }
}

impl MemoryBus for AddressSpace {
    fn bus_error(&self) -> Option<BusFault> {
        self.fault.get()
    }

    fn ack_bus_error(&mut self) {
        self.fault.set(None);
    }

    fn read32(&self, address: u32) -> u32 {
        match classify(address) {
            Target::Ram { region, offset } => match self.ram(region).read32(offset) {
                Some(value) => value,
                None => {
                    self.report(BusFault::OutOfRange {
                        region,
                        access: Access::Read,
                        address,
                    });
                    0
                }
            },
            Target::Register(register) => self.read_register(register),
            Target::Unmapped => {
                self.report(BusFault::UnmappedRead { address });
                0
            }
        }
    }

    fn write32(&mut self, address: u32, value: u32) {
        match classify(address) {
            Target::Ram { region, offset } => {
                if !self.ram_mut(region).write32(offset, value) {
                    self.report(BusFault::OutOfRange {
                        region,
                        access: Access::Write,
                        address,
                    });
                }
            }
            Target::Register(register) => self.write_register(register, value),
            Target::Unmapped => self.report(BusFault::UnmappedWrite { address, value }),
        }
    }
}
