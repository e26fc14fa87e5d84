// crates/flame-core/src/tests.rs
#[cfg(test)]
mod tests {
    use crate::map::*;
    use crate::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct TestVideo { calls: Vec<u32> }
    impl VideoSink for TestVideo {
        fn set_background_color(&mut self, rgba: u32) { self.calls.push(rgba); }
    }

    #[derive(Default)]
    struct TestAudio { calls: Vec<f32> }
    impl AudioSink for TestAudio {
        fn set_tone_frequency(&mut self, hz: f32) { self.calls.push(hz); }
    }

    struct TestPad { buttons: u32 }
    impl InputSource for TestPad {
        fn button_state(&self) -> u32 { self.buttons }
    }

    #[test]
    fn test_endian_helpers() {
        assert_eq!(pack32_be([0xDE, 0xAD, 0xBE, 0xEF]), 0xDEAD_BEEF);
        assert_eq!(unpack32_be(0x1122_3344), [0x11, 0x22, 0x33, 0x44]);
        assert_eq!(pack32_be(unpack32_be(0x8000_0001)), 0x8000_0001);
    }

    #[test]
    fn test_ram_word_and_raw_layout() {
        let mut bus = AddressSpace::new();
        bus.write32(MEM2_CACHED_BASE + 0x100, 0xCAFE_F00D);
        assert_eq!(bus.read32(MEM2_CACHED_BASE + 0x100), 0xCAFE_F00D);
        assert_eq!(&bus.ram(Region::Mem2).bytes()[0x100..0x104], &[0xCA, 0xFE, 0xF0, 0x0D]);
        // MEM1 intacta
        assert_eq!(bus.ram(Region::Mem1).read32(0x100), Some(0));
        assert_eq!(bus.bus_error(), None);
    }

    #[test]
    fn test_unaligned_word_straddles_bytes() {
        let mut bus = AddressSpace::new();
        bus.write32(MEM1_CACHED_BASE, 0x0011_2233);
        bus.write32(MEM1_CACHED_BASE + 4, 0x4455_6677);
        assert_eq!(bus.read32(MEM1_UNCACHED_BASE + 2), 0x2233_4455);
    }

    #[test]
    fn test_background_color_hook() {
        let mut bus = AddressSpace::new();
        let video = Rc::new(RefCell::new(TestVideo::default()));
        bus.bind_video(&video);

        bus.write32(REG_VIDEO_BG_COLOR, 0x1122_33FF);
        assert_eq!(video.borrow().calls, vec![0x1122_33FF]);
        assert_eq!(bus.read32(REG_VIDEO_BG_COLOR), 0x1122_33FF);
        assert_eq!(bus.background_color(), 0x1122_33FF);
    }

    #[test]
    fn test_unbound_registers_still_store() {
        let mut bus = AddressSpace::new();
        bus.write32(REG_VIDEO_BG_COLOR, 0xFF00_00FF);
        bus.write32(REG_AUDIO_FREQ, 880);
        assert_eq!(bus.read32(REG_VIDEO_BG_COLOR), 0xFF00_00FF);
        assert_eq!(bus.read32(REG_AUDIO_FREQ), 880);
        assert_eq!(bus.read32(REG_INPUT_STATE), 0);
        assert_eq!(bus.bus_error(), None);
    }

    #[test]
    fn test_tone_hook_gets_numeric_frequency() {
        let mut bus = AddressSpace::new();
        let audio = Rc::new(RefCell::new(TestAudio::default()));
        bus.bind_audio(&audio);

        bus.write32(REG_AUDIO_FREQ, 440);
        bus.write32(REG_AUDIO_FREQ, 0);
        assert_eq!(audio.borrow().calls, vec![440.0, 0.0]);
        assert_eq!(bus.tone_frequency(), 0);
    }

    #[test]
    fn test_input_register_is_read_only() {
        let mut bus = AddressSpace::new();
        let pad = Rc::new(RefCell::new(TestPad { buttons: 0x11 }));
        bus.bind_input(&pad);

        bus.write32(REG_VIDEO_BG_COLOR, 0x0000_00FF);
        bus.write32(REG_AUDIO_FREQ, 440);
        bus.write32(REG_INPUT_STATE, 0xFFFF_FFFF);
        // El intento rechazado no toca los registros almacenados
        assert_eq!(bus.background_color(), 0x0000_00FF);
        assert_eq!(bus.tone_frequency(), 440);
        assert_eq!(
            bus.bus_error(),
            Some(BusFault::ProtectedWrite { register: Register::InputState, value: 0xFFFF_FFFF })
        );
        assert_eq!(bus.read32(REG_INPUT_STATE), 0x11);

        // Cada lectura vuelve a consultar al periférico
        pad.borrow_mut().buttons = 0x8000_0000;
        assert_eq!(bus.read32(REG_INPUT_STATE), 0x8000_0000);
    }

    #[test]
    fn test_rebind_and_unbind() {
        let mut bus = AddressSpace::new();
        let first = Rc::new(RefCell::new(TestVideo::default()));
        let second = Rc::new(RefCell::new(TestVideo::default()));

        bus.bind_video(&first);
        bus.write32(REG_VIDEO_BG_COLOR, 1);
        bus.bind_video(&second);
        bus.write32(REG_VIDEO_BG_COLOR, 2);
        bus.unbind_video();
        bus.write32(REG_VIDEO_BG_COLOR, 3);

        assert_eq!(first.borrow().calls, vec![1]);
        assert_eq!(second.borrow().calls, vec![2]);
        assert_eq!(bus.read32(REG_VIDEO_BG_COLOR), 3);

        bus.set_video_binding(None);
        bus.write32(REG_VIDEO_BG_COLOR, 4);
        assert_eq!(second.borrow().calls, vec![2]);
    }

    #[test]
    fn test_dropped_peripheral_degrades() {
        let mut bus = AddressSpace::new();
        let pad = Rc::new(RefCell::new(TestPad { buttons: 0x3 }));
        bus.bind_input(&pad);
        assert_eq!(bus.read32(REG_INPUT_STATE), 0x3);

        drop(pad);
        assert_eq!(bus.read32(REG_INPUT_STATE), 0);
    }

    #[test]
    fn test_faults_latch_and_ack() {
        let mut bus = AddressSpace::new();
        assert_eq!(bus.read32(0x0000_0000), 0);
        assert_eq!(bus.bus_error(), Some(BusFault::UnmappedRead { address: 0 }));

        bus.write32(0x0D00_000C, 0x55);
        let fault = bus.bus_error();
        assert_eq!(fault, Some(BusFault::UnmappedWrite { address: 0x0D00_000C, value: 0x55 }));
        assert_eq!(fault.map(|f| f.address()), Some(0x0D00_000C));

        bus.ack_bus_error();
        assert_eq!(bus.bus_error(), None);

        let tail = MEM2_UNCACHED_BASE + MEM2_SIZE - 2;
        assert_eq!(bus.read32(tail), 0);
        assert_eq!(
            bus.bus_error(),
            Some(BusFault::OutOfRange { region: Region::Mem2, access: Access::Read, address: tail })
        );
    }

    #[test]
    fn test_fault_messages() {
        let fault = BusFault::OutOfRange { region: Region::Mem1, access: Access::Write, address: 0x817F_FFFF };
        assert_eq!(fault.to_string(), "MEM1 write out of range: 0x817FFFFF");
        let fault = BusFault::UnmappedRead { address: 0x1234 };
        assert_eq!(fault.to_string(), "Unhandled read from address 0x00001234");
        let fault = BusFault::ProtectedWrite { register: Register::InputState, value: 1 };
        assert_eq!(fault.address(), REG_INPUT_STATE);
    }
}
