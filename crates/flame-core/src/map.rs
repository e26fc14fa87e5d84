// crates/flame-core/src/map.rs
use log::trace;
use std::fmt;

// Wii Memory Map (Physical + aliases)
// $8000_0000 - $817F_FFFF: MEM1 (24MB, cached)
// $C000_0000 - $C17F_FFFF: MEM1 (24MB, uncached)
// $9000_0000 - $93FF_FFFF: MEM2 (64MB, cached)
// $D000_0000 - $D3FF_FFFF: MEM2 (64MB, uncached)
// $0D00_0000             : Video background color (RGBA)
// $0D00_0004             : Input state (read only)
// $0D00_0008             : Audio tone frequency
// Everything else -> Unmapped

pub const MEM1_SIZE: u32 = 24 * 1024 * 1024;
pub const MEM2_SIZE: u32 = 64 * 1024 * 1024;

pub const MEM1_CACHED_BASE: u32 = 0x8000_0000;
pub const MEM1_UNCACHED_BASE: u32 = 0xC000_0000;
pub const MEM2_CACHED_BASE: u32 = 0x9000_0000;
pub const MEM2_UNCACHED_BASE: u32 = 0xD000_0000;

pub const REG_VIDEO_BG_COLOR: u32 = 0x0D00_0000;
pub const REG_INPUT_STATE: u32 = 0x0D00_0004;
pub const REG_AUDIO_FREQ: u32 = 0x0D00_0008;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Mem1,
    Mem2,
}

impl Region {
    pub const fn size(self) -> u32 {
        match self {
            Region::Mem1 => MEM1_SIZE,
            Region::Mem2 => MEM2_SIZE,
        }
    }

    /// Máscara de offset. Para MEM1 (24MB) no es una potencia de dos:
    /// el bit 23 queda fuera y $80_0000-$FF_FFFF se pliega sobre $00_0000.
    pub const fn mask(self) -> u32 {
        self.size() - 1
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Mem1 => f.write_str("MEM1"),
            Region::Mem2 => f.write_str("MEM2"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    BackgroundColor,
    InputState,
    ToneFrequency,
}

impl Register {
    pub const fn address(self) -> u32 {
        match self {
            Register::BackgroundColor => REG_VIDEO_BG_COLOR,
            Register::InputState => REG_INPUT_STATE,
            Register::ToneFrequency => REG_AUDIO_FREQ,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::BackgroundColor => f.write_str("background color"),
            Register::InputState => f.write_str("input state"),
            Register::ToneFrequency => f.write_str("tone frequency"),
        }
    }
}

/// Resultado de decodificar una dirección del bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Ram { region: Region, offset: u32 },
    Register(Register),
    Unmapped,
}

#[derive(Debug, Clone, Copy)]
enum Decode {
    /// Ventana `[base, base + size)` de una región de RAM
    Window { base: u32, region: Region },
    /// Coincidencia exacta, sin máscara
    Exact { register: Register },
}

/// Una fila de la tabla de decodificación.
#[derive(Debug, Clone, Copy)]
pub struct MapEntry {
    pub name: &'static str,
    decode: Decode,
}

impl MapEntry {
    const fn window(name: &'static str, base: u32, region: Region) -> Self {
        Self {
            name,
            decode: Decode::Window { base, region },
        }
    }

    const fn register(name: &'static str, register: Register) -> Self {
        Self {
            name,
            decode: Decode::Exact { register },
        }
    }

    pub fn matches(&self, address: u32) -> bool {
        match self.decode {
            Decode::Window { base, region } => address
                .checked_sub(base)
                .is_some_and(|delta| delta < region.size()),
            Decode::Exact { register } => address == register.address(),
        }
    }

    /// Solo válido si `matches(address)` es cierto.
    pub fn resolve(&self, address: u32) -> Target {
        match self.decode {
            Decode::Window { region, .. } => Target::Ram {
                region,
                offset: address & region.mask(),
            },
            Decode::Exact { register } => Target::Register(register),
        }
    }
}

/// Tabla de decodificación, evaluada en orden: las ventanas de RAM
/// siempre ganan a los registros aunque llegaran a solaparse.
pub const MEMORY_MAP: [MapEntry; 7] = [
    MapEntry::window("MEM1 cached", MEM1_CACHED_BASE, Region::Mem1),
    MapEntry::window("MEM1 uncached", MEM1_UNCACHED_BASE, Region::Mem1),
    MapEntry::window("MEM2 cached", MEM2_CACHED_BASE, Region::Mem2),
    MapEntry::window("MEM2 uncached", MEM2_UNCACHED_BASE, Region::Mem2),
    MapEntry::register("VI background color", Register::BackgroundColor),
    MapEntry::register("SI input state", Register::InputState),
    MapEntry::register("AI tone frequency", Register::ToneFrequency),
];

pub fn classify(address: u32) -> Target {
    classify_with(&MEMORY_MAP, address)
}

/// Primera fila de la tabla que acepta `address`.
pub fn find_entry(table: &[MapEntry], address: u32) -> Option<&MapEntry> {
    table.iter().find(|entry| entry.matches(address))
}

/// Igual que `classify`, pero sobre una tabla arbitraria (útil en tests de prioridad).
pub fn classify_with(table: &[MapEntry], address: u32) -> Target {
    match find_entry(table, address) {
        Some(entry) => {
            trace!("0x{:08X} -> {}", address, entry.name);
            entry.resolve(address)
        }
        None => Target::Unmapped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_take_priority_over_registers() {
        // Ventana colocada encima del registro: gana la primera fila
        let shadowed = [
            MapEntry::window("MEM1", 0x0D00_0000, Region::Mem1),
            MapEntry::register("bg", Register::BackgroundColor),
        ];
        assert_eq!(
            classify_with(&shadowed, REG_VIDEO_BG_COLOR),
            Target::Ram { region: Region::Mem1, offset: 0x0D00_0000 & Region::Mem1.mask() }
        );

        let reversed = [shadowed[1], shadowed[0]];
        assert_eq!(
            classify_with(&reversed, REG_VIDEO_BG_COLOR),
            Target::Register(Register::BackgroundColor)
        );
    }

    #[test]
    fn test_window_edges() {
        assert!(MEMORY_MAP[0].matches(MEM1_CACHED_BASE));
        assert!(MEMORY_MAP[0].matches(MEM1_CACHED_BASE + MEM1_SIZE - 1));
        assert!(!MEMORY_MAP[0].matches(MEM1_CACHED_BASE + MEM1_SIZE));
        assert!(!MEMORY_MAP[0].matches(MEM1_CACHED_BASE - 1));
        assert_eq!(classify(MEM2_UNCACHED_BASE + MEM2_SIZE), Target::Unmapped);
    }

    #[test]
    fn test_find_entry_names_window() {
        let name = |address| find_entry(&MEMORY_MAP, address).map(|entry| entry.name);
        assert_eq!(name(MEM1_CACHED_BASE), Some("MEM1 cached"));
        assert_eq!(name(MEM2_UNCACHED_BASE + 4), Some("MEM2 uncached"));
        assert_eq!(name(REG_AUDIO_FREQ), Some("AI tone frequency"));
        assert_eq!(name(0x0000_0000), None);
    }

    #[test]
    fn test_registers_need_exact_match() {
        assert_eq!(classify(REG_INPUT_STATE), Target::Register(Register::InputState));
        assert_eq!(classify(REG_INPUT_STATE + 1), Target::Unmapped);
        assert_eq!(classify(REG_AUDIO_FREQ), Target::Register(Register::ToneFrequency));
        assert_eq!(classify(0x0000_0000), Target::Unmapped);
    }

    #[test]
    fn test_mem1_mask_folds_middle_block() {
        // 24MB - 1 = 0x017F_FFFF: el bit 23 no sobrevive a la máscara
        assert_eq!(
            classify(MEM1_CACHED_BASE + 0x0080_0010),
            Target::Ram { region: Region::Mem1, offset: 0x10 }
        );
        assert_eq!(
            classify(MEM1_UNCACHED_BASE + 0x0100_0010),
            Target::Ram { region: Region::Mem1, offset: 0x0100_0010 }
        );
    }
}
