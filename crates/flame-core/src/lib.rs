use std::fmt;
use thiserror::Error;

pub mod address_space;
pub mod endian;
pub mod map;
pub mod peripheral;
pub mod ram;

mod tests;

pub use address_space::AddressSpace;
pub use endian::{pack32_be, unpack32_be};
pub use map::{classify, Region, Register, Target, MEMORY_MAP};
pub use peripheral::{AudioSink, Binding, InputSource, VideoSink};
pub use ram::RamRegion;

// ============================================================================
//  CONTRATOS (TRAITS)
// ============================================================================

/// Contrato del Bus de 32 bits (Memoria + registros MMIO).
/// Todos los accesos son big-endian (PowerPC) y nunca fallan:
/// una dirección inválida devuelve 0 en lectura y se ignora en escritura.
pub trait MemoryBus {
    // --- Métodos Obligatorios ---
    fn read32(&self, addr: u32) -> u32;
    fn write32(&mut self, addr: u32, val: u32);

    // --- Bus Error Signaling (Optional) ---
    // Returns Some(fault) if the last faulting access is still pending
    fn bus_error(&self) -> Option<BusFault> {
        None
    }
    fn ack_bus_error(&mut self) {}
}

// ============================================================================
//  DIAGNÓSTICOS DEL BUS
// ============================================================================

/// Dirección del acceso que provocó el diagnóstico
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Read => f.write_str("read"),
            Access::Write => f.write_str("write"),
        }
    }
}

/// Taxonomía de fallos no fatales del bus.
/// Se registran con `log` y se retienen para que el bucle principal decida.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusFault {
    #[error("{region} {access} out of range: 0x{address:08X}")]
    OutOfRange {
        region: Region,
        access: Access,
        address: u32,
    },
    #[error("Unhandled read from address 0x{address:08X}")]
    UnmappedRead { address: u32 },
    #[error("Unhandled write to address 0x{address:08X}: value 0x{value:08X}")]
    UnmappedWrite { address: u32, value: u32 },
    #[error("Ignoring write to {register} register: value 0x{value:08X}")]
    ProtectedWrite { register: Register, value: u32 },
}

impl BusFault {
    /// Dirección física que originó el fallo
    pub fn address(&self) -> u32 {
        match *self {
            BusFault::OutOfRange { address, .. }
            | BusFault::UnmappedRead { address }
            | BusFault::UnmappedWrite { address, .. } => address,
            BusFault::ProtectedWrite { register, .. } => register.address(),
        }
    }
}
