use bitflags::bitflags;
use flame_core::InputSource;
use minifb::Key;
use std::collections::HashMap;

// ============================================================================
//  MÁSCARA DE BOTONES (REGISTRO $0D00_0004)
// ============================================================================

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WiiButtons: u32 {
        const UP       = 1 << 0;
        const DOWN     = 1 << 1;
        const LEFT     = 1 << 2;
        const RIGHT    = 1 << 3;
        const A        = 1 << 4; // Sube el tono
        const B        = 1 << 5; // Baja el tono
        const TOGGLE   = 1 << 6; // Espacio: audio on/off
        const QUIT     = 1 << 31; // Ventana cerrada o Escape
    }
}

// ============================================================================
//  GESTOR DE INPUT (INPUT MANAGER)
// ============================================================================

pub struct FlameInput {
    // Estado actual del mando virtual
    pub buttons: WiiButtons,

    // Configuración de Mapeo (Teclado -> Botón Virtual)
    key_map: HashMap<Key, WiiButtons>,
}

impl Default for FlameInput {
    fn default() -> Self {
        Self::new()
    }
}

impl FlameInput {
    /// Crea un nuevo gestor de entrada con el mapeo por defecto
    pub fn new() -> Self {
        let mut input = Self {
            buttons: WiiButtons::empty(),
            key_map: HashMap::new(),
        };
        input.load_default_mapping();
        input
    }

    /// Flechas + A/B + Espacio. Escape siempre es QUIT.
    fn load_default_mapping(&mut self) {
        self.map(Key::Up, WiiButtons::UP);
        self.map(Key::Down, WiiButtons::DOWN);
        self.map(Key::Left, WiiButtons::LEFT);
        self.map(Key::Right, WiiButtons::RIGHT);

        self.map(Key::A, WiiButtons::A);
        self.map(Key::B, WiiButtons::B);
        self.map(Key::Space, WiiButtons::TOGGLE);

        self.map(Key::Escape, WiiButtons::QUIT);
    }

    /// Asocia una tecla física a un botón virtual
    pub fn map(&mut self, key: Key, button: WiiButtons) {
        self.key_map.insert(key, button);
    }

    /// Recalcula el estado a partir de las teclas mantenidas en este tick
    pub fn update(&mut self, keys: &[Key], window_open: bool) {
        self.buttons = WiiButtons::empty();

        for key in keys {
            if let Some(btn) = self.key_map.get(key) {
                self.buttons.insert(*btn);
            }
        }

        if !window_open {
            self.buttons.insert(WiiButtons::QUIT);
        }
    }

    pub fn should_quit(&self) -> bool {
        self.buttons.contains(WiiButtons::QUIT)
    }
}

impl InputSource for FlameInput {
    fn button_state(&self) -> u32 {
        self.buttons.bits()
    }
}
