// crates/flame_display/src/lib.rs

use flame_core::VideoSink;
use log::warn;
use minifb::{Key, Scale, ScaleMode, Window, WindowOptions};
use std::thread;
use std::time::{Duration, Instant};

// ============================================================================
//  CONFIGURACIÓN
// ============================================================================

#[derive(Debug, Clone)]
pub struct DisplayConfig {
    pub title: String,
    pub width: usize,
    pub height: usize,
    pub scale: WindowScale,
    pub target_fps: f64,
    pub resizable: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "Flame - Wii Memory Emulator".to_string(),
            width: 854, // Resolución Wii (16:9)
            height: 480,
            scale: WindowScale::X1,
            target_fps: 60.0,
            resizable: false,
        }
    }
}

/// Abstracción de escalas para no depender directamente de los enums de minifb fuera de esta lib
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowScale {
    X1, X2, X4, X8, FitScreen,
}

impl WindowScale {
    /// Parsea el factor de escala desde la línea de comandos ("1", "2", "4", "8", "fit")
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "1" => Some(WindowScale::X1),
            "2" => Some(WindowScale::X2),
            "4" => Some(WindowScale::X4),
            "8" => Some(WindowScale::X8),
            "fit" => Some(WindowScale::FitScreen),
            _ => None,
        }
    }
}

impl From<WindowScale> for Scale {
    fn from(s: WindowScale) -> Self {
        match s {
            WindowScale::X1 => Scale::X1,
            WindowScale::X2 => Scale::X2,
            WindowScale::X4 => Scale::X4,
            WindowScale::X8 => Scale::X8,
            WindowScale::FitScreen => Scale::FitScreen,
        }
    }
}

// ============================================================================
//  MOTOR DE DISPLAY
// ============================================================================

pub struct FlameDisplay {
    window: Window,

    width: usize,
    height: usize,
    frame: Vec<u32>,

    // Último valor del registro VI (0xRRGGBBAA)
    background: u32,

    // Control de Tiempo (Frame Limiter)
    target_micro_seconds: u128,
    last_frame_time: Instant,

    // Performance stats
    fps: FpsCounter,
}

impl FlameDisplay {
    /// Crea una nueva ventana lista para renderizar
    pub fn new(config: DisplayConfig) -> Result<Self, minifb::Error> {
        let mut opts = WindowOptions::default();
        opts.scale = config.scale.into();
        opts.resize = config.resizable;
        opts.scale_mode = ScaleMode::AspectRatioStretch; // Mantiene aspect ratio al estirar

        let window = Window::new(&config.title, config.width, config.height, opts)?;

        // Configurar timing
        let target_us = if config.target_fps > 0.0 {
            (1_000_000.0 / config.target_fps) as u128
        } else {
            0 // Sin límite
        };

        Ok(Self {
            window,
            width: config.width,
            height: config.height,
            frame: vec![0; config.width * config.height],
            background: 0x0000_0000,
            target_micro_seconds: target_us,
            last_frame_time: Instant::now(),
            fps: FpsCounter::new(Instant::now()),
        })
    }

    /// FPS medidos en el último segundo completo
    pub fn fps(&self) -> usize {
        self.fps.fps
    }

    /// Llama a esto una vez por tick: dibuja el fondo actual y sincroniza a la tasa objetivo.
    pub fn present(&mut self) {
        render_background(&mut self.frame, self.width, self.height, self.background);

        // minifb maneja el doble buffer internamente.
        if let Err(e) = self
            .window
            .update_with_buffer(&self.frame, self.width, self.height)
        {
            warn!("Display Error: {}", e);
        }

        self.limit_frame_rate();

        self.fps.tick(Instant::now());
    }

    // Dormir si el bucle va más rápido que 60Hz (o la tasa target)
    fn limit_frame_rate(&mut self) {
        if self.target_micro_seconds > 0 {
            let elapsed = self.last_frame_time.elapsed().as_micros();
            if elapsed < self.target_micro_seconds {
                let sleep_time = self.target_micro_seconds - elapsed;
                if sleep_time > 1000 {
                    thread::sleep(Duration::from_micros((sleep_time - 500) as u64));
                }
                // Spin-wait para el último microsegundo preciso
                while self.last_frame_time.elapsed().as_micros() < self.target_micro_seconds {
                    std::hint::spin_loop();
                }
            }
        }
        self.last_frame_time = Instant::now();
    }

    /// Verifica si la ventana sigue abierta (para el loop principal)
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }
}

impl VideoSink for FlameDisplay {
    fn set_background_color(&mut self, rgba: u32) {
        self.background = rgba;
    }
}

// ============================================================================
//  CONTADOR DE FPS
// ============================================================================

/// Cuenta frames y publica el total cada segundo.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    pub fps: usize,
    frame_count: usize,
    last_check: Instant,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            fps: 0,
            frame_count: 0,
            last_check: now,
        }
    }

    /// Registra un frame. Devuelve true cuando `fps` se acaba de actualizar.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.frame_count += 1;
        if now.duration_since(self.last_check).as_secs() >= 1 {
            self.fps = self.frame_count;
            self.frame_count = 0;
            self.last_check = now;
            return true;
        }
        false
    }
}

// ============================================================================
//  INPUT BRIDGE (Para flame_input)
// ============================================================================

impl FlameDisplay {
    /// Devuelve las teclas presionadas crudas (para que flame_input las mapee)
    pub fn get_keys(&self) -> Vec<Key> {
        self.window.get_keys()
    }
}

// ============================================================================
//  UTILIDADES DE PIXELES (HELPERS)
// ============================================================================

/// Recuadro de depuración (x, y, ancho, alto)
pub const DEBUG_RECT: (usize, usize, usize, usize) = (10, 10, 200, 50);
pub const DEBUG_RECT_COLOR: u32 = 0x00FF_FFFF;

/// Convierte componentes RGB (0-255) a formato u32 compatible con minifb
#[inline(always)]
pub fn rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// 0xRRGGBBAA (registro VI) -> 0x00RRGGBB (minifb). El alfa se descarta.
#[inline(always)]
pub fn rgba_to_rgb(rgba: u32) -> u32 {
    rgb((rgba >> 24) as u8, (rgba >> 16) as u8, (rgba >> 8) as u8)
}

/// Limpia el frame con el color de fondo y dibuja el contorno de depuración.
pub fn render_background(buffer: &mut [u32], width: usize, height: usize, rgba: u32) {
    buffer.fill(rgba_to_rgb(rgba));

    let (x0, y0, w, h) = DEBUG_RECT;
    let x1 = (x0 + w - 1).min(width.saturating_sub(1));
    let y1 = (y0 + h - 1).min(height.saturating_sub(1));
    if x0 >= width || y0 >= height {
        return;
    }

    for x in x0..=x1 {
        buffer[y0 * width + x] = DEBUG_RECT_COLOR;
        buffer[y1 * width + x] = DEBUG_RECT_COLOR;
    }
    for y in y0..=y1 {
        buffer[y * width + x0] = DEBUG_RECT_COLOR;
        buffer[y * width + x1] = DEBUG_RECT_COLOR;
    }
}
