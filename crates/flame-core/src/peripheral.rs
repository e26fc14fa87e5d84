// crates/flame-core/src/peripheral.rs
use log::warn;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

// ============================================================================
//  CAPACIDADES DE LOS PERIFÉRICOS (las implementa el host)
// ============================================================================

/// Video: recibe el color de fondo en formato 0xRRGGBBAA
pub trait VideoSink {
    fn set_background_color(&mut self, rgba: u32);
}

/// Audio: frecuencia del tono en Hz. 0 significa silencio.
pub trait AudioSink {
    fn set_tone_frequency(&mut self, hz: f32);
}

/// Entrada: máscara de botones actual (asignación de bits definida por el host)
pub trait InputSource {
    fn button_state(&self) -> u32;
}

// ============================================================================
//  BINDING DÉBIL (SIN PROPIEDAD)
// ============================================================================

/// Referencia opcional y no propietaria a un periférico.
/// Si el periférico se destruye, el binding se comporta como vacío.
pub struct Binding<T: ?Sized> {
    target: Option<Weak<RefCell<T>>>,
}

impl<T: ?Sized> Default for Binding<T> {
    fn default() -> Self {
        Self { target: None }
    }
}

impl<T: ?Sized> Binding<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reemplaza el binding actual. `None` lo deja inerte.
    pub fn set(&mut self, target: Option<Weak<RefCell<T>>>) {
        self.target = target;
    }

    pub fn clear(&mut self) {
        self.target = None;
    }

    pub fn is_bound(&self) -> bool {
        self.target
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    fn upgrade(&self) -> Option<Rc<RefCell<T>>> {
        self.target.as_ref()?.upgrade()
    }

    /// Acceso compartido. `None` si no hay periférico vivo o ya está prestado en mutable.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let cell = self.upgrade()?;
        let Ok(peripheral) = cell.try_borrow() else {
            warn!("Peripheral busy (mutably borrowed), skipping query");
            return None;
        };
        Some(f(&*peripheral))
    }

    /// Acceso exclusivo. `None` si no hay periférico vivo o ya está prestado.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let cell = self.upgrade()?;
        let Ok(mut peripheral) = cell.try_borrow_mut() else {
            warn!("Peripheral busy (already borrowed), skipping hook");
            return None;
        };
        Some(f(&mut *peripheral))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(u32);

    impl InputSource for Counter {
        fn button_state(&self) -> u32 {
            self.0
        }
    }

    #[test]
    fn test_dropped_peripheral_is_unbound() {
        let mut binding: Binding<dyn InputSource> = Binding::new();
        assert!(!binding.is_bound());

        let pad = Rc::new(RefCell::new(Counter(7)));
        let weak: Weak<RefCell<dyn InputSource>> = Rc::<RefCell<Counter>>::downgrade(&pad);
        binding.set(Some(weak));
        assert!(binding.is_bound());
        assert_eq!(binding.with(|p| p.button_state()), Some(7));

        drop(pad);
        assert!(!binding.is_bound());
        assert_eq!(binding.with(|p| p.button_state()), None);
    }

    #[test]
    fn test_busy_peripheral_is_skipped() {
        let mut binding: Binding<Counter> = Binding::new();
        let pad = Rc::new(RefCell::new(Counter(1)));
        binding.set(Some(Rc::downgrade(&pad)));

        let _guard = pad.borrow_mut();
        assert_eq!(binding.with(|p| p.0), None);
        assert_eq!(binding.with_mut(|p| p.0 += 1), None);
    }
}
