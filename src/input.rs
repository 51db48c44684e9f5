//! Pointer input shared between the event side and the render side.

use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};

/// Lock-free accumulator for drag deltas.
///
/// Writers call [`push`](Self::push) from whatever thread delivers touch or
/// cursor events; the renderer calls [`take`](Self::take) once per frame. Each
/// axis is an f32 stored as bits in an `AtomicU32`, updated with a CAS loop so
/// concurrent pushes are never lost.
#[derive(Debug, Clone, Default)]
pub struct TouchDelta {
    x: Arc<AtomicU32>,
    y: Arc<AtomicU32>,
}

impl TouchDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, dx: f32, dy: f32) {
        add_f32(&self.x, dx);
        add_f32(&self.y, dy);
    }

    /// Returns everything pushed since the previous call and resets to zero.
    pub fn take(&self) -> (f32, f32) {
        let x = f32::from_bits(self.x.swap(0f32.to_bits(), Ordering::AcqRel));
        let y = f32::from_bits(self.y.swap(0f32.to_bits(), Ordering::AcqRel));
        (x, y)
    }
}

fn add_f32(cell: &AtomicU32, value: f32) {
    let mut current = cell.load(Ordering::Acquire);
    loop {
        let next = (f32::from_bits(current) + value).to_bits();
        match cell.compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire) {
            Ok(_) => return,
            Err(actual) => current = actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_drains_accumulated_pushes() {
        let touch = TouchDelta::new();
        touch.push(1.5, -2.0);
        touch.push(0.5, 1.0);
        assert_eq!(touch.take(), (2.0, -1.0));
        assert_eq!(touch.take(), (0.0, 0.0));
    }

    #[test]
    fn clones_share_the_same_accumulator() {
        let ui_side = TouchDelta::new();
        let render_side = ui_side.clone();
        let handle = std::thread::spawn(move || {
            for _ in 0..1000 {
                ui_side.push(1.0, 2.0);
            }
        });
        handle.join().unwrap();
        assert_eq!(render_side.take(), (1000.0, 2000.0));
    }
}
