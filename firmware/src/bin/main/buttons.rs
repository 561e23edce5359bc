//! GPIO edge interrupts feeding the debounced input controller.
//!
//! The handler only timestamps the edge and sets the per-button atomic
//! latch; everything else happens in the cooperative main loop.

use core::cell::RefCell;

use critical_section::Mutex;
use esp_hal::gpio::{Event, Input};
use esp_hal::handler;
use kinelog_core::input::{ButtonId, InputController};

/// Shared with the main loop, which polls and clears the latches. The
/// window matches `LoggerConfig::default().debounce_ms`.
pub static INPUT: InputController = InputController::new(200);

struct Buttons {
    confirm: Input<'static>,
    back: Input<'static>,
    aux: Input<'static>,
}

static BUTTONS: Mutex<RefCell<Option<Buttons>>> = Mutex::new(RefCell::new(None));

/// Arm falling-edge interrupts and park the pins where the handler can
/// reach them.
pub fn install(mut confirm: Input<'static>, mut back: Input<'static>, mut aux: Input<'static>) {
    critical_section::with(|cs| {
        confirm.listen(Event::FallingEdge);
        back.listen(Event::FallingEdge);
        aux.listen(Event::FallingEdge);
        BUTTONS.borrow_ref_mut(cs).replace(Buttons { confirm, back, aux });
    });
}

#[handler]
pub fn on_gpio_interrupt() {
    let now_ms = esp_hal::time::Instant::now()
        .duration_since_epoch()
        .as_millis() as u32;

    critical_section::with(|cs| {
        let mut buttons = BUTTONS.borrow_ref_mut(cs);
        let Some(buttons) = buttons.as_mut() else {
            return;
        };
        if buttons.confirm.is_interrupt_set() {
            buttons.confirm.clear_interrupt();
            INPUT.on_edge(ButtonId::Confirm, now_ms);
        }
        if buttons.back.is_interrupt_set() {
            buttons.back.clear_interrupt();
            INPUT.on_edge(ButtonId::Back, now_ms);
        }
        if buttons.aux.is_interrupt_set() {
            buttons.aux.clear_interrupt();
            INPUT.on_edge(ButtonId::Auxiliary, now_ms);
        }
    });
}
