//! Browser binding for the wheel listener.
//!
//! The listener runs in the capture phase and is registered non-passive so
//! `preventDefault` takes effect before the page or the whiteboard sees the
//! event.

use js_sys::Function;
use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{AddEventListenerOptions, Element, WheelEvent};

use crate::host::{HostError, WheelHandler, WheelTarget};
use crate::input::WheelDelta;
use crate::lifecycle::{Disposer, TeardownError};

const WHEEL: &str = "wheel";

/// A DOM element acting as the scroll surface.
#[derive(Debug, Clone)]
pub struct ElementWheelTarget {
    element: Element,
}

impl ElementWheelTarget {
    #[must_use]
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    #[must_use]
    pub fn element(&self) -> &Element {
        &self.element
    }
}

fn delta_of(ev: &WheelEvent) -> WheelDelta {
    let dy = ev.delta_y();
    WheelDelta { dy: dy.is_finite().then_some(dy) }
}

impl WheelTarget for ElementWheelTarget {
    fn listen_wheel(&self, handler: WheelHandler) -> Result<Disposer, HostError> {
        let mut handler = handler;
        let callback = Closure::wrap(Box::new(move |ev: WheelEvent| {
            let verdict = handler(delta_of(&ev));
            if verdict.prevent_default {
                ev.prevent_default();
            }
            if verdict.stop_propagation {
                ev.stop_propagation();
            }
        }) as Box<dyn FnMut(WheelEvent)>);

        let options = AddEventListenerOptions::new();
        options.set_capture(true);
        options.set_passive(false);
        self.element
            .add_event_listener_with_callback_and_add_event_listener_options(
                WHEEL,
                callback.as_ref().unchecked_ref::<Function>(),
                &options,
            )
            .map_err(|err| HostError::Attach { what: WHEEL, reason: format!("{err:?}") })?;

        let element = self.element.clone();
        Ok(Disposer::new("wheel listener", move || {
            // `callback` is owned here so the JS function outlives the listener.
            element
                .remove_event_listener_with_callback_and_bool(WHEEL, callback.as_ref().unchecked_ref::<Function>(), true)
                .map_err(|err| TeardownError::Host { label: "wheel listener", reason: format!("{err:?}") })
        }))
    }
}
