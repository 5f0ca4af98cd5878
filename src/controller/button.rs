//! Momentary or latching button

use crate::controller::config::{ControllerConfig, ControllerKind};
use crate::controller::state::ControllerState;
use crate::controller::strategy::ControlStrategy;
use crate::controller::surface::Surface;

/// Binary value: 1 while held (spring) or while toggled on (latching)
#[derive(Debug, Default, Clone, Copy)]
pub struct ButtonStrategy;

impl ControlStrategy for ButtonStrategy {
    fn on_start(&mut self, state: &mut ControllerState, config: &ControllerConfig, _surface: &mut dyn Surface) {
        state.value = if config.spring || state.is_active { 1.0 } else { 0.0 };
    }

    fn on_move(&mut self, _state: &mut ControllerState, _config: &ControllerConfig, _surface: &mut dyn Surface) {}

    fn on_end(&mut self, state: &mut ControllerState, config: &ControllerConfig, _surface: &mut dyn Surface) {
        if config.spring {
            state.value = 0.0;
        }
    }

    fn tracks_drag(&self) -> bool {
        false
    }

    fn kind(&self) -> ControllerKind {
        ControllerKind::Button
    }
}

#[cfg(test)]
mod tests {
    use crate::controller::config::ControllerOptions;
    use crate::controller::controller::Controller;
    use crate::controller::event::PointerEvent;
    use crate::controller::surface::HeadlessSurface;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn button(options: ControllerOptions) -> (Controller, Rc<RefCell<Vec<f64>>>) {
        let values = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&values);
        let options = options.on_input(move |state| sink.borrow_mut().push(state.value));

        let mut controller = Controller::new(options, Box::new(HeadlessSurface::default())).unwrap();
        controller.init();
        (controller, values)
    }

    #[test]
    fn test_spring_press_release_fires_twice() {
        let (mut controller, values) = button(ControllerOptions::button("a"));

        assert!(controller.handle_start(&PointerEvent::new(1, 5.0, 5.0)));
        assert_eq!(controller.state().value, 1.0);
        assert!(controller.handle_end(&PointerEvent::new(1, 5.0, 5.0)));

        assert_eq!(*values.borrow(), vec![1.0, 0.0]);
        assert_eq!(controller.state().value, 0.0);
        assert!(!controller.state().is_active);
    }

    #[test]
    fn test_latching_toggles_across_presses() {
        let (mut controller, _) = button(ControllerOptions::button("toggle").spring(false));
        let event = PointerEvent::new(3, 0.0, 0.0);

        let mut seen = Vec::new();
        for _ in 0..2 {
            controller.handle_start(&event);
            controller.handle_end(&event);
            seen.push((controller.state().is_active, controller.state().value));
        }
        controller.handle_start(&event);
        seen.push((controller.state().is_active, controller.state().value));

        assert_eq!(seen, vec![(true, 1.0), (false, 0.0), (true, 1.0)]);
    }

    #[test]
    fn test_second_press_while_held_is_ignored() {
        let (mut controller, values) = button(ControllerOptions::button("toggle").spring(false));

        assert!(controller.handle_start(&PointerEvent::new(1, 0.0, 0.0)));
        assert!(!controller.handle_start(&PointerEvent::new(2, 0.0, 0.0)));
        assert!(controller.state().is_active);
        assert_eq!(values.borrow().len(), 1);
    }

    #[test]
    fn test_moves_do_not_produce_output() {
        let (mut controller, values) = button(ControllerOptions::button("a"));

        controller.handle_start(&PointerEvent::new(1, 0.0, 0.0));
        assert!(!controller.handle_move(&PointerEvent::new(1, 30.0, 0.0)));
        assert!(!controller.state().is_drag);
        assert_eq!(values.borrow().len(), 1);
    }
}
