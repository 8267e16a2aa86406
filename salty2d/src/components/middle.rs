use std::any::Any;

use crate::component::{Component, ComponentHeader, ComponentKind, ComponentParent, Phases};

/// Keeps the parent's middle point equal to `position + size / 2`.
pub struct RecalculateMiddleComponent {
    header: ComponentHeader,
}

impl RecalculateMiddleComponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            header: ComponentHeader::new(name, ComponentKind::Core),
        }
    }
}

impl Component for RecalculateMiddleComponent {
    fn header(&self) -> &ComponentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut ComponentHeader {
        &mut self.header
    }

    fn phases(&self) -> Phases {
        Phases::TICK
    }

    fn on_fixed_tick(&mut self, parent: &mut ComponentParent) {
        let middle = parent.transform().centre();
        parent.set_middle(middle);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
