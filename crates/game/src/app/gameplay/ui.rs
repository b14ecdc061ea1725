use hexwalk_engine::Vec2;

pub(crate) const SKIP_TURN_LABEL: &str = "SKIP TURN";
const SKIP_TURN_ORIGIN: Vec2 = Vec2::new(100.0, 50.0);
const SKIP_TURN_SIZE: Vec2 = Vec2::new(100.0, 100.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ButtonAction {
    SkipTurn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ButtonId(usize);

/// Screen-space rectangle with an inclusive hit region.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct UiButton {
    origin: Vec2,
    size: Vec2,
    label: &'static str,
    action: ButtonAction,
    hovered: bool,
}

impl UiButton {
    pub(crate) fn new(origin: Vec2, size: Vec2, label: &'static str, action: ButtonAction) -> Self {
        Self {
            origin,
            size,
            label,
            action,
            hovered: false,
        }
    }

    pub(crate) fn is_hit(&self, point: Vec2) -> bool {
        point.x >= self.origin.x
            && point.x <= self.origin.x + self.size.x
            && point.y >= self.origin.y
            && point.y <= self.origin.y + self.size.y
    }

    pub(crate) fn origin(&self) -> Vec2 {
        self.origin
    }

    pub(crate) fn size(&self) -> Vec2 {
        self.size
    }

    pub(crate) fn label(&self) -> &'static str {
        self.label
    }

    pub(crate) fn action(&self) -> ButtonAction {
        self.action
    }

    pub(crate) fn is_hovered(&self) -> bool {
        self.hovered
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Ui {
    buttons: Vec<UiButton>,
}

impl Default for Ui {
    fn default() -> Self {
        Self::with_buttons(vec![UiButton::new(
            SKIP_TURN_ORIGIN,
            SKIP_TURN_SIZE,
            SKIP_TURN_LABEL,
            ButtonAction::SkipTurn,
        )])
    }
}

impl Ui {
    pub(crate) fn with_buttons(buttons: Vec<UiButton>) -> Self {
        Self { buttons }
    }

    pub(crate) fn buttons(&self) -> &[UiButton] {
        &self.buttons
    }

    pub(crate) fn get(&self, id: ButtonId) -> Option<&UiButton> {
        self.buttons.get(id.0)
    }

    /// Topmost button under `point`; later buttons draw over earlier ones, so the last hit wins.
    pub(crate) fn hit_test(&self, point: Vec2) -> Option<ButtonId> {
        self.buttons
            .iter()
            .enumerate()
            .rev()
            .find(|(_, button)| button.is_hit(point))
            .map(|(index, _)| ButtonId(index))
    }

    pub(crate) fn clear_hover(&mut self) {
        for button in &mut self.buttons {
            button.hovered = false;
        }
    }

    pub(crate) fn set_hovered(&mut self, id: ButtonId) {
        self.clear_hover();
        if let Some(button) = self.buttons.get_mut(id.0) {
            button.hovered = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_region_includes_edges() {
        let button = UiButton::new(
            Vec2::new(100.0, 50.0),
            Vec2::new(100.0, 100.0),
            "B",
            ButtonAction::SkipTurn,
        );

        assert!(button.is_hit(Vec2::new(100.0, 50.0)));
        assert!(button.is_hit(Vec2::new(200.0, 150.0)));
        assert!(button.is_hit(Vec2::new(150.0, 100.0)));
        assert!(!button.is_hit(Vec2::new(99.9, 100.0)));
        assert!(!button.is_hit(Vec2::new(150.0, 150.1)));
    }

    #[test]
    fn default_ui_has_skip_turn_button() {
        let ui = Ui::default();
        let id = ui.hit_test(Vec2::new(120.0, 60.0)).expect("skip button");
        let button = ui.get(id).expect("button");

        assert_eq!(button.action(), ButtonAction::SkipTurn);
        assert_eq!(button.label(), SKIP_TURN_LABEL);
        assert_eq!(ui.hit_test(Vec2::new(10.0, 10.0)), None);
    }

    #[test]
    fn overlapping_buttons_resolve_to_last() {
        let ui = Ui::with_buttons(vec![
            UiButton::new(
                Vec2::new(0.0, 0.0),
                Vec2::new(50.0, 50.0),
                "A",
                ButtonAction::SkipTurn,
            ),
            UiButton::new(
                Vec2::new(25.0, 25.0),
                Vec2::new(50.0, 50.0),
                "B",
                ButtonAction::SkipTurn,
            ),
        ]);

        let id = ui.hit_test(Vec2::new(30.0, 30.0)).expect("hit");
        assert_eq!(ui.get(id).map(UiButton::label), Some("B"));
        let id = ui.hit_test(Vec2::new(10.0, 10.0)).expect("hit");
        assert_eq!(ui.get(id).map(UiButton::label), Some("A"));
    }

    #[test]
    fn hover_is_exclusive_and_clearable() {
        let mut ui = Ui::default();
        let id = ui.hit_test(Vec2::new(150.0, 100.0)).expect("hit");

        ui.set_hovered(id);
        assert!(ui.buttons()[0].is_hovered());

        ui.clear_hover();
        assert!(ui.buttons().iter().all(|button| !button.is_hovered()));
    }
}
