// src/app/input.rs
use super::state::{ActiveModal, App, FocusedField};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const RESULT_SCROLL_STEP: u16 = 5;

// Main key event handler method on App
impl App {
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.active_modal != ActiveModal::None {
            self.handle_modal_input(key);
            return;
        }

        // The age box swallows digits before they reach the global keys
        if self.focused_field == FocusedField::Age && self.handle_age_input(key) {
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.active_modal = ActiveModal::Help,
            KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => {
                self.focused_field = self.focused_field.next();
            }
            KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => {
                self.focused_field = self.focused_field.previous();
            }
            KeyCode::Left | KeyCode::Char('h') => self.cycle_focused(false),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => self.cycle_focused(true),
            KeyCode::Enter => {
                if self.focused_field == FocusedField::Submit {
                    self.submit();
                } else {
                    self.focused_field = self.focused_field.next();
                }
            }
            KeyCode::Char('s') => self.submit(),
            KeyCode::Char('x') => self.dismiss_newest_toast(),
            KeyCode::Char('X') => self.form.toasts_mut().clear(),
            KeyCode::PageDown => {
                self.result_scroll = self.result_scroll.saturating_add(RESULT_SCROLL_STEP);
            }
            KeyCode::PageUp => {
                self.result_scroll = self.result_scroll.saturating_sub(RESULT_SCROLL_STEP);
            }
            _ => {}
        }
    }

    // The newest toast is the one drawn with the [x] hint
    fn dismiss_newest_toast(&mut self) {
        if let Some(id) = self.form.toasts().latest().map(|t| t.id) {
            self.form.toasts_mut().remove(id);
        }
    }

    // Returns true if the key edited the age text
    fn handle_age_input(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.form.push_age_char(c);
                true
            }
            KeyCode::Backspace => {
                self.form.pop_age_char();
                true
            }
            _ => false,
        }
    }

    fn handle_modal_input(&mut self, key: KeyEvent) {
        match self.active_modal {
            ActiveModal::Help => match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter | KeyCode::Char('?') => {
                    self.active_modal = ActiveModal::None;
                }
                _ => {} // Ignore other keys in help
            },
            ActiveModal::None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitness_planner_lib::{Config, PlannerService, ToastKind};
    use std::path::PathBuf;

    fn test_app() -> App {
        App::new(PlannerService {
            config: Config::default(),
            config_path: PathBuf::from("fp-tui-test-config.toml"),
        })
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn digits_edit_age_only_when_focused() {
        let mut app = test_app();
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('5'));
        assert_eq!(app.form.input().age, "45");

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('7'));
        assert_eq!(app.form.input().age, "45");
        assert_eq!(app.focused_field, FocusedField::Gender);
    }

    #[test]
    fn letters_in_age_box_fall_through_to_navigation() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.focused_field, FocusedField::Gender);
        press(&mut app, KeyCode::Char('k'));
        assert_eq!(app.focused_field, FocusedField::Age);
    }

    #[test]
    fn arrows_cycle_select_values() {
        let mut app = test_app();
        app.focused_field = FocusedField::ExerciseFrequency;
        press(&mut app, KeyCode::Right);
        assert_eq!(app.form.input().exercise_frequency, "週4回以上");
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.form.input().exercise_frequency, "週1回");
    }

    #[test]
    fn help_modal_captures_keys_until_closed() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.active_modal, ActiveModal::Help);

        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.active_modal, ActiveModal::None);

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn toast_keys_dismiss_newest_and_clear() {
        let mut app = test_app();
        app.form.toasts_mut().add("first", ToastKind::Info);
        app.form.toasts_mut().add("second", ToastKind::Success);
        app.form.toasts_mut().add("third", ToastKind::Info);

        let newest = app.form.toasts().latest().map(|t| t.id);
        press(&mut app, KeyCode::Char('x'));
        assert!(newest.is_some_and(|id| app.form.toasts().get(id).is_none()));
        let remaining: Vec<_> = app.form.toasts().iter().map(|t| t.message.as_str()).collect();
        assert_eq!(remaining, ["first", "second"]);

        press(&mut app, KeyCode::Char('X'));
        assert!(app.form.toasts().is_empty());
    }

    #[test]
    fn ctrl_c_quits_even_inside_help() {
        let mut app = test_app();
        app.active_modal = ActiveModal::Help;
        app.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn result_scroll_saturates_at_top() {
        let mut app = test_app();
        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.result_scroll, 0);
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.result_scroll, RESULT_SCROLL_STEP);
    }
}
