use crate::app::Effect;
use crate::model::RouteParams;
use crate::widgets::form::{self, ConfirmAction, FieldKind, FormState};
use crossterm::event::KeyCode;
use ratatui::crossterm::event as rt_event;
use ratatui::prelude::*;
use tui_textarea::TextArea;

/// Interactive form controller: owns the field values for one screening's
/// purchase form, routes key events, and emits a submit effect only after the
/// whole form validates.
pub struct FormWidget {
    pub form: FormState,
    pub route: RouteParams,
    remarks_ta: TextArea<'static>,
}

impl FormWidget {
    pub fn new(route: RouteParams) -> Self {
        Self {
            form: form::ticket_form(&route),
            route,
            remarks_ta: TextArea::default(),
        }
    }

    fn selected_is_textarea(&self) -> bool {
        self.form
            .fields
            .get(self.form.selected)
            .map(|f| matches!(f.kind, FieldKind::TextArea))
            .unwrap_or(false)
    }

    fn textarea_active(&self) -> bool {
        self.form.editing && self.selected_is_textarea()
    }

    fn forward_to_textarea(&mut self, code: rt_event::KeyCode) {
        let _ = self
            .remarks_ta
            .input(rt_event::KeyEvent::new(code, rt_event::KeyModifiers::NONE));
    }

    /// Commit the textarea overlay back into the remarks field (Ctrl+S).
    pub fn commit_textarea(&mut self) -> bool {
        if !self.textarea_active() {
            return false;
        }
        let text = self.remarks_ta.lines().join("\n");
        if let Some(fld) = self.form.fields.get_mut(self.form.selected) {
            fld.value = text;
        }
        self.form.editing = false;
        self.form.message = None;
        true
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, focused: bool, tick: u64) {
        // Suppress the inline cursor while the overlay editor is up
        let cursor_on = tick % 2 == 0 && !self.textarea_active();
        form::draw_form(f, area, &mut self.form, focused, cursor_on);
        if self.textarea_active() {
            self.remarks_ta.set_block(
                ratatui::widgets::Block::default()
                    .borders(ratatui::widgets::Borders::ALL)
                    .title("Editing: Remarks — Ctrl+S Save • Esc Cancel"),
            );
            let rect = centered_rect(80, 60, area);
            f.render_widget(ratatui::widgets::Clear, rect);
            f.render_widget(&self.remarks_ta, rect);
        }
    }

    pub fn on_key(&mut self, key: KeyCode) -> Vec<Effect> {
        let mut effects: Vec<Effect> = Vec::new();
        match key {
            KeyCode::Up => {
                if self.textarea_active() {
                    self.forward_to_textarea(rt_event::KeyCode::Up);
                } else if self.form.editing {
                    let sel = self.form.selected;
                    if let Some(fld) = self.form.fields.get_mut(sel) {
                        match &mut fld.kind {
                            FieldKind::Number { minimum } => {
                                step_number(&mut fld.value, 1, *minimum);
                            }
                            FieldKind::Select { cursor, .. } => {
                                if *cursor > 0 {
                                    *cursor -= 1;
                                }
                            }
                            _ => {}
                        }
                    }
                } else if self.form.selected > 0 {
                    self.form.selected -= 1;
                }
            }
            KeyCode::Down => {
                if self.textarea_active() {
                    self.forward_to_textarea(rt_event::KeyCode::Down);
                } else if self.form.editing {
                    let sel = self.form.selected;
                    if let Some(fld) = self.form.fields.get_mut(sel) {
                        match &mut fld.kind {
                            FieldKind::Number { minimum } => {
                                step_number(&mut fld.value, -1, *minimum);
                            }
                            FieldKind::Select {
                                cursor, options, ..
                            } => {
                                if *cursor + 1 < options.len() {
                                    *cursor += 1;
                                }
                            }
                            _ => {}
                        }
                    }
                } else if self.form.selected < self.form.reset_idx() {
                    self.form.selected += 1;
                }
            }
            KeyCode::Left => {
                if self.textarea_active() {
                    self.forward_to_textarea(rt_event::KeyCode::Left);
                } else if self.form.editing {
                    self.commit_select();
                } else if self.form.selected < self.form.fields.len() {
                    self.cycle_select(-1);
                } else if self.form.selected == self.form.reset_idx() {
                    self.form.selected = self.form.submit_idx();
                }
            }
            KeyCode::Right => {
                if self.textarea_active() {
                    self.forward_to_textarea(rt_event::KeyCode::Right);
                } else if self.form.editing {
                    self.commit_select();
                } else if self.form.selected < self.form.fields.len() {
                    self.cycle_select(1);
                } else if self.form.selected == self.form.submit_idx() {
                    self.form.selected = self.form.reset_idx();
                }
            }
            KeyCode::Enter => {
                if self.textarea_active() {
                    self.forward_to_textarea(rt_event::KeyCode::Enter);
                } else if self.form.selected == self.form.submit_idx() {
                    // single in-flight submission: ignore while one is running
                    if !self.form.submitting {
                        if let Some(data) = form::validate_into(&mut self.form) {
                            let payload = crate::payload::build_payload(&data, &self.route);
                            effects.push(Effect::Submit { payload });
                        }
                    }
                } else if self.form.selected == self.form.reset_idx() {
                    if self.form.confirm == Some(ConfirmAction::Reset) {
                        form::reset_to_defaults(&mut self.form);
                        self.form.confirm = None;
                        effects.push(Effect::ShowToast {
                            text: "Reset".into(),
                            level: crate::ui::ToastLevel::Info,
                            seconds: 2,
                        });
                    } else {
                        self.form.confirm = Some(ConfirmAction::Reset);
                        self.form.message =
                            Some("Press Enter to confirm Reset • Esc to cancel".into());
                    }
                } else {
                    let sel = self.form.selected;
                    if let Some(fld) = self.form.fields.get_mut(sel) {
                        match &mut fld.kind {
                            FieldKind::Text | FieldKind::Number { .. } => {
                                self.form.editing = !self.form.editing;
                            }
                            FieldKind::Select {
                                cursor, selected, ..
                            } => {
                                if self.form.editing {
                                    *selected = Some(*cursor);
                                    self.form.editing = false;
                                } else {
                                    *cursor = selected.unwrap_or(0);
                                    self.form.editing = true;
                                }
                            }
                            FieldKind::TextArea => {
                                if !self.form.editing {
                                    self.form.editing = true;
                                    self.remarks_ta = TextArea::default();
                                    if !fld.value.is_empty() {
                                        self.remarks_ta.insert_str(&fld.value);
                                    }
                                }
                            }
                        }
                    }
                }
            }
            KeyCode::Backspace => {
                if self.textarea_active() {
                    self.forward_to_textarea(rt_event::KeyCode::Backspace);
                } else if self.form.editing {
                    let sel = self.form.selected;
                    if let Some(fld) = self.form.fields.get_mut(sel) {
                        if matches!(fld.kind, FieldKind::Text | FieldKind::Number { .. }) {
                            fld.value.pop();
                        }
                    }
                }
            }
            KeyCode::Esc => {
                if self.form.confirm.is_some() {
                    self.form.confirm = None;
                    self.form.message = None;
                } else if self.form.editing {
                    // textarea: discard the overlay buffer, keep the old value
                    self.form.editing = false;
                    self.form.message = None;
                }
            }
            KeyCode::Char(c) => {
                if self.textarea_active() {
                    self.forward_to_textarea(rt_event::KeyCode::Char(c));
                } else if self.form.editing {
                    let sel = self.form.selected;
                    if let Some(fld) = self.form.fields.get_mut(sel) {
                        match &fld.kind {
                            FieldKind::Text => fld.value.push(c),
                            FieldKind::Number { .. } => {
                                if c.is_ascii_digit() || (c == '-' && fld.value.is_empty()) {
                                    fld.value.push(c);
                                }
                            }
                            _ => {}
                        }
                    }
                }
            }
            _ => {}
        }
        effects
    }

    fn commit_select(&mut self) {
        let sel = self.form.selected;
        if let Some(fld) = self.form.fields.get_mut(sel) {
            if let FieldKind::Select {
                cursor, selected, ..
            } = &mut fld.kind
            {
                *selected = Some(*cursor);
                self.form.editing = false;
            }
        }
    }

    // Quick selection-change while browsing, without opening the editor
    fn cycle_select(&mut self, dir: i32) {
        let sel = self.form.selected;
        if let Some(fld) = self.form.fields.get_mut(sel) {
            if let FieldKind::Select {
                options,
                cursor,
                selected,
            } = &mut fld.kind
            {
                if options.is_empty() {
                    return;
                }
                let next = match *selected {
                    None => 0,
                    Some(i) if dir >= 0 => (i + 1) % options.len(),
                    Some(0) => options.len() - 1,
                    Some(i) => i - 1,
                };
                *selected = Some(next);
                *cursor = next;
            }
        }
    }
}

fn step_number(value: &mut String, dir: i64, minimum: i64) {
    let cur = value.trim().parse::<i64>().unwrap_or(minimum);
    let next = cur.saturating_add(dir).max(minimum);
    *value = next.to_string();
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let h = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(v[1]);
    h[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PaymentMethod, TicketType};
    use crate::schema::Field;

    fn widget() -> FormWidget {
        FormWidget::new(RouteParams {
            movie_id: "m1".into(),
            ticket_type: TicketType::Preorder,
        })
    }

    fn field_value(w: &FormWidget, field: Field) -> String {
        w.form
            .fields
            .iter()
            .find(|f| f.field == field)
            .unwrap()
            .value
            .clone()
    }

    fn type_text(w: &mut FormWidget, text: &str) {
        for c in text.chars() {
            let _ = w.on_key(KeyCode::Char(c));
        }
    }

    fn fill_valid(w: &mut FormWidget) {
        // name
        let _ = w.on_key(KeyCode::Enter);
        type_text(w, "Taro");
        let _ = w.on_key(KeyCode::Enter);
        // email
        let _ = w.on_key(KeyCode::Down);
        let _ = w.on_key(KeyCode::Enter);
        type_text(w, "taro@example.com");
        let _ = w.on_key(KeyCode::Enter);
        // seat tickets: 1 -> 2 via editor stepping
        let _ = w.on_key(KeyCode::Down);
        let _ = w.on_key(KeyCode::Enter);
        let _ = w.on_key(KeyCode::Up);
        let _ = w.on_key(KeyCode::Enter);
        // goods tickets: 0 -> 1
        let _ = w.on_key(KeyCode::Down);
        let _ = w.on_key(KeyCode::Enter);
        let _ = w.on_key(KeyCode::Up);
        let _ = w.on_key(KeyCode::Enter);
        // payment method: open editor, move to Cash, commit
        let _ = w.on_key(KeyCode::Down);
        let _ = w.on_key(KeyCode::Enter);
        let _ = w.on_key(KeyCode::Down);
        let _ = w.on_key(KeyCode::Down);
        let _ = w.on_key(KeyCode::Enter);
    }

    fn press_submit(w: &mut FormWidget) -> Vec<Effect> {
        w.form.selected = w.form.submit_idx();
        w.form.editing = false;
        w.on_key(KeyCode::Enter)
    }

    #[test]
    fn typing_updates_the_bound_field() {
        let mut w = widget();
        let _ = w.on_key(KeyCode::Enter);
        type_text(&mut w, "Hanako");
        let _ = w.on_key(KeyCode::Backspace);
        let _ = w.on_key(KeyCode::Enter);
        assert_eq!(field_value(&w, Field::Name), "Hanak");
    }

    #[test]
    fn number_field_ignores_letters_and_respects_minimum() {
        let mut w = widget();
        w.form.selected = 2; // seat tickets
        let _ = w.on_key(KeyCode::Enter);
        type_text(&mut w, "abc");
        assert_eq!(field_value(&w, Field::NumberOfSeatTickets), "1");
        // stepping down stops at the minimum of 1
        let _ = w.on_key(KeyCode::Down);
        let _ = w.on_key(KeyCode::Down);
        assert_eq!(field_value(&w, Field::NumberOfSeatTickets), "1");
        let _ = w.on_key(KeyCode::Up);
        assert_eq!(field_value(&w, Field::NumberOfSeatTickets), "2");
    }

    #[test]
    fn select_changes_value_only_on_explicit_selection() {
        let mut w = widget();
        w.form.selected = 4;
        let _ = w.on_key(KeyCode::Enter); // open editor
        assert!(w.form.editing);
        let _ = w.on_key(KeyCode::Down); // cursor to Bank transfer
        let _ = w.on_key(KeyCode::Enter); // commit
        assert!(!w.form.editing);
        if let FieldKind::Select {
            options, selected, ..
        } = &w.form.fields[4].kind
        {
            assert_eq!(options[selected.unwrap()], PaymentMethod::BankTransfer);
        } else {
            panic!("payment field is not a select");
        }
    }

    #[test]
    fn invalid_submit_marks_errors_and_emits_nothing() {
        let mut w = widget();
        let effects = press_submit(&mut w);
        assert!(effects.is_empty());
        assert!(w
            .form
            .fields
            .iter()
            .any(|f| f.field == Field::Name && f.error.is_some()));
    }

    #[test]
    fn valid_submit_emits_exactly_the_wire_payload() {
        let mut w = widget();
        fill_valid(&mut w);
        let effects = press_submit(&mut w);
        assert_eq!(effects.len(), 1);
        match &effects[0] {
            Effect::Submit { payload } => {
                assert_eq!(payload.name, "Taro");
                assert_eq!(payload.email, "taro@example.com");
                assert_eq!(payload.number_of_seat_tickets, 2);
                assert_eq!(payload.number_of_goods_tickets, 1);
                assert_eq!(payload.payment_method, PaymentMethod::Cash);
                assert_eq!(payload.remarks.as_deref(), Some(""));
                assert_eq!(payload.movie_id, "m1");
                assert_eq!(payload.ticket_type, TicketType::Preorder);
                assert!(!payload.is_verified);
                assert_eq!(payload.payment_status, "pending");
            }
            other => panic!("expected submit effect, got {other:?}"),
        }
    }

    #[test]
    fn submit_is_gated_while_a_request_is_in_flight() {
        let mut w = widget();
        fill_valid(&mut w);
        w.form.submitting = true;
        let effects = press_submit(&mut w);
        assert!(effects.is_empty());
    }

    #[test]
    fn reset_requires_confirmation() {
        let mut w = widget();
        fill_valid(&mut w);
        w.form.selected = w.form.reset_idx();
        let first = w.on_key(KeyCode::Enter);
        assert!(first.is_empty());
        assert_eq!(w.form.confirm, Some(ConfirmAction::Reset));
        let second = w.on_key(KeyCode::Enter);
        assert!(matches!(second.as_slice(), [Effect::ShowToast { .. }]));
        assert_eq!(field_value(&w, Field::Name), "");
        assert_eq!(field_value(&w, Field::NumberOfSeatTickets), "1");
    }

    #[test]
    fn textarea_overlay_commits_on_ctrl_s_only() {
        let mut w = widget();
        w.form.selected = 5; // remarks
        let _ = w.on_key(KeyCode::Enter);
        assert!(w.textarea_active());
        type_text(&mut w, "wheelchair");
        // Esc discards
        let _ = w.on_key(KeyCode::Esc);
        assert_eq!(field_value(&w, Field::Remarks), "");
        // commit path
        let _ = w.on_key(KeyCode::Enter);
        type_text(&mut w, "aisle seat");
        assert!(w.commit_textarea());
        assert_eq!(field_value(&w, Field::Remarks), "aisle seat");
    }
}
