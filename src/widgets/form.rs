use crate::model::{FormData, PaymentMethod, RouteParams};
use crate::schema::{self, Field, FieldErrors};
use crate::widgets::chrome::panel_block;
use crate::widgets::field::FieldChrome;
use ratatui::prelude::*;
use ratatui::widgets::*;

#[derive(Clone, Debug)]
pub enum FieldKind {
    Text,
    // Integer input; Up/Down stepping never goes below `minimum`
    Number { minimum: i64 },
    // Selection widget with an explicit unset state; the value changes only
    // on selection-change, never through the text protocol
    Select {
        options: Vec<PaymentMethod>,
        cursor: usize,
        selected: Option<usize>,
    },
    // Multi-line text edited in a tui-textarea overlay
    TextArea,
}

#[derive(Clone, Debug)]
pub struct FormField {
    pub field: Field,
    pub label: &'static str,
    pub required: bool,
    pub helper: Option<&'static str>,
    pub kind: FieldKind,
    pub value: String,
    pub error: Option<String>,
}

impl FormField {
    fn chrome(&self) -> FieldChrome<'_> {
        FieldChrome {
            label: self.label,
            required: self.required,
            helper: self.helper,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfirmAction {
    Reset,
}

#[derive(Clone, Debug, Default)]
pub struct FormState {
    pub title: String,
    pub fields: Vec<FormField>,
    pub selected: usize,
    pub editing: bool,
    // single in-flight submission flag; submit is ignored while set
    pub submitting: bool,
    pub message: Option<String>,
    pub confirm: Option<ConfirmAction>,
}

impl FormState {
    pub fn submit_idx(&self) -> usize {
        self.fields.len()
    }

    pub fn reset_idx(&self) -> usize {
        self.fields.len() + 1
    }
}

/// Build the ticket purchase form for one screening, all fields at their
/// documented defaults.
pub fn ticket_form(route: &RouteParams) -> FormState {
    FormState {
        title: format!(
            "Ticket purchase — {} ({})",
            route.movie_id, route.ticket_type
        ),
        fields: vec![
            FormField {
                field: Field::Name,
                label: "Name",
                required: true,
                helper: None,
                kind: FieldKind::Text,
                value: String::new(),
                error: None,
            },
            FormField {
                field: Field::Email,
                label: "Email",
                required: true,
                helper: None,
                kind: FieldKind::Text,
                value: String::new(),
                error: None,
            },
            FormField {
                field: Field::NumberOfSeatTickets,
                label: "Seat tickets",
                required: true,
                helper: Some("Needed to watch the screening"),
                kind: FieldKind::Number { minimum: 1 },
                value: "1".into(),
                error: None,
            },
            FormField {
                field: Field::NumberOfGoodsTickets,
                label: "Goods tickets",
                required: true,
                helper: None,
                kind: FieldKind::Number { minimum: 0 },
                value: "0".into(),
                error: None,
            },
            FormField {
                field: Field::PaymentMethod,
                label: "Payment method",
                required: true,
                helper: None,
                kind: FieldKind::Select {
                    options: PaymentMethod::ALL.to_vec(),
                    cursor: 0,
                    selected: None,
                },
                value: String::new(),
                error: None,
            },
            FormField {
                field: Field::Remarks,
                label: "Remarks",
                required: false,
                helper: None,
                kind: FieldKind::TextArea,
                value: String::new(),
                error: None,
            },
        ],
        selected: 0,
        editing: false,
        submitting: false,
        message: None,
        confirm: None,
    }
}

const PARSE_MESSAGE: &str = "Enter a whole number";

/// Candidate FormData from the current field values, plus parse failures for
/// number fields that do not hold an integer (those fall back to 0 in the
/// candidate so the schema still sees every field).
fn collect(form: &FormState) -> (FormData, FieldErrors) {
    let mut data = FormData::default();
    let mut parse_errors = FieldErrors::new();
    for fld in &form.fields {
        match (&fld.kind, fld.field) {
            (FieldKind::Text, Field::Name) => data.name = fld.value.clone(),
            (FieldKind::Text, Field::Email) => data.email = fld.value.clone(),
            (FieldKind::Number { .. }, f) => {
                let parsed = fld.value.trim().parse::<i64>();
                let v = match parsed {
                    Ok(v) => v,
                    Err(_) => {
                        parse_errors.insert(f, PARSE_MESSAGE.to_string());
                        0
                    }
                };
                match f {
                    Field::NumberOfSeatTickets => data.number_of_seat_tickets = v,
                    Field::NumberOfGoodsTickets => data.number_of_goods_tickets = v,
                    _ => {}
                }
            }
            (FieldKind::Select { options, selected, .. }, Field::PaymentMethod) => {
                data.payment_method = selected.and_then(|i| options.get(i).copied());
            }
            (FieldKind::TextArea, Field::Remarks) => data.remarks = fld.value.clone(),
            _ => {}
        }
    }
    (data, parse_errors)
}

/// Write a freshly computed error map into the field slots, replacing
/// whatever was there.
pub fn apply_errors(form: &mut FormState, errors: &FieldErrors) {
    for fld in &mut form.fields {
        fld.error = errors.get(&fld.field).cloned();
    }
}

/// Full validation pass for a submit attempt. On success the field errors are
/// cleared and the validated data returned; on failure every offending field
/// gets its message and the caller must not build a payload.
pub fn validate_into(form: &mut FormState) -> Option<FormData> {
    let (data, parse_errors) = collect(form);
    let mut errors = schema::validate(&data);
    // a field that failed to parse reports the parse problem, not the range
    for (f, msg) in parse_errors {
        errors.insert(f, msg);
    }
    apply_errors(form, &errors);
    if errors.is_empty() {
        form.message = None;
        Some(data)
    } else {
        let fields: Vec<&str> = errors.keys().map(|f| f.as_str()).collect();
        tracing::debug!(?fields, "form validation failed");
        form.message = Some("Please fix the highlighted errors".into());
        None
    }
}

/// Restore every field to its documented default and clear errors.
pub fn reset_to_defaults(form: &mut FormState) {
    for fld in &mut form.fields {
        fld.error = None;
        match &mut fld.kind {
            FieldKind::Number { minimum } => fld.value = minimum.to_string(),
            FieldKind::Select {
                cursor, selected, ..
            } => {
                *cursor = 0;
                *selected = None;
            }
            _ => fld.value.clear(),
        }
    }
    form.message = Some("Reset to defaults".into());
}

pub fn draw_form(f: &mut Frame, area: Rect, form: &mut FormState, highlight: bool, cursor_on: bool) {
    let mut lines: Vec<Line> = Vec::new();
    for (i, fld) in form.fields.iter().enumerate() {
        let sel = if i == form.selected { '›' } else { ' ' };
        let chrome = fld.chrome();
        let value_style = if i == form.selected {
            if form.editing {
                crate::theme::text_editing_bold()
            } else {
                crate::theme::text_active_bold()
            }
        } else {
            Style::default()
        };
        let field_lines: Vec<Line> = match &fld.kind {
            FieldKind::Text | FieldKind::Number { .. } => {
                let mut val = fld.value.clone();
                if form.editing && i == form.selected && cursor_on {
                    val.push('▏');
                }
                vec![Line::from(vec![
                    chrome.title_span(sel),
                    Span::styled(val, value_style),
                ])]
            }
            FieldKind::Select {
                options,
                cursor,
                selected,
            } => {
                let summary = selected
                    .and_then(|i| options.get(i))
                    .map(|m| m.label().to_string())
                    .unwrap_or_else(|| "(none)".into());
                let mut out = vec![Line::from(vec![
                    chrome.title_span(sel),
                    Span::styled(summary, value_style),
                ])];
                if form.editing && i == form.selected {
                    for (oi, opt) in options.iter().enumerate() {
                        let mark = if *selected == Some(oi) { "(•)" } else { "( )" };
                        let cur = if oi == *cursor { '›' } else { ' ' };
                        let st = if oi == *cursor {
                            crate::theme::list_cursor_style()
                        } else {
                            crate::theme::text_muted()
                        };
                        out.push(Line::from(Span::styled(
                            format!("  {cur} {mark} {}", opt.label()),
                            st,
                        )));
                    }
                }
                out
            }
            FieldKind::TextArea => {
                let mut out = vec![chrome.header_line(sel)];
                let body: Vec<String> = if fld.value.is_empty() {
                    vec![String::new()]
                } else {
                    fld.value.lines().map(|l| l.to_string()).collect()
                };
                for bl in body {
                    out.push(Line::from(vec![
                        Span::raw("  "),
                        Span::styled(bl, value_style),
                    ]));
                }
                out
            }
        };
        lines.extend(chrome.compose(field_lines, fld.error.as_deref()));
    }
    // Buttons: Submit | Reset
    if !form.fields.is_empty() {
        lines.push(Line::from(""));
    }
    let can_submit = !form.submitting;
    let mut submit_style = if can_submit {
        crate::theme::text_active_bold()
    } else {
        crate::theme::text_muted()
    };
    let mut reset_style = crate::theme::text_muted();
    if form.selected == form.submit_idx() {
        submit_style = if can_submit {
            crate::theme::list_cursor_style()
        } else {
            crate::theme::text_muted()
        };
    }
    if form.selected == form.reset_idx() {
        reset_style = crate::theme::list_cursor_style();
    }
    lines.push(Line::from(vec![
        Span::styled("  [ Submit ]  ".to_string(), submit_style),
        Span::styled("Reset".to_string(), reset_style),
    ]));
    if let Some(msg) = &form.message {
        lines.push(Line::from(Span::styled(
            msg.clone(),
            crate::theme::text_muted(),
        )));
    }
    let title = if form.editing {
        format!("{} — editing", form.title)
    } else {
        form.title.clone()
    };
    let block = panel_block(&title, highlight);
    let p = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TicketType;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn route() -> RouteParams {
        RouteParams {
            movie_id: "m1".into(),
            ticket_type: TicketType::Staff,
        }
    }

    fn set_value(form: &mut FormState, field: Field, value: &str) {
        let fld = form.fields.iter_mut().find(|f| f.field == field).unwrap();
        fld.value = value.to_string();
    }

    fn select_payment(form: &mut FormState, idx: usize) {
        let fld = form
            .fields
            .iter_mut()
            .find(|f| f.field == Field::PaymentMethod)
            .unwrap();
        if let FieldKind::Select { selected, .. } = &mut fld.kind {
            *selected = Some(idx);
        }
    }

    fn fill_valid(form: &mut FormState) {
        set_value(form, Field::Name, "Taro");
        set_value(form, Field::Email, "taro@example.com");
        select_payment(form, 2);
    }

    #[test]
    fn ticket_form_starts_at_documented_defaults() {
        let form = ticket_form(&route());
        let (data, parse_errors) = collect(&form);
        assert!(parse_errors.is_empty());
        assert_eq!(data, FormData::default());
        assert_eq!(form.title, "Ticket purchase — m1 (staff)");
    }

    #[test]
    fn validate_into_blocks_and_marks_empty_required_fields() {
        let mut form = ticket_form(&route());
        assert!(validate_into(&mut form).is_none());
        let name = form.fields.iter().find(|f| f.field == Field::Name).unwrap();
        assert_eq!(name.error.as_deref(), Some("Name is required"));
        let pay = form
            .fields
            .iter()
            .find(|f| f.field == Field::PaymentMethod)
            .unwrap();
        assert_eq!(pay.error.as_deref(), Some("Select a payment method"));
        assert!(form.message.as_deref().unwrap().contains("fix"));
    }

    #[test]
    fn validate_into_returns_data_when_clean() {
        let mut form = ticket_form(&route());
        fill_valid(&mut form);
        let data = validate_into(&mut form).unwrap();
        assert_eq!(data.name, "Taro");
        assert_eq!(data.payment_method, Some(PaymentMethod::Cash));
        assert!(form.fields.iter().all(|f| f.error.is_none()));
        assert!(form.message.is_none());
    }

    #[test]
    fn unparseable_number_reports_parse_error_not_range() {
        let mut form = ticket_form(&route());
        fill_valid(&mut form);
        set_value(&mut form, Field::NumberOfSeatTickets, "-");
        assert!(validate_into(&mut form).is_none());
        let seat = form
            .fields
            .iter()
            .find(|f| f.field == Field::NumberOfSeatTickets)
            .unwrap();
        assert_eq!(seat.error.as_deref(), Some(PARSE_MESSAGE));
    }

    #[test]
    fn errors_are_replaced_wholesale_on_each_pass() {
        let mut form = ticket_form(&route());
        assert!(validate_into(&mut form).is_none());
        fill_valid(&mut form);
        assert!(validate_into(&mut form).is_some());
        assert!(form.fields.iter().all(|f| f.error.is_none()));
    }

    #[test]
    fn reset_restores_defaults_and_clears_errors() {
        let mut form = ticket_form(&route());
        fill_valid(&mut form);
        set_value(&mut form, Field::NumberOfSeatTickets, "7");
        assert!(validate_into(&mut form).is_some());
        reset_to_defaults(&mut form);
        let (data, parse_errors) = collect(&form);
        assert!(parse_errors.is_empty());
        assert_eq!(data, FormData::default());
        assert_eq!(form.message.as_deref(), Some("Reset to defaults"));
    }

    fn inner_lines(width: u16, height: u16, form: &mut FormState) -> Vec<String> {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let area = Rect {
                    x: 0,
                    y: 0,
                    width,
                    height,
                };
                draw_form(f, area, form, true, false);
            })
            .unwrap();
        let buf = terminal.backend().buffer().clone();
        let mut out: Vec<String> = Vec::new();
        for y in 1..(buf.area.height - 1) {
            let mut line = String::new();
            for x in 1..(buf.area.width - 1) {
                let cell = &buf[(x, y)];
                line.push(cell.symbol().chars().next().unwrap_or(' '));
            }
            while line.ends_with(' ') {
                line.pop();
            }
            out.push(line);
        }
        out
    }

    #[test]
    fn golden_initial_form_renders_expected_fields() {
        let mut form = ticket_form(&route());
        let current = inner_lines(40, 14, &mut form)
            .into_iter()
            .take(10)
            .collect::<Vec<_>>()
            .join("\n");
        let golden = include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/golden/form_initial.txt"
        ));
        assert_eq!(current.trim_end(), golden.trim_end());
    }

    #[test]
    fn golden_payment_select_editor_lists_options() {
        let mut form = ticket_form(&route());
        form.selected = 4;
        form.editing = true;
        if let FieldKind::Select { cursor, .. } = &mut form.fields[4].kind {
            *cursor = 1;
        }
        let current = inner_lines(40, 14, &mut form)
            .into_iter()
            .take(10)
            .collect::<Vec<_>>()
            .join("\n");
        let golden = include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/golden/payment_select_editor.txt"
        ));
        assert_eq!(current.trim_end(), golden.trim_end());
    }
}
