use ratatui::prelude::*;

/// Presentational chrome shared by every form field: label with a required
/// marker, optional helper text, the control's own line(s), and an error slot.
/// Holds no state and performs no validation.
pub struct FieldChrome<'a> {
    pub label: &'a str,
    pub required: bool,
    pub helper: Option<&'a str>,
}

impl FieldChrome<'_> {
    /// Spans for the label portion of a single-line control:
    /// `{cursor} {label}{ *}: `.
    pub fn title_span(&self, cursor: char) -> Span<'static> {
        let req = if self.required { " *" } else { "" };
        Span::raw(format!("{cursor} {}{req}: ", self.label))
    }

    /// Header line for a multi-line control (no inline value).
    pub fn header_line(&self, cursor: char) -> Line<'static> {
        let req = if self.required { " *" } else { "" };
        Line::from(Span::raw(format!("{cursor} {}{req}:", self.label)))
    }

    /// Compose the full set of lines for this field: value line(s), then the
    /// helper (muted), then the error slot (error style) when present.
    pub fn compose<'a>(
        &self,
        mut value_lines: Vec<Line<'a>>,
        error: Option<&str>,
    ) -> Vec<Line<'a>> {
        if let Some(help) = self.helper {
            value_lines.push(Line::from(Span::styled(
                format!("  {help}"),
                crate::theme::text_muted(),
            )));
        }
        if let Some(err) = error {
            value_lines.push(Line::from(Span::styled(
                format!("  ! {err}"),
                crate::theme::text_error(),
            )));
        }
        value_lines
    }
}
