use crate::app::{update, AppMsg, Effect};
use crate::model::FormResponse;
use crate::router::{parse_route, RouteError, RouteMatch};
use crate::services::api::{self, ApiConfig};
use crate::widgets::chrome::panel_block;
use crate::widgets::form_widget::FormWidget;
use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use ratatui::widgets::*;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    #[default]
    Landing,
    Form,
    InvalidRoute,
}

#[derive(Clone, Copy, Debug)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

pub struct Toast {
    pub text: String,
    pub level: ToastLevel,
    pub expires_at_tick: u64,
}

/// Outcome of one submission worker, reported over the app channel.
pub struct SubmitMsg {
    pub outcome: Result<FormResponse, api::ApiError>,
}

#[derive(Default)]
pub struct AppState {
    pub view: View,
    pub route_error: Option<RouteError>,
    pub form: Option<FormWidget>,
    pub submitting: bool,
    pub status_text: Option<String>,
    pub toast: Option<Toast>,
    pub last_response: Option<FormResponse>,
    pub tick: u64,
    pub api_config: ApiConfig,
    pub(crate) tx: Option<Sender<SubmitMsg>>,
    pub(crate) rx: Option<Receiver<SubmitMsg>>,
}

fn run_effects(state: &mut AppState, effects: Vec<Effect>) {
    for eff in effects {
        match eff {
            Effect::Submit { payload } => {
                tracing::info!(
                    movie_id = %payload.movie_id,
                    ticket_type = %payload.ticket_type,
                    "submitting purchase form"
                );
                state.submitting = true;
                state.status_text = Some("Submitting…".into());
                if let Some(fw) = state.form.as_mut() {
                    fw.form.submitting = true;
                    fw.form.editing = false;
                    fw.form.message = Some("Submitting…".into());
                }
                if let Some(tx) = &state.tx {
                    api::spawn_submit(state.api_config.clone(), payload, tx.clone());
                }
            }
            Effect::ShowToast {
                text,
                level,
                seconds,
            } => {
                let ticks = seconds.saturating_mul(5); // ~200ms tick
                let exp = state.tick.saturating_add(ticks);
                state.toast = Some(Toast {
                    text,
                    level,
                    expires_at_tick: exp,
                });
            }
        }
    }
}

fn pump_submit_msgs(state: &mut AppState) {
    let mut drained: Vec<SubmitMsg> = Vec::new();
    if let Some(rx) = &state.rx {
        while let Ok(msg) = rx.try_recv() {
            drained.push(msg);
        }
    }
    for msg in drained {
        let effects = update(
            state,
            AppMsg::SubmitFinished {
                outcome: msg.outcome,
            },
        );
        run_effects(state, effects);
    }
}

fn advance_tick(state: &mut AppState) {
    state.tick = state.tick.wrapping_add(1);
    if let Some(t) = &state.toast {
        if state.tick >= t.expires_at_tick {
            state.toast = None;
        }
    }
}

// true = quit requested
fn handle_key(state: &mut AppState, key: event::KeyEvent) -> bool {
    let editing = state.form.as_ref().map(|fw| fw.form.editing).unwrap_or(false);
    let confirm_open = state
        .form
        .as_ref()
        .map(|fw| fw.form.confirm.is_some())
        .unwrap_or(false);
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return true,
            KeyCode::Char('s') => {
                if let Some(fw) = state.form.as_mut() {
                    let _ = fw.commit_textarea();
                }
                return false;
            }
            _ => {}
        }
    }
    match key.code {
        KeyCode::Char('q') if !editing && !state.submitting => return true,
        KeyCode::Esc if !editing && !confirm_open && !state.submitting => return true,
        _ => {}
    }
    if matches!(state.view, View::Form) {
        let effects = state
            .form
            .as_mut()
            .map(|fw| fw.on_key(key.code))
            .unwrap_or_default();
        run_effects(state, effects);
    }
    false
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
}

pub fn run(route_path: &str) -> Result<()> {
    let mut state = AppState {
        api_config: ApiConfig::from_env(),
        ..Default::default()
    };
    match parse_route(route_path) {
        RouteMatch::Landing => state.view = View::Landing,
        RouteMatch::Form(params) => {
            tracing::info!(
                movie_id = %params.movie_id,
                ticket_type = %params.ticket_type,
                "opening purchase form"
            );
            state.form = Some(FormWidget::new(params));
            state.view = View::Form;
        }
        RouteMatch::Invalid(err) => {
            tracing::warn!(error = %err, path = route_path, "rejected route");
            state.route_error = Some(err);
            state.view = View::InvalidRoute;
        }
    }
    let (tx, rx) = mpsc::channel::<SubmitMsg>();
    state.tx = Some(tx);
    state.rx = Some(rx);

    // Headless smoke mode
    if env_flag("TICKET_TUI_HEADLESS") {
        let ticks: u64 = std::env::var("TICKET_TUI_TICKS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(10);
        let backend = ratatui::backend::TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend)?;
        for _ in 0..ticks {
            terminal.draw(|f| ui(f, &mut state))?;
            pump_submit_msgs(&mut state);
            advance_tick(&mut state);
            std::thread::sleep(Duration::from_millis(200));
        }
        if env_flag("TICKET_TUI_SMOKE_SUMMARY") {
            let view = match state.view {
                View::Landing => "Landing",
                View::Form => "Form",
                View::InvalidRoute => "InvalidRoute",
            };
            let summary = serde_json::json!({
                "ok": true,
                "view": view,
                "submitted": state.last_response.is_some(),
            });
            println!("{summary}");
        }
        return Ok(());
    }

    // Setup terminal (interactive)
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();
    let res: Result<()> = loop {
        if let Err(e) = terminal.draw(|f| ui(f, &mut state)) {
            break Err(e.into());
        }
        pump_submit_msgs(&mut state);
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_millis(0));
        match event::poll(timeout) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => {
                    if handle_key(&mut state, key) {
                        break Ok(());
                    }
                }
                Ok(_) => {}
                Err(e) => break Err(e.into()),
            },
            Ok(false) => {}
            Err(e) => break Err(e.into()),
        }
        if last_tick.elapsed() >= tick_rate {
            advance_tick(&mut state);
            last_tick = Instant::now();
        }
    };
    // Restore terminal before surfacing any loop error
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    res
}

fn ui(f: &mut Frame, state: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());
    crate::widgets::banner::draw_banner(f, chunks[0], state);
    match state.view {
        View::Landing => draw_landing(f, chunks[1]),
        View::Form => {
            let tick = state.tick;
            if let Some(fw) = state.form.as_mut() {
                fw.render(f, chunks[1], true, tick);
            }
        }
        View::InvalidRoute => draw_invalid_route(f, chunks[1], state.route_error.as_ref()),
    }
    let help = match state.view {
        View::Landing => "q quit",
        View::Form => "↑/↓ move • Enter edit/submit • Ctrl+S save remarks • q quit",
        View::InvalidRoute => "q quit",
    };
    crate::widgets::status_bar::draw_footer(f, chunks[2], state, help);
}

fn draw_landing(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from("Screening ticket purchase client."),
        Line::from(""),
        Line::from("Open a purchase form with a route:"),
        Line::from(Span::styled(
            "  ticket-tui /user/form/<movie_id>/<type>",
            crate::theme::text_active_bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Ticket types: staff, crowdfunding, preorder, onTheDay",
            crate::theme::text_muted(),
        )),
    ];
    let p = Paragraph::new(lines)
        .block(panel_block("Welcome", false))
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);
}

/// Explicit invalid-parameters state: the form is never rendered here.
fn draw_invalid_route(f: &mut Frame, area: Rect, err: Option<&RouteError>) {
    let mut lines = vec![Line::from("This link is not valid."), Line::from("")];
    if let Some(err) = err {
        lines.push(Line::from(Span::styled(
            format!("  ! {err}"),
            crate::theme::text_error(),
        )));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "Expected: /user/form/<movie_id>/<type>",
        crate::theme::text_muted(),
    )));
    lines.push(Line::from(Span::styled(
        "Ticket types: staff, crowdfunding, preorder, onTheDay",
        crate::theme::text_muted(),
    )));
    let p = Paragraph::new(lines)
        .block(panel_block("Invalid route", false))
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);
}
