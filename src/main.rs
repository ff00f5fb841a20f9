mod app;
mod config;
mod engine;
mod event;
mod session;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};
use tracing_subscriber::EnvFilter;

use app::{App, AppScreen, SETTINGS_FIELDS, StatusKind};
use config::Config;
use engine::bounds;
use engine::scoring::{Draft, EventInput, EventType, ScoringVersion};
use event::{AppEvent, EventHandler};
use session::form::FormField;
use session::result::ScoredEvent;
use ui::components::event_form::EventFormView;
use ui::components::event_table::EventTable;
use ui::components::score_card::ScoreCard;
use ui::components::score_chart::ScoreChart;
use ui::components::scoring_help::ScoringHelp;
use ui::layout::{AppLayout, FORM_HEIGHT};

#[derive(Parser)]
#[command(name = "grit", version, about = "Grit points calculator for endurance events")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Scoring version for new events (v1, v2)")]
    scoring: Option<ScoringVersion>,
}

#[derive(Subcommand)]
enum Command {
    /// Score a single event and print the result
    Score(ScoreArgs),
}

#[derive(Args)]
struct ScoreArgs {
    #[arg(short, long, help = "Distance in km")]
    distance: f64,

    #[arg(short, long, default_value_t = 0.0, help = "Elevation gain in m")]
    elevation: f64,

    #[arg(
        short = 't',
        long = "type",
        default_value = "run",
        help = "run, trail_run, road_cycle, gravel or mtb"
    )]
    event_type: EventType,

    #[arg(long, default_value_t = 20.0, allow_negative_numbers = true, help = "Temperature in C")]
    temperature: f64,

    #[arg(long, default_value_t = 0.0, help = "Altitude in m")]
    altitude: f64,

    #[arg(long, help = "Event allows drafting (v1)")]
    draftable: bool,

    #[arg(long, help = "Terrain roughness 0.0-1.0 (v2)")]
    roughness: Option<f64>,

    #[arg(long = "draft-pct", help = "Share of the event spent drafting, 0-100 (v2)")]
    draft_pct: Option<f64>,

    #[arg(short, long, help = "Scoring version (v1, v2); defaults to the configured one")]
    scoring: Option<ScoringVersion>,

    #[arg(short, long, default_value = "", help = "Event name")]
    name: String,

    #[arg(long, help = "Print the scored event as JSON")]
    json: bool,
}

enum LogTarget {
    File,
    Stderr,
}

fn init_logging(target: LogTarget) -> Result<()> {
    let default_level = match target {
        LogTarget::File => "info",
        LogTarget::Stderr => "warn",
    };
    let filter =
        EnvFilter::try_from_env("GRIT_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match target {
        LogTarget::File => {
            let dir = dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("grit");
            fs::create_dir_all(&dir)?;
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("grit.log"))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        LogTarget::Stderr => builder.with_writer(io::stderr).try_init(),
    };
    result.map_err(|err| anyhow!("failed to initialize logging: {err}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Command::Score(args)) = cli.command {
        if let Err(err) = init_logging(LogTarget::Stderr) {
            eprintln!("warning: {err:#}");
        }
        return run_score(args);
    }

    if let Err(err) = init_logging(LogTarget::File) {
        eprintln!("warning: logging disabled: {err:#}");
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting grit");

    let mut app = App::new();

    if let Some(theme_name) = cli.theme {
        match ui::theme::Theme::load(&theme_name) {
            Some(theme) => {
                let theme: &'static ui::theme::Theme = Box::leak(Box::new(theme));
                app.theme = theme;
            }
            None => {
                tracing::warn!(theme = %theme_name, "unknown theme");
                app.set_status(StatusKind::Error, format!("Unknown theme '{theme_name}'"));
            }
        }
    }
    if let Some(version) = cli.scoring {
        app.version = version;
        app.form.set_version(version);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(250));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!(events = app.events.len(), "session ended");
    if let Err(err) = result {
        tracing::error!(error = %err, "terminal loop failed");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_score(args: ScoreArgs) -> Result<()> {
    let version = match args.scoring {
        Some(version) => version,
        None => Config::load().map(|c| c.scoring_version).unwrap_or_default(),
    };

    let draft = match version {
        ScoringVersion::V1 => {
            if args.roughness.is_some() || args.draft_pct.is_some() {
                tracing::warn!("--roughness and --draft-pct only apply to v2 scoring");
            }
            Draft::Draftable(args.draftable)
        }
        ScoringVersion::V2 => {
            if args.draftable {
                tracing::warn!("--draftable only applies to v1 scoring");
            }
            match version.default_draft() {
                Draft::Surface {
                    roughness,
                    draft_percentage,
                } => Draft::Surface {
                    roughness: args.roughness.unwrap_or(roughness),
                    draft_percentage: args.draft_pct.unwrap_or(draft_percentage),
                },
                other => other,
            }
        }
    };

    let input = EventInput {
        distance_km: args.distance,
        elevation_m: args.elevation,
        event_type: args.event_type,
        temperature_c: args.temperature,
        altitude_m: args.altitude,
        draft,
    };
    bounds::validate(&input)?;

    let event = ScoredEvent::from_input(&args.name, input, version);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&event)?);
    } else {
        println!("{:.2}", event.score);
    }
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.expire_status(),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Calculator => handle_calculator_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_calculator_key(app: &mut App, key: KeyEvent) {
    if app.confirm_clear {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.clear_events(),
            _ => app.confirm_clear = false,
        }
        return;
    }

    if app.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')) {
            app.show_help = false;
        }
        return;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::F(1) => app.toggle_help(),
        // '?' is ordinary text inside the name field
        KeyCode::Char('?') if app.form.focused() != FormField::Name => app.toggle_help(),
        KeyCode::F(2) => app.go_to_settings(),
        KeyCode::Char('x') if ctrl => {
            if app.events.is_empty() {
                app.set_status(StatusKind::Info, "No events to clear".to_string());
            } else {
                app.request_clear();
            }
        }
        KeyCode::Char('d') if ctrl => app.delete_last_event(),
        _ => app.handle_form_key(key),
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.leave_settings(),
        KeyCode::Up | KeyCode::Char('k') => {
            if app.settings_selected > 0 {
                app.settings_selected -= 1;
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.settings_selected + 1 < SETTINGS_FIELDS {
                app.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
            app.settings_cycle_forward();
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.settings_cycle_backward();
        }
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Calculator => render_calculator(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }
}

const CALCULATOR_HINTS: &[&str] = &[
    "[Tab] Next field",
    "[Left/Right] Change",
    "[PgUp/PgDn] Step",
    "[Enter] Calculate",
    "[Ctrl-d] Delete last",
    "[Ctrl-x] Clear all",
    "[F1/?] Scoring help",
    "[F2] Settings",
    "[Esc] Quit",
];

fn render_calculator(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let hint_lines = ui::layout::pack_hint_lines(CALCULATOR_HINTS, area.width as usize);
    let app_layout = AppLayout::new(area, hint_lines.len() as u16);

    let best = app
        .events
        .max_score()
        .map(|s| format!(" | best {s:.2}"))
        .unwrap_or_default();
    let header_info = format!(
        " Scoring {} | {} events{best}",
        app.version,
        app.events.len()
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " grit ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            &*header_info,
            Style::default()
                .fg(colors.text_pending())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, app_layout.header);

    let last = app.events.last();
    match last {
        Some(event) if app_layout.tier.show_score_card(area.height) => {
            let column = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(FORM_HEIGHT), Constraint::Min(0)])
                .split(app_layout.form);
            frame.render_widget(EventFormView::new(&app.form, app.theme), column[0]);
            let position = app.events.len() - 1;
            frame.render_widget(ScoreCard::new(event, position, app.theme), column[1]);
        }
        _ => frame.render_widget(EventFormView::new(&app.form, app.theme), app_layout.form),
    }

    render_results(frame, app, app_layout.results);

    if let Some(ref status) = app.status {
        let color = match status.kind {
            StatusKind::Info => colors.success(),
            StatusKind::Error => colors.error(),
        };
        let line = Paragraph::new(Line::from(Span::styled(
            format!(" {}", status.text),
            Style::default().fg(color),
        )));
        frame.render_widget(line, app_layout.status);
    }

    let footer = Paragraph::new(
        hint_lines
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_pending()))))
            .collect::<Vec<_>>(),
    );
    frame.render_widget(footer, app_layout.footer);

    if app.confirm_clear {
        render_clear_dialog(frame, app, area);
    }
    if app.show_help {
        let popup = ui::layout::centered_rect(70, 70, area);
        frame.render_widget(ScoringHelp::new(app.version, app.theme), popup);
    }
}

fn render_results(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;

    if app.events.is_empty() {
        let block = Block::bordered()
            .title(" Event Comparison ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let middle = Rect::new(
            inner.x,
            inner.y + inner.height / 2,
            inner.width,
            inner.height.min(1),
        );
        let empty = Paragraph::new(Span::styled(
            "No events added",
            Style::default().fg(colors.text_pending()),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(empty, middle);
        return;
    }

    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);
    frame.render_widget(EventTable::new(app.events.as_slice(), app.theme), split[0]);
    frame.render_widget(ScoreChart::new(app.events.as_slice(), app.theme), split[1]);
}

fn render_clear_dialog(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let colors = &app.theme.colors;
    let width = 44.min(area.width);
    let height = 5.min(area.height);
    let dialog = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    frame.render_widget(Clear, dialog);
    let block = Block::bordered()
        .title(" Clear Events ")
        .border_style(Style::default().fg(colors.warning()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(dialog);
    frame.render_widget(block, dialog);

    let lines = vec![
        Line::from(Span::styled(
            format!("Remove all {} events?", app.events.len()),
            Style::default().fg(colors.fg()),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[y] Clear  [any key] Cancel",
            Style::default().fg(colors.text_pending()),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = ui::layout::centered_rect(60, 60, area);

    let block = Block::bordered()
        .title(" Settings ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let fields: [(&str, String); SETTINGS_FIELDS] = [
        ("Theme", app.config.theme.clone()),
        ("Scoring Version", app.version.label().to_string()),
    ];

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(fields.len() as u16 * 3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    let header = Paragraph::new(Line::from(Span::styled(
        "  Use arrows to navigate, Enter/Right to change, ESC to save & exit",
        Style::default().fg(colors.text_pending()),
    )));
    header.render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
        .split(layout[1]);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_style = Style::default()
            .fg(if is_selected { colors.accent() } else { colors.fg() })
            .add_modifier(if is_selected {
                Modifier::BOLD
            } else {
                Modifier::empty()
            });
        let value_style = Style::default().fg(if is_selected {
            colors.border_focused()
        } else {
            colors.text_pending()
        });

        let lines = vec![
            Line::from(Span::styled(format!("{indicator}{label}:"), label_style)),
            Line::from(Span::styled(format!("  < {value} >"), value_style)),
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    let footer = Paragraph::new(Line::from(Span::styled(
        format!(
            "  [ESC] Save & back  [Enter/arrows] Change value   config: {}",
            Config::config_path().display()
        ),
        Style::default().fg(colors.accent()),
    )));
    footer.render(layout[3], frame.buffer_mut());
}
