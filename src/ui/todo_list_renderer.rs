use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};

use std::time::{Duration, Instant};

use tui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::{
    client::api::TodoEndpoints,
    errors::BaseError,
    ui::{
        app::{ActiveBlock, App, InputMode},
        form::{FormField, TodoForm},
        notification::Severity,
    },
};

const TICK_RATE: Duration = Duration::from_millis(100);

/// Opens the terminal UI on the list page until `q` is pressed
pub fn render_todo_list<E: TodoEndpoints>(api: E) -> Result<(), BaseError> {
    // setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();

    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(api);
    app.load_list(Instant::now());

    let res = run_app(&mut terminal, app, TICK_RATE);

    // restore terminal
    disable_raw_mode()?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{:?}", err)
    }

    Ok(())
}

fn run_app<B: Backend, E: TodoEndpoints>(
    terminal: &mut Terminal<B>,
    mut app: App<E>,
    tick_rate: Duration,
) -> std::io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| ui(f, &mut app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                let now = Instant::now();

                match app.input_mode {
                    InputMode::None => match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Esc if app.notifier.is_open() => app.notifier.close(),
                        KeyCode::Esc => app.go_back(),
                        _ => match app.get_current_route().active_block {
                            ActiveBlock::Home => match key.code {
                                KeyCode::Down => app.todos.next(),
                                KeyCode::Up => app.todos.previous(),
                                KeyCode::Right | KeyCode::Char('n') => app.next_page(),
                                KeyCode::Left | KeyCode::Char('p') => app.prev_page(),
                                KeyCode::Char(c @ '1'..='9') => {
                                    if let Some(page) = c.to_digit(10) {
                                        app.goto_page(page as usize - 1);
                                    }
                                }
                                KeyCode::Char('a') => app.open_new_todo(),
                                KeyCode::Char(' ') => app.toggle_selected(now),
                                KeyCode::Char('x') => app.delete_selected(now),
                                KeyCode::Char('r') => app.refresh(now),
                                KeyCode::Enter => app.open_selected(now),
                                _ => {}
                            },
                            ActiveBlock::Detail => {
                                if key.code == KeyCode::Char('e') {
                                    app.start_edit();
                                }
                            }
                            _ => {}
                        },
                    },
                    InputMode::Editing => match key.code {
                        KeyCode::Char(c) => app.form.input(c),
                        KeyCode::Backspace => app.form.backspace(),
                        KeyCode::Tab => app.form.next_field(),
                        KeyCode::Esc => app.go_back(),
                        KeyCode::Enter => app.submit_form(now),
                        _ => {}
                    },
                }
            }
        }
        if last_tick.elapsed() >= tick_rate {
            app.on_tick(Instant::now());
            last_tick = Instant::now();
        }
    }
}

fn checkbox(completed: bool) -> &'static str {
    if completed {
        "[x]"
    } else {
        "[ ]"
    }
}

fn draw_home_content<B: Backend, E: TodoEndpoints>(f: &mut Frame<B>, app: &mut App<E>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)].as_ref())
        .split(f.size());

    let items: Vec<ListItem> = app
        .todos
        .items
        .iter()
        .map(|todo| {
            let mut style = Style::default();
            if todo.completed {
                style = style.fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT);
            }
            // temporary ids belong to todos the server has not confirmed yet
            if todo.id < 0 || app.has_pending_toggle(todo.id) {
                style = style.add_modifier(Modifier::ITALIC);
            }

            ListItem::new(Spans::from(vec![
                Span::raw(format!("{} ", checkbox(todo.completed))),
                Span::styled(todo.title.as_str(), style),
            ]))
        })
        .collect();

    let items = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Todos"))
        .highlight_style(
            Style::default()
                .bg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    f.render_stateful_widget(items, chunks[0], &mut app.todos.state);

    let footer = Paragraph::new(Spans::from(vec![
        Span::styled(
            format!(
                "Page {}/{} ",
                app.pager.page() + 1,
                app.pager.page_count(app.total)
            ),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("a add, space toggle, x delete, enter open, </> page, r refresh, q quit"),
    ]))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, chunks[1]);
}

fn draw_detail_content<B: Backend, E: TodoEndpoints>(f: &mut Frame<B>, app: &App<E>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(100)].as_ref())
        .margin(2)
        .split(f.size());

    let text = match &app.detail {
        Some(todo) => vec![
            Spans::from(Span::styled(
                todo.title.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Spans::from(""),
            Spans::from(todo.description.as_deref().unwrap_or("No description")),
            Spans::from(""),
            Spans::from(format!("{} Completed", checkbox(todo.completed))),
            Spans::from(format!("Created {}", todo.created_at)),
            Spans::from(format!("Updated {}", todo.updated_at)),
            Spans::from(""),
            Spans::from("e edit, esc back"),
        ],
        None => vec![Spans::from("Loading...")],
    };

    let paragraph = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Todo"));

    f.render_widget(paragraph, chunks[0]);
}

fn field_block<'a>(title: &'a str, focused: bool, error: Option<String>) -> Block<'a> {
    let mut block = Block::default().borders(Borders::ALL);

    block = match error {
        Some(error) => block
            .title(format!("{} - {}", title, error))
            .border_style(Style::default().fg(Color::Red)),
        None => block.title(title),
    };

    if focused {
        block.border_style(Style::default().fg(Color::Yellow))
    } else {
        block
    }
}

fn draw_form<B: Backend>(f: &mut Frame<B>, form: &TodoForm, heading: &str, with_completed: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Length(3),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .margin(2)
        .split(f.size());

    let submit_style = if form.can_submit() {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let help = Paragraph::new(Text::from(Spans::from(vec![
        Span::raw(format!("{}  ", heading)),
        Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" next field, "),
        Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" cancel, "),
        Span::styled("Enter", submit_style),
        Span::raw(" submit"),
    ])));
    f.render_widget(help, chunks[0]);

    // errors only show once the user started typing
    let title_error = form.is_dirty().then(|| form.title_error()).flatten();
    let title = Paragraph::new(form.title.as_str()).block(field_block(
        "Title",
        form.focus == FormField::Title,
        title_error,
    ));
    f.render_widget(title, chunks[1]);

    let description = Paragraph::new(form.description.as_str())
        .wrap(Wrap { trim: false })
        .block(field_block(
            "Description",
            form.focus == FormField::Description,
            form.description_error(),
        ));
    f.render_widget(description, chunks[2]);

    if with_completed {
        let completed = Paragraph::new(format!("{} (space)", checkbox(form.completed))).block(
            field_block("Completed", form.focus == FormField::Completed, None),
        );
        f.render_widget(completed, chunks[3]);
    }
}

fn toast_area(area: Rect) -> Rect {
    let width = area.width.min(50);

    Rect::new(area.x + area.width - width, area.y, width, 4.min(area.height))
}

fn draw_notification<B: Backend, E: TodoEndpoints>(f: &mut Frame<B>, app: &App<E>) {
    let Some(notification) = app.notifier.current() else {
        return;
    };

    let color = match notification.severity {
        Severity::Success => Color::Green,
        Severity::Info => Color::LightBlue,
        Severity::Error => Color::Red,
    };
    let title = notification
        .title
        .clone()
        .unwrap_or_else(|| format!("{:?}", notification.severity));

    let paragraph = Paragraph::new(notification.message.as_str())
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title, Style::default().fg(color)))
                .border_style(Style::default().fg(color)),
        );

    let area = toast_area(f.size());
    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

fn ui<B: Backend, E: TodoEndpoints>(f: &mut Frame<B>, app: &mut App<E>) {
    match app.get_current_route().active_block {
        ActiveBlock::Home => draw_home_content(f, app),
        ActiveBlock::Detail => draw_detail_content(f, app),
        ActiveBlock::NewTodo => draw_form(f, &app.form, "New todo", false),
        ActiveBlock::Edit => draw_form(f, &app.form, "Edit todo", true),
    }

    draw_notification(f, app);
}
