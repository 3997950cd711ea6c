mod app;
mod cli;
mod client;
mod error;
mod format;
mod logging;
mod model;
mod pager;
mod transform;
mod ui;

use crate::app::{App, Request, Response};
use crate::cli::Cli;
use crate::client::ResultsClient;
use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, time::Duration};
use tokio::sync::mpsc::{self, UnboundedSender};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    logging::init(&args.log_path(), &args.log_level)?;
    tracing::info!("resultview against {} (step {})", args.server, args.step);

    let client = ResultsClient::new(&args.server, args.timeout())
        .with_context(|| format!("cannot use server {}", args.server))?;

    if args.print {
        return print_page(&client, &args).await;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run(&mut terminal, client, &args);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    client: ResultsClient,
    args: &Cli,
) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Response>();
    let mut app = App::new(args.start, args.step);

    spawn_fetch(&client, app.initial_request(), tx.clone());

    terminal.clear()?;
    loop {
        while let Ok(response) = rx.try_recv() {
            app.apply(response);
        }

        terminal.draw(|f| ui::draw(f, &app))?;

        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key) = event::read()? {
                if let Some(request) = app.handle_key(key) {
                    spawn_fetch(&client, request, tx.clone());
                }
            }
        }

        if app.should_quit() {
            break;
        }
    }

    tracing::info!("bye");
    Ok(())
}

fn spawn_fetch(client: &ResultsClient, request: Request, tx: UnboundedSender<Response>) {
    let client = client.clone();
    tokio::spawn(async move {
        let outcome = client.fetch(request.window).await;
        // receiver is gone once the viewer quits
        let _ = tx.send(Response {
            seq: request.seq,
            outcome,
        });
    });
}

async fn print_page(client: &ResultsClient, args: &Cli) -> anyhow::Result<()> {
    let window = model::Window::new(args.start, args.start.saturating_add(args.step));
    let page = client
        .fetch(window)
        .await
        .with_context(|| format!("fetch results {}..{}", window.start, window.stop))?;
    let view = transform::transform(&page);
    print!("{}", ui::plain_text(&view));
    Ok(())
}
