use std::sync::Arc;

use anyhow::Context;
use desk_logging::{desk_info, desk_warn};
use newsdesk_core::GateView;
use newsdesk_engine::{
    AuthGate, Credential, EventBus, FileCredentialStore, HoverSignal, ReqwestAuthClient,
    ReqwestSearchClient, SearchController, Subscription,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::command::{self, Command, HELP};
use super::navigation::TerminalNavigator;
use super::render;
use super::settings::ShellSettings;

const HOVER_CAPACITY: usize = 16;

pub async fn run(settings: ShellSettings) -> anyhow::Result<()> {
    let client_settings = settings.client();
    let search_client =
        ReqwestSearchClient::new(&client_settings).context("creating search client")?;
    let auth_client = ReqwestAuthClient::new(&client_settings).context("creating auth client")?;
    let store = FileCredentialStore::new(settings.credential_path.clone());

    let hover_bus = EventBus::new(HOVER_CAPACITY);
    let mut preview = hover_bus.subscribe();
    let mut controller = SearchController::new(
        settings.search(),
        Arc::new(search_client),
        Arc::new(TerminalNavigator),
    )
    .with_hover_bus(hover_bus);
    let mut gate = AuthGate::new(Arc::new(auth_client), Arc::new(store));

    desk_info!("shell: ready, backend {}", client_settings.base_url);
    println!("newsdesk: type to search, /help for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = if controller.is_busy() {
            tokio::select! {
                line = lines.next_line() => line.context("reading stdin")?,
                _ = controller.next_event() => {
                    redraw(&mut controller);
                    continue;
                }
            }
        } else {
            lines.next_line().await.context("reading stdin")?
        };

        let Some(line) = line else {
            break;
        };
        let command = match command::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };

        match command {
            Command::Query(text) => controller.input(text),
            Command::Clear => controller.clear(),
            Command::Open(index) => controller.select(index),
            Command::Hover(index) => {
                controller.hover(index);
                show_preview(&mut preview);
            }
            Command::Dismiss => controller.dismiss(),
            Command::Login(token) => {
                if let Err(err) = gate.login(Credential::new(token)) {
                    desk_warn!("shell: login failed: {}", err);
                    println!("could not store credential: {err}");
                }
            }
            Command::Logout => {
                gate.logout().await;
                println!("logged out");
            }
            Command::Account => {
                if gate.activate() == GateView::Loading {
                    println!("{}", render::gate(&GateView::Loading));
                }
                let view = gate.resolve().await;
                println!("{}", render::gate(&view));
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
        redraw(&mut controller);
    }

    controller.teardown();
    gate.flush_notifications().await;
    desk_info!("shell: bye");
    Ok(())
}

fn redraw(controller: &mut SearchController) {
    if controller.consume_dirty() {
        print!("{}", render::search(&controller.view()));
    }
}

fn show_preview(preview: &mut Subscription<HoverSignal>) {
    while let Some(signal) = preview.try_recv() {
        match signal.article_id {
            Some(id) => desk_info!("shell: preview article {}", id),
            None => desk_info!("shell: preview cleared"),
        }
    }
}
