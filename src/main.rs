// src/main.rs
mod api;
mod config;
mod controller;
mod data;
mod dom;
mod error;
mod models;
mod mutate;
mod page;
mod render;

use crate::api::{Command, DashboardHandle};
use crate::config::Config;
use crate::controller::Dashboard;
use crate::data::{AppState, DataSources};
use env_logger::Builder;
use log::{debug, info, LevelFilter};
use tokio::sync::mpsc;

/// Owns the dashboard and serves commands one at a time until every handle
/// is dropped.
async fn worker(mut dashboard: Dashboard, mut rx: mpsc::Receiver<Command>) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Render(reply) => {
                let _ = reply.send(page::render_page(dashboard.document()));
            }
            Command::Users(reply) => {
                let _ = reply.send(dashboard.users().to_vec());
            }
            Command::Apply(event, reply) => {
                let result = dashboard
                    .apply(event)
                    .map(|_| page::render_page(dashboard.document()));
                let _ = reply.send(result);
            }
        }
    }
    debug!(
        "Dashboard event loop stopped with {} users and {} stocks.",
        dashboard.users().len(),
        dashboard.stocks().len()
    );
}

#[tokio::main]
async fn main() {
    Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_secs()
        .init();

    let config = Config::from_env();
    info!("Starting the stock dashboard...");

    let sources = DataSources::from_files(&config.users_path, &config.stocks_path);
    let state = AppState::load(&sources);
    let dashboard = Dashboard::boot(page::build(), state);

    let (tx, rx) = mpsc::channel(100);
    tokio::spawn(worker(dashboard, rx));

    let api = api::routes(DashboardHandle::new(tx), config.logo_dir.clone());

    info!("Server running on http://{}", config.addr);
    warp::serve(api).run(config.addr).await;
}
