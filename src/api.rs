// src/api.rs
use crate::controller::UiEvent;
use crate::error::DashboardError;
use crate::models::UserRecord;
use log::{error, info};
use serde_json::json;
use std::convert::Infallible;
use std::path::PathBuf;
use tokio::sync::{mpsc, oneshot};
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

/// Requests served by the dashboard event loop.
pub enum Command {
    Render(oneshot::Sender<String>),
    Users(oneshot::Sender<Vec<UserRecord>>),
    Apply(UiEvent, oneshot::Sender<Result<String, DashboardError>>),
}

/// Cloneable sender side of the event loop.
#[derive(Clone)]
pub struct DashboardHandle {
    tx: mpsc::Sender<Command>,
}

impl DashboardHandle {
    pub fn new(tx: mpsc::Sender<Command>) -> Self {
        DashboardHandle { tx }
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, DashboardError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(command(reply))
            .await
            .map_err(|_| DashboardError::DashboardUnavailable)?;
        rx.await.map_err(|_| DashboardError::DashboardUnavailable)
    }

    pub async fn render(&self) -> Result<String, DashboardError> {
        self.request(Command::Render).await
    }

    pub async fn users(&self) -> Result<Vec<UserRecord>, DashboardError> {
        self.request(Command::Users).await
    }

    pub async fn apply(&self, event: UiEvent) -> Result<String, DashboardError> {
        self.request(|reply| Command::Apply(event, reply)).await?
    }
}

pub fn routes(
    handle: DashboardHandle,
    logo_dir: PathBuf,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let page = warp::path::end()
        .and(warp::get())
        .and(with_handle(handle.clone()))
        .and_then(page_handler);

    let users = warp::path!("api" / "users")
        .and(warp::get())
        .and(with_handle(handle.clone()))
        .and_then(users_handler);

    let events = warp::path!("api" / "events")
        .and(warp::post())
        .and(with_handle(handle))
        .and(warp::body::json())
        .and_then(event_handler);

    let logos = warp::path("logos").and(warp::fs::dir(logo_dir));

    page.or(users).or(events).or(logos).recover(handle_rejection)
}

fn with_handle(
    handle: DashboardHandle,
) -> impl Filter<Extract = (DashboardHandle,), Error = Infallible> + Clone {
    warp::any().map(move || handle.clone())
}

async fn page_handler(handle: DashboardHandle) -> Result<impl Reply, Rejection> {
    match handle.render().await {
        Ok(html) => Ok(warp::reply::html(html)),
        Err(e) => {
            error!("Failed to render dashboard: {}", e);
            Err(warp::reject::custom(e))
        }
    }
}

async fn users_handler(handle: DashboardHandle) -> Result<impl Reply, Rejection> {
    match handle.users().await {
        Ok(users) => Ok(warp::reply::json(&users)),
        Err(e) => {
            error!("Failed to list users: {}", e);
            Err(warp::reject::custom(e))
        }
    }
}

async fn event_handler(handle: DashboardHandle, event: UiEvent) -> Result<impl Reply, Rejection> {
    info!("Applying {:?}.", event);
    match handle.apply(event).await {
        Ok(html) => Ok(warp::reply::html(html)),
        Err(e) => {
            e.log("Applying event");
            Err(warp::reject::custom(e))
        }
    }
}

async fn handle_rejection(rejection: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_string())
    } else if let Some(e) = rejection.find::<DashboardError>() {
        let status = match e {
            DashboardError::UnknownTarget(_) => StatusCode::NOT_FOUND,
            DashboardError::DashboardUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, e.to_string())
    } else if let Some(e) = rejection.find::<warp::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, e.to_string())
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method not allowed".to_string())
    } else {
        error!("Unhandled rejection: {:?}", rejection);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal error".to_string(),
        )
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&json!({ "message": message })),
        status,
    ))
}
