//! The `FindMatch` conversation with the front door
//!
//! The client opens a session, starts the bidirectional `FindMatch` stream,
//! sends one empty request and drains the server's frames until it closes
//! the stream. Only the last frame is kept; it must describe an assignment.

use crate::pb::wrapper::find_match_response::State;
use crate::pb::wrapper::front_door_client::FrontDoorClient;
use crate::pb::wrapper::{FindMatchRequest, FindMatchResponse};
use futures::{future, stream, StreamExt};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tonic::transport::{Channel, Endpoint};
use tonic::Status;
use tracing::{debug, info};

/// Client-side failures, one per step of the conversation
///
/// The single request frame is handed to the transport together with the
/// stream, so a failure to deliver it surfaces as [`FindMatchError::OpenStream`]
/// or [`FindMatchError::Receive`].
#[derive(Error, Debug)]
pub enum FindMatchError {
    #[error("Error connecting to front door: {0}")]
    Connect(#[source] tonic::transport::Error),

    #[error("Error starting FindMatch: {0}")]
    OpenStream(#[source] Status),

    #[error("Error received from FindMatch: {0}")]
    Receive(#[source] Status),

    #[error("Unexpected state from FindMatch: {state}")]
    UnexpectedState { state: String },

    #[error("Missing assignment in response from FindMatch")]
    MissingAssignment,

    #[error("Assignment from FindMatch has error code {code}, message: {message}")]
    AssignmentError { code: i32, message: String },

    #[error("FindMatch cancelled")]
    Cancelled,
}

impl FindMatchError {
    /// Label used for metrics
    pub fn as_label(&self) -> &'static str {
        match self {
            FindMatchError::Connect(_) => "connect_error",
            FindMatchError::OpenStream(_) => "open_stream_error",
            FindMatchError::Receive(_) => "receive_error",
            FindMatchError::UnexpectedState { .. } => "unexpected_state",
            FindMatchError::MissingAssignment => "missing_assignment",
            FindMatchError::AssignmentError { .. } => "assignment_error",
            FindMatchError::Cancelled => "cancelled",
        }
    }
}

/// Render a raw state value the way the front door names it
fn state_name(raw: i32) -> String {
    match State::try_from(raw) {
        Ok(state) => state.as_str_name().to_string(),
        Err(_) => format!("UNRECOGNIZED({})", raw),
    }
}

/// Decide the outcome from the last frame of the conversation
///
/// Rules apply in order: wrong or missing state, missing assignment,
/// assignment carrying an error, otherwise the connection string.
pub fn interpret_terminal_frame(
    last: Option<&FindMatchResponse>,
) -> Result<String, FindMatchError> {
    let Some(frame) = last else {
        return Err(FindMatchError::UnexpectedState {
            state: "NONE".to_string(),
        });
    };

    if frame.state != State::Assigned as i32 {
        return Err(FindMatchError::UnexpectedState {
            state: state_name(frame.state),
        });
    }

    let assignment = frame
        .assignment
        .as_ref()
        .ok_or(FindMatchError::MissingAssignment)?;

    if let Some(error) = &assignment.error {
        return Err(FindMatchError::AssignmentError {
            code: error.code,
            message: error.message.clone(),
        });
    }

    Ok(assignment.connection.clone())
}

/// An open session to the front door
///
/// Dropping the session closes the underlying channel.
#[derive(Debug, Clone)]
pub struct FrontDoorSession {
    client: FrontDoorClient<Channel>,
}

impl FrontDoorSession {
    /// Dial the front door
    pub async fn connect(
        endpoint: &str,
        connect_timeout: Duration,
    ) -> Result<Self, FindMatchError> {
        let channel = Endpoint::from_shared(endpoint.to_string())
            .map_err(FindMatchError::Connect)?
            .connect_timeout(connect_timeout)
            .connect()
            .await
            .map_err(FindMatchError::Connect)?;

        debug!(endpoint, "Front door session established");
        Ok(Self::from_channel(channel))
    }

    /// Wrap an existing channel
    pub fn from_channel(channel: Channel) -> Self {
        Self {
            client: FrontDoorClient::new(channel),
        }
    }

    /// Run one `FindMatch` conversation and return the assigned connection
    pub async fn find_match(
        &mut self,
        cancel: &CancellationToken,
    ) -> Result<String, FindMatchError> {
        // One request, then the request side stays open until `close` drops.
        // The request is ready before opening: the server may wait for it
        // before sending response headers.
        let (close, closed) = oneshot::channel::<()>();
        let outbound = stream::once(future::ready(FindMatchRequest {}))
            .chain(stream::once(closed).filter_map(|_| future::ready(None)));

        let mut inbound = tokio::select! {
            _ = cancel.cancelled() => return Err(FindMatchError::Cancelled),
            opened = self.client.find_match(outbound) => {
                opened.map_err(FindMatchError::OpenStream)?.into_inner()
            }
        };

        // Frames overwrite each other; only the terminal one counts
        let mut last: Option<FindMatchResponse> = None;
        let mut frames = 0usize;
        loop {
            let next = tokio::select! {
                _ = cancel.cancelled() => return Err(FindMatchError::Cancelled),
                next = inbound.message() => next,
            };

            match next {
                Ok(Some(frame)) => {
                    frames += 1;
                    debug!(frames, state = %state_name(frame.state), "FindMatch frame received");
                    last = Some(frame);
                }
                Ok(None) => break,
                Err(status) => return Err(FindMatchError::Receive(status)),
            }
        }

        // Request side stays open until the server has finished
        drop(close);

        let connection = interpret_terminal_frame(last.as_ref())?;
        info!(frames, connection = %connection, "Match assigned");
        Ok(connection)
    }
}

/// Dial `endpoint`, find a match, and release the session
pub async fn find_match(
    endpoint: &str,
    connect_timeout: Duration,
    cancel: &CancellationToken,
) -> Result<String, FindMatchError> {
    let mut session = tokio::select! {
        _ = cancel.cancelled() => return Err(FindMatchError::Cancelled),
        session = FrontDoorSession::connect(endpoint, connect_timeout) => session?,
    };

    session.find_match(cancel).await
}
