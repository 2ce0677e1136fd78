//! Test fixtures: in-process fakes of the logic service and the front door

#![allow(dead_code)]

use first_match::pb::openmatch::mm_logic_server::{MmLogic, MmLogicServer};
use first_match::pb::openmatch::{
    Assignment, AssignmentError, QueryTicketsRequest, QueryTicketsResponse, Ticket,
};
use first_match::pb::wrapper::find_match_response::State;
use first_match::pb::wrapper::front_door_server::{FrontDoor, FrontDoorServer};
use first_match::pb::wrapper::{FindMatchRequest, FindMatchResponse};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_stream::wrappers::{ReceiverStream, TcpListenerStream};
use tokio_util::sync::CancellationToken;
use tonic::transport::{Channel, Endpoint, Server};
use tonic::{Request, Response, Status, Streaming};

/// Ticket with the given id and no assignment
pub fn ticket(id: &str) -> Ticket {
    Ticket {
        id: id.to_string(),
        assignment: None,
    }
}

/// Tickets for each id, in order
pub fn tickets(ids: &[&str]) -> Vec<Ticket> {
    ids.iter().map(|id| ticket(id)).collect()
}

/// Frame in the given state without an assignment
pub fn frame(state: State) -> FindMatchResponse {
    FindMatchResponse {
        state: state as i32,
        assignment: None,
    }
}

/// Assigned frame carrying a connection string
pub fn assigned(connection: &str) -> FindMatchResponse {
    FindMatchResponse {
        state: State::Assigned as i32,
        assignment: Some(Assignment {
            connection: connection.to_string(),
            error: None,
        }),
    }
}

/// Assigned frame whose assignment carries an error
pub fn assigned_with_error(code: i32, message: &str) -> FindMatchResponse {
    FindMatchResponse {
        state: State::Assigned as i32,
        assignment: Some(Assignment {
            connection: String::new(),
            error: Some(AssignmentError {
                code,
                message: message.to_string(),
            }),
        }),
    }
}

/// Fake logic service answering from a fixed pool table
///
/// Each pool is a list of pages; every page becomes one stream message.
#[derive(Debug, Default, Clone)]
pub struct FakeMmLogic {
    pools: HashMap<String, Vec<Vec<Ticket>>>,
    failures: HashMap<String, Status>,
    queries: Arc<AtomicUsize>,
}

impl FakeMmLogic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `tickets` for `pool` in a single page
    pub fn with_pool(self, pool: &str, tickets: Vec<Ticket>) -> Self {
        self.with_pages(pool, vec![tickets])
    }

    /// Serve `pages` for `pool`, one message per page
    pub fn with_pages(mut self, pool: &str, pages: Vec<Vec<Ticket>>) -> Self {
        self.pools.insert(pool.to_string(), pages);
        self
    }

    /// Fail every query for `pool` with `status`
    pub fn with_failure(mut self, pool: &str, status: Status) -> Self {
        self.failures.insert(pool.to_string(), status);
        self
    }

    /// Number of queries received so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[tonic::async_trait]
impl MmLogic for FakeMmLogic {
    type QueryTicketsStream = ReceiverStream<Result<QueryTicketsResponse, Status>>;

    async fn query_tickets(
        &self,
        request: Request<QueryTicketsRequest>,
    ) -> Result<Response<Self::QueryTicketsStream>, Status> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let name = request
            .into_inner()
            .pool
            .map(|pool| pool.name)
            .ok_or_else(|| Status::invalid_argument("pool is required"))?;

        if let Some(status) = self.failures.get(&name) {
            return Err(status.clone());
        }

        let pages = self.pools.get(&name).cloned().unwrap_or_default();
        let (tx, rx) = mpsc::channel(pages.len().max(1));
        for page in pages {
            let _ = tx.send(Ok(QueryTicketsResponse { tickets: page })).await;
        }

        Ok(Response::new(ReceiverStream::new(rx)))
    }
}

/// Fake front door replaying a scripted conversation
#[derive(Debug, Default, Clone)]
pub struct FakeFrontDoor {
    frames: Vec<FindMatchResponse>,
    trailing_error: Option<Status>,
    hold_open: bool,
    requests: Arc<AtomicUsize>,
    closed_early: Arc<AtomicBool>,
}

impl FakeFrontDoor {
    /// Emit `frames` in order and close the stream
    pub fn new(frames: Vec<FindMatchResponse>) -> Self {
        Self {
            frames,
            ..Default::default()
        }
    }

    /// Fail the stream with `status` after the scripted frames
    pub fn then_fail(mut self, status: Status) -> Self {
        self.trailing_error = Some(status);
        self
    }

    /// Keep the stream open after the scripted frames
    pub fn then_hang(mut self) -> Self {
        self.hold_open = true;
        self
    }

    /// Number of `FindMatchRequest` messages received so far
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Whether the client closed its request side before any frame was sent
    pub fn closed_early(&self) -> bool {
        self.closed_early.load(Ordering::SeqCst)
    }
}

#[tonic::async_trait]
impl FrontDoor for FakeFrontDoor {
    type FindMatchStream = ReceiverStream<Result<FindMatchResponse, Status>>;

    async fn find_match(
        &self,
        request: Request<Streaming<FindMatchRequest>>,
    ) -> Result<Response<Self::FindMatchStream>, Status> {
        let mut inbound = request.into_inner();
        let (tx, rx) = mpsc::channel(self.frames.len() + 1);
        let script = self.clone();

        tokio::spawn(async move {
            // The conversation starts once the client's request has arrived
            match inbound.message().await {
                Ok(Some(_)) => {
                    script.requests.fetch_add(1, Ordering::SeqCst);
                }
                _ => return,
            }

            // A well-behaved client keeps its side open while it waits
            match tokio::time::timeout(Duration::from_millis(50), inbound.message()).await {
                Ok(Ok(Some(_))) => {
                    script.requests.fetch_add(1, Ordering::SeqCst);
                }
                Ok(_) => script.closed_early.store(true, Ordering::SeqCst),
                Err(_) => {}
            }

            for frame in script.frames {
                if tx.send(Ok(frame)).await.is_err() {
                    return;
                }
            }
            if let Some(status) = script.trailing_error {
                let _ = tx.send(Err(status)).await;
                return;
            }
            if script.hold_open {
                tx.closed().await;
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }
}

/// A fake server bound to an ephemeral local port
pub struct RunningServer {
    pub addr: SocketAddr,
    shutdown: CancellationToken,
}

impl RunningServer {
    /// `http://` endpoint of the server
    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Open a channel to the server
    pub async fn channel(&self) -> Channel {
        Endpoint::from_shared(self.endpoint())
            .unwrap()
            .connect()
            .await
            .unwrap()
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Bind a listener on 127.0.0.1 with an ephemeral port
pub async fn local_listener() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

/// Start a fake logic service
pub async fn spawn_mmlogic(fake: FakeMmLogic) -> RunningServer {
    let (listener, addr) = local_listener().await;
    let shutdown = CancellationToken::new();
    let stop = shutdown.clone();

    tokio::spawn(async move {
        Server::builder()
            .add_service(MmLogicServer::new(fake))
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), stop.cancelled_owned())
            .await
            .unwrap();
    });

    RunningServer { addr, shutdown }
}

/// Start a fake front door
pub async fn spawn_front_door(fake: FakeFrontDoor) -> RunningServer {
    let (listener, addr) = local_listener().await;
    let shutdown = CancellationToken::new();
    let stop = shutdown.clone();

    tokio::spawn(async move {
        Server::builder()
            .add_service(FrontDoorServer::new(fake))
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), stop.cancelled_owned())
            .await
            .unwrap();
    });

    RunningServer { addr, shutdown }
}
