//! gRPC server lifecycle for the services host

use crate::host::handlers::MatchmakingServices;
use crate::pb::openmatch::evaluator_server::EvaluatorServer;
use crate::pb::openmatch::match_function_server::MatchFunctionServer;
use crate::pb::wrapper::allocater_server::AllocaterServer;
use crate::pb::wrapper::profiles_provider_server::ProfilesProviderServer;
use crate::pb::wrapper::ticket_generator_server::TicketGeneratorServer;
use anyhow::{Context, Result};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::server::Router;
use tonic::transport::Server;
use tracing::{error, info};

/// Register all five endpoints on a fresh tonic router
pub fn router(services: Arc<MatchmakingServices>) -> Router {
    Server::builder()
        .add_service(TicketGeneratorServer::from_arc(services.clone()))
        .add_service(ProfilesProviderServer::from_arc(services.clone()))
        .add_service(AllocaterServer::from_arc(services.clone()))
        .add_service(EvaluatorServer::from_arc(services.clone()))
        .add_service(MatchFunctionServer::from_arc(services))
}

/// Bind the listen socket on all interfaces
pub async fn bind(port: u16) -> Result<TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!(error = %e, port, "TCP listen error");
        e
    });
    let listener = listener.with_context(|| format!("Failed to listen on port {}", port))?;

    info!(port, "TCP net listener initialized");
    Ok(listener)
}

/// Serve the services on an already bound listener until `shutdown` resolves
pub async fn serve_with_listener<F>(
    services: Arc<MatchmakingServices>,
    listener: TcpListener,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    router(services)
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await
        .map_err(|e| {
            error!(error = %e, "gRPC serve error");
            e
        })
        .context("gRPC serve error")?;

    info!("Services host stopped");
    Ok(())
}
