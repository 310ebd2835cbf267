use crate::ShutdownCoordinator;
use crate::error::{Result as ServerErrorResult, ServerError};

use kl_lifecycle::StartupLock;

use std::net::SocketAddr;
use std::panic::Location;

use axum::Router;
use error_location::ErrorLocation;
use log::info;
use tokio::net::TcpListener;

/// Serve `router` on `address` until `shutdown` fires.
///
/// The startup lock, if any, is released as soon as the socket is bound.
pub async fn serve(
    address: SocketAddr,
    router: Router,
    shutdown: ShutdownCoordinator,
    startup_lock: Option<StartupLock>,
) -> ServerErrorResult<()> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| ServerError::Bind {
            address,
            source,
            location: ErrorLocation::from(Location::caller()),
        })?;

    let actual_addr = listener.local_addr()?;
    info!("Server listening on {actual_addr}");

    if let Some(mut lock) = startup_lock {
        lock.release();
    }

    info!("Server ready to accept connections");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown.wait())
        .await
        .map_err(|source| ServerError::Serve {
            source,
            location: ErrorLocation::from(Location::caller()),
        })?;

    info!("Graceful shutdown complete");
    Ok(())
}
