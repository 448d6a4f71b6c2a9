use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, instrument};

use crate::commands;
use crate::connection::Connection;
use crate::registry::Registry;
use crate::Error;

pub async fn run(port: u16) -> Result<(), Error> {
    let _ = tracing_subscriber::fmt()
        .try_init()
        .map_err(|e| debug!("Failed to initialize global tracing: {}", e));

    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    let registry = Registry::new();

    info!("rowdis server listening on {}", listener.local_addr()?);

    loop {
        match listener.accept().await {
            Ok((socket, client_address)) => {
                let registry = registry.clone();
                info!("Accepted connection from {:?}", client_address);

                tokio::spawn(async move {
                    if let Err(e) = handle_connection(socket, client_address, registry).await {
                        error!("Connection error: {}", e);
                    }
                });
            }
            // A failed accept affects no established connection.
            Err(e) => error!("Error accepting connection: {}", e),
        }
    }
}

#[instrument(
    name = "connection",
    skip(stream, registry),
    fields(connection_id, client_address)
)]
async fn handle_connection(
    stream: TcpStream,
    client_address: SocketAddr,
    registry: Registry,
) -> Result<(), Error> {
    let mut conn = Connection::new(stream);

    tracing::Span::current()
        .record("connection_id", conn.id.to_string())
        .record("client_address", client_address.to_string());

    while let Some(line) = conn.read_command().await? {
        debug!("Received command: {:?}", line);
        let res = commands::dispatch(&registry, &line);
        debug!("Sending response: {:?}", res);

        conn.write_response(res).await?;
    }

    info!("Connection closed");
    Ok(())
}
