use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use rowdis::connection::Connection;
use rowdis::response::Response;

/// Sets up a connected TCP pair on a loopback socket: one end plays the
/// client, the other is wrapped by `Connection` the way the server does.
async fn create_tcp_pair() -> Result<(TcpStream, Connection), std::io::Error> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let local_addr = listener.local_addr()?;

    let client = TcpStream::connect(local_addr).await?;
    let (server, _) = listener.accept().await?;

    Ok((client, Connection::new(server)))
}

#[tokio::test]
async fn read_one_command_per_line() {
    let (mut client, mut connection) = create_tcp_pair().await.unwrap();

    client
        .write_all(b"NEW car:1 name 'bmw'\nGET car:1\r\n")
        .await
        .unwrap();

    let actual = connection.read_command().await.unwrap();
    assert_eq!(actual, Some("NEW car:1 name 'bmw'".to_string()));

    let actual = connection.read_command().await.unwrap();
    assert_eq!(actual, Some("GET car:1".to_string()));
}

#[tokio::test]
async fn read_command_split_across_writes() {
    let (mut client, mut connection) = create_tcp_pair().await.unwrap();

    client.write_all(b"NEW car:1 na").await.unwrap();
    client.write_all(b"me 'bmw'\n").await.unwrap();

    let actual = connection.read_command().await.unwrap();
    assert_eq!(actual, Some("NEW car:1 name 'bmw'".to_string()));
}

#[tokio::test]
async fn read_flushes_final_line_on_eof() {
    let (mut client, mut connection) = create_tcp_pair().await.unwrap();

    client.write_all(b"GET car:1").await.unwrap();
    client.shutdown().await.unwrap();

    let actual = connection.read_command().await.unwrap();
    assert_eq!(actual, Some("GET car:1".to_string()));

    let actual = connection.read_command().await.unwrap();
    assert_eq!(actual, None);
}

#[tokio::test]
async fn write_response_appends_one_newline() {
    let (mut client, mut connection) = create_tcp_pair().await.unwrap();

    connection.write_response(Response::Applied).await.unwrap();
    connection
        .write_response(Response::Records(vec![
            "id 1 name 'bmw'".to_string(),
            "id 2 name 'audi'".to_string(),
        ]))
        .await
        .unwrap();
    drop(connection);

    let mut received = String::new();
    client.read_to_string(&mut received).await.unwrap();

    assert_eq!(received, "1\nid 1 name 'bmw'\nid 2 name 'audi'\n");
}
