use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use uuid::Uuid;

use crate::codec::CommandCodec;
use crate::response::Response;
use crate::Result;

/// One client connection: a framed stream of inbound command lines and
/// outbound responses.
pub struct Connection {
    pub id: Uuid,
    frames: Framed<TcpStream, CommandCodec>,
}

impl Connection {
    pub fn new(stream: TcpStream) -> Connection {
        Connection {
            id: Uuid::new_v4(),
            frames: Framed::new(stream, CommandCodec),
        }
    }

    /// Reads the next command line. Returns `None` once the peer has closed
    /// the connection and the read buffer is drained.
    pub async fn read_command(&mut self) -> Result<Option<String>> {
        self.frames.next().await.transpose()
    }

    pub async fn write_response(&mut self, response: Response) -> Result<()> {
        self.frames.send(response).await
    }
}
