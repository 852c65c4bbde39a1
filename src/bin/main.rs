use std::error::Error;
use std::sync::Arc;
use std::time::Instant;

use futures_util::{SinkExt, StreamExt};
use keyauth::auth::Authenticator;
use keyauth::chain::ChainClient;
use keyauth::keys::LegacyKeyConverter;
use keyauth::rpc;
use keyauth::settings::ServerSettings;
use log::{debug, error, info};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio_native_tls::TlsAcceptor;
use tokio_tungstenite::tungstenite::Message;

trait AsyncStream: AsyncRead + AsyncWrite + Unpin + Send {}
impl<T> AsyncStream for T where T: AsyncRead + AsyncWrite + Unpin + Send {}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    env_logger::init();

    // Load configuration
    let settings = Arc::new(ServerSettings::from_env()?);

    // Set up TLS if a certificate is configured
    let tls_acceptor = if settings.tls_enabled {
        Some(TlsAcceptor::from(load_tls_config(
            &settings.tls_cert_path,
            &settings.tls_key_path,
        )?))
    } else {
        None
    };

    let chain = ChainClient::new(
        settings.chain_http_url.clone(),
        settings.chain_request_timeout,
        LegacyKeyConverter::new(settings.legacy_key_prefixes.clone()),
    )?;
    info!("Using chain node {:?}", chain);
    let authenticator = Arc::new(
        Authenticator::new(Arc::new(chain), settings.domain_suffix.clone())
            .with_secret_ttl(settings.secret_ttl),
    );
    if let Some(ttl) = settings.secret_ttl {
        info!("Pending secrets expire after {:?}", ttl);
    }

    // Bind the server
    let listener = TcpListener::bind(format!("0.0.0.0:{}", settings.port)).await?;
    info!("Listening on: 0.0.0.0:{}", settings.port);

    // Accept connections
    while let Ok((stream, peer)) = listener.accept().await {
        let tls_acceptor = tls_acceptor.clone();
        let settings = settings.clone();
        let authenticator = authenticator.clone();
        tokio::spawn(async move {
            // Use a trait object to hold either TcpStream or TlsStream<TcpStream>
            let stream: Box<dyn AsyncStream> = if let Some(tls_acceptor) = tls_acceptor {
                match tls_acceptor.accept(stream).await {
                    Ok(tls_stream) => Box::new(tls_stream),
                    Err(e) => {
                        error!("Failed to accept TLS connection from {}: {}", peer, e);
                        return;
                    }
                }
            } else {
                Box::new(stream)
            };

            debug!("Connection from {}", peer);
            handle_connection(stream, &settings, authenticator).await;
        });
    }

    Ok(())
}

fn load_tls_config(
    cert_path: &str,
    key_path: &str,
) -> Result<native_tls::TlsAcceptor, Box<dyn Error>> {
    let cert = std::fs::read(cert_path)?;
    let key = std::fs::read(key_path)?;

    let identity = native_tls::Identity::from_pkcs8(&cert, &key)?;
    let acceptor = native_tls::TlsAcceptor::new(identity)?;

    Ok(acceptor)
}

async fn handle_connection(
    stream: impl AsyncRead + AsyncWrite + Unpin,
    settings: &ServerSettings,
    authenticator: Arc<Authenticator>,
) {
    let mut ws_stream = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            error!("Failed to accept websocket: {}", e);
            return;
        }
    };

    while let Some(incoming) = ws_stream.next().await {
        let msg = match incoming {
            Ok(msg) => msg,
            Err(e) => {
                error!("Error reading message: {}", e);
                break;
            }
        };
        if msg.is_close() {
            debug!("Received a close message.");
            break;
        }
        if !msg.is_text() {
            continue;
        }
        let text = match msg.into_text() {
            Ok(text) => text,
            Err(e) => {
                error!("Invalid text frame: {}", e);
                continue;
            }
        };

        let start = Instant::now();
        let reply = rpc::handle_text(&authenticator, &text).await;
        log_timing(settings, "JSON-RPC call", start.elapsed());

        if ws_stream.send(Message::Text(reply)).await.is_err() {
            error!("Failed to send response through WebSocket");
            break;
        }
    }
}

fn log_timing(settings: &ServerSettings, message: &str, duration: std::time::Duration) {
    if settings.enable_timing_logs {
        info!("{}: {:?}", message, duration);
    }
}
