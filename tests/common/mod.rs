//! Shared mocks for integration tests.
#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;

use signer_gateway::account::AccountStore;
use signer_gateway::blockchain::signer::{
    BroadcastedTransaction, LoginOutcome, Signer, SignerError, SignerFactory, SignerResult,
    WalletProvider,
};
use signer_gateway::blockchain::types::{BlockchainError, BlockchainResult, ChainByte};
use signer_gateway::blockchain::{
    ConfirmationWaiter, ExplorerLinks, InvokeTransaction, NetworkRegistry, TransactionStatus,
};
use signer_gateway::config::GatewayConfig;
use signer_gateway::notifications::{Notification, NotificationSink, Notify, NotifyKind};
use signer_gateway::session::TransactionTracker;
use signer_gateway::SessionCoordinator;

/// How mock signers respond.
#[derive(Clone)]
pub struct Behaviour {
    pub provider: Result<(), SignerError>,
    pub login: LoginOutcome,
    pub network_byte: i64,
    pub broadcast: Result<BroadcastedTransaction, SignerError>,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            provider: Ok(()),
            login: LoginOutcome::Authorized {
                address: "3MtestAddress".into(),
                public_key: None,
            },
            network_byte: 84,
            broadcast: Ok(BroadcastedTransaction { id: "tx1".into() }),
        }
    }
}

pub struct MockSigner {
    behaviour: Behaviour,
    invoked: Arc<Mutex<Vec<InvokeTransaction>>>,
    provider_origin: Option<Url>,
}

#[async_trait]
impl Signer for MockSigner {
    async fn set_provider(&mut self, provider: Arc<dyn WalletProvider>) -> SignerResult<()> {
        self.provider_origin = Some(provider.origin().clone());
        self.behaviour.provider.clone()
    }

    async fn login(&self) -> SignerResult<LoginOutcome> {
        Ok(self.behaviour.login.clone())
    }

    async fn network_byte(&self) -> SignerResult<i64> {
        Ok(self.behaviour.network_byte)
    }

    async fn invoke_and_broadcast(
        &self,
        tx: InvokeTransaction,
    ) -> SignerResult<BroadcastedTransaction> {
        self.invoked.lock().unwrap().push(tx);
        self.behaviour.broadcast.clone()
    }
}

/// Builds [`MockSigner`]s and remembers what they were asked to do.
#[derive(Default)]
pub struct MockSignerFactory {
    pub behaviour: Behaviour,
    pub created_for: Mutex<Vec<Url>>,
    pub invoked: Arc<Mutex<Vec<InvokeTransaction>>>,
}

impl MockSignerFactory {
    pub fn new(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            ..Default::default()
        }
    }

    pub fn invoked(&self) -> Vec<InvokeTransaction> {
        self.invoked.lock().unwrap().clone()
    }
}

impl SignerFactory for MockSignerFactory {
    fn create(&self, node_url: &Url) -> Box<dyn Signer> {
        self.created_for.lock().unwrap().push(node_url.clone());
        Box::new(MockSigner {
            behaviour: self.behaviour.clone(),
            invoked: Arc::clone(&self.invoked),
            provider_origin: None,
        })
    }
}

/// Confirmation waiter returning a fixed status, or timing out when `None`.
#[derive(Default)]
pub struct MockWaiter {
    pub status: Option<TransactionStatus>,
    pub calls: Mutex<Vec<(String, Url)>>,
}

impl MockWaiter {
    pub fn returning(status: TransactionStatus) -> Self {
        Self {
            status: Some(status),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, Url)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfirmationWaiter for MockWaiter {
    async fn wait_for_transaction(
        &self,
        id: &str,
        api_base: &Url,
    ) -> BlockchainResult<TransactionStatus> {
        self.calls
            .lock()
            .unwrap()
            .push((id.to_string(), api_base.clone()));
        self.status
            .clone()
            .ok_or_else(|| BlockchainError::ConfirmationTimeout {
                id: id.to_string(),
                secs: 120,
            })
    }
}

/// Sink that keeps every notification.
#[derive(Default)]
pub struct RecordingSink {
    notes: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn all(&self) -> Vec<Notification> {
        self.notes.lock().unwrap().clone()
    }

    pub fn of_kind(&self, kind: NotifyKind) -> Vec<Notification> {
        self.all()
            .into_iter()
            .filter(|n| n.options.kind == kind)
            .collect()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, message: &str, options: Notify) {
        self.notes.lock().unwrap().push(Notification {
            message: message.to_string(),
            options,
        });
    }
}

/// Everything a test needs to drive a coordinator.
pub struct Harness {
    pub coordinator: Arc<SessionCoordinator>,
    pub sink: Arc<RecordingSink>,
    pub signers: Arc<MockSignerFactory>,
    pub accounts: Arc<AccountStore>,
}

pub fn harness_with(
    config: &GatewayConfig,
    behaviour: Behaviour,
    waiter: Arc<dyn ConfirmationWaiter>,
) -> Harness {
    let registry = Arc::new(NetworkRegistry::from_config(config).unwrap());
    let accounts = Arc::new(AccountStore::new(registry, &config.account));
    let sink = Arc::new(RecordingSink::default());
    let signers = Arc::new(MockSignerFactory::new(behaviour));

    let coordinator = Arc::new(SessionCoordinator::new(
        Arc::clone(&accounts),
        sink.clone(),
        signers.clone(),
        waiter,
        ExplorerLinks::new(&config.explorer),
    )
    .with_tracker(TransactionTracker::with_ttl(config.tracker.finished_ttl())));

    Harness {
        coordinator,
        sink,
        signers,
        accounts,
    }
}

pub fn harness(behaviour: Behaviour, waiter: Arc<dyn ConfirmationWaiter>) -> Harness {
    harness_with(&GatewayConfig::default(), behaviour, waiter)
}

pub fn succeeded(id: &str) -> TransactionStatus {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "applicationStatus": "succeeded",
        "height": 100
    }))
    .unwrap()
}

pub fn script_failed(id: &str) -> TransactionStatus {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "applicationStatus": "scriptExecutionFailed",
        "height": 100
    }))
    .unwrap()
}

/// Base58 address on `chain` (layout only, checksum is not real).
pub fn address_on(chain: ChainByte) -> String {
    let mut bytes = vec![1u8, chain.0];
    bytes.extend([9u8; 24]);
    bs58::encode(bytes).into_string()
}

/// Start a node stub on an ephemeral port. `f` gives status and body per request.
pub async fn start_programmable_node<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = Vec::new();
                        let mut chunk = [0u8; 1024];
                        loop {
                            match socket.read(&mut chunk).await {
                                Ok(0) | Err(_) => break,
                                Ok(n) => {
                                    buf.extend_from_slice(&chunk[..n]);
                                    if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                                        break;
                                    }
                                }
                            }
                        }
                        let request = String::from_utf8_lossy(&buf).to_string();
                        let path = request
                            .split_whitespace()
                            .nth(1)
                            .unwrap_or("/")
                            .to_string();

                        let (status, body) = f(path).await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
