//! Session, login and submission coordination.
//!
//! # State Machine
//! ```text
//! init_session(path) ──► network resolved ──► signer created ──► provider attached ──► ready
//!                                  │
//!                                  └─ no provider origin ──► signing disabled + error notification
//!
//! submit(request):
//!     Submitting ──► Broadcasting ──► Confirming ──► Succeeded | Failed
//!          └──────────────┴───────────────┴──────────► Failed (error notification)
//! ```
//!
//! Every awaited call is an external one (provider attach, login, invoke,
//! confirmation wait). Nothing here retries or times out on its own.

use std::sync::Arc;

use arc_swap::ArcSwap;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use crate::account::{AccountStore, LoginType};
use crate::blockchain::amount::AmountError;
use crate::blockchain::client::ConfirmationWaiter;
use crate::blockchain::explorer::{ExplorerLinks, LinkKind};
use crate::blockchain::network::{Network, NetworkRegistry};
use crate::blockchain::signer::{
    LoginOutcome, ProviderFactory, Signer, SignerError, SignerFactory, WebProviderFactory,
};
use crate::blockchain::transaction::TransactionRequest;
use crate::blockchain::types::{BlockchainError, TransactionStatus};
use crate::notifications::{NotificationSink, Notify};
use crate::observability::metrics;
use crate::session::tracker::{TransactionTracker, TxState};

const LINK_TITLE: &str = "View transaction";

/// Errors surfaced by [`SessionCoordinator::login`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// No signer is installed; `init_session` has not completed.
    #[error("Signer is not initialized")]
    NotInitialized,

    #[error(transparent)]
    Signer(#[from] SignerError),
}

/// Failure inside the submission pipeline. Always reported, never returned.
#[derive(Debug, Error)]
enum SubmitError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    Signer(#[from] SignerError),

    #[error(transparent)]
    Confirmation(#[from] BlockchainError),
}

/// Per-call submission options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOptions {
    /// Wait for the node to report the transaction before finishing.
    pub await_confirmation: bool,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            await_confirmation: true,
        }
    }
}

/// Terminal result of [`SessionCoordinator::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Broadcast accepted; confirmation was not awaited.
    Sent { submission: Uuid, tx_id: String },
    /// On chain and the script (if any) succeeded.
    Confirmed {
        submission: Uuid,
        status: TransactionStatus,
    },
    /// On chain but the script failed.
    ExecutionFailed {
        submission: Uuid,
        status: TransactionStatus,
    },
    /// The pipeline stopped before reaching the chain, or confirmation failed.
    Failed { submission: Uuid, message: String },
}

impl SubmissionOutcome {
    pub fn submission(&self) -> Uuid {
        match self {
            SubmissionOutcome::Sent { submission, .. }
            | SubmissionOutcome::Confirmed { submission, .. }
            | SubmissionOutcome::ExecutionFailed { submission, .. }
            | SubmissionOutcome::Failed { submission, .. } => *submission,
        }
    }
}

#[derive(Clone, Default)]
struct Session {
    signer: Option<Arc<dyn Signer>>,
    network: Option<Network>,
    authorized: bool,
    generation: u64,
}

/// Owns the signing session and drives login and submissions.
pub struct SessionCoordinator {
    registry: Arc<NetworkRegistry>,
    accounts: Arc<AccountStore>,
    notifier: Arc<dyn NotificationSink>,
    signers: Arc<dyn SignerFactory>,
    providers: Arc<dyn ProviderFactory>,
    waiter: Arc<dyn ConfirmationWaiter>,
    explorer: ExplorerLinks,
    session: ArcSwap<Session>,
    tracker: TransactionTracker,
}

impl SessionCoordinator {
    /// Create a coordinator with no session. Call [`init_session`](Self::init_session) next.
    pub fn new(
        accounts: Arc<AccountStore>,
        notifier: Arc<dyn NotificationSink>,
        signers: Arc<dyn SignerFactory>,
        waiter: Arc<dyn ConfirmationWaiter>,
        explorer: ExplorerLinks,
    ) -> Self {
        let registry = Arc::clone(accounts.registry());
        Self {
            registry,
            accounts,
            notifier,
            signers,
            providers: Arc::new(WebProviderFactory),
            waiter,
            explorer,
            session: ArcSwap::from_pointee(Session::default()),
            tracker: TransactionTracker::new(),
        }
    }

    /// Replace the submission tracker.
    pub fn with_tracker(mut self, tracker: TransactionTracker) -> Self {
        self.tracker = tracker;
        self
    }

    /// Replace the wallet provider factory.
    pub fn with_provider_factory(mut self, providers: Arc<dyn ProviderFactory>) -> Self {
        self.providers = providers;
        self
    }

    /// Build a fresh session for the network implied by `current_path`.
    ///
    /// The previous signer is discarded before anything is awaited. The new
    /// signer is installed only after its provider is attached, and only if
    /// no newer `init_session` started in the meantime.
    pub async fn init_session(&self, current_path: &str) {
        let network = self
            .accounts
            .network_for_address(current_path)
            .unwrap_or_else(|| self.registry.default_network().clone());

        let previous = self.session.rcu(|current| Session {
            signer: None,
            network: Some(network.clone()),
            authorized: false,
            generation: current.generation + 1,
        });
        let generation = previous.generation + 1;

        let Some(origin) = network.provider_origin.clone() else {
            metrics::record_session("unsupported");
            tracing::warn!(network = %network.id, "Signing provider does not support network");
            self.notifier.notify(
                &format!(
                    "Unfortunately, Exchange does not support the {} network ({}) at this time. Sign in with Keeper.",
                    network.id, network.node_url
                ),
                Notify::error(),
            );
            return;
        };

        let mut signer = self.signers.create(&network.node_url);
        let provider = self.providers.create(&origin);

        if let Err(e) = signer.set_provider(provider).await {
            metrics::record_session("provider_failed");
            tracing::error!(network = %network.id, error = %e, "Failed to attach signing provider");
            self.notifier.notify(&e.to_string(), Notify::error());
            return;
        }

        let signer: Arc<dyn Signer> = Arc::from(signer);
        let before = self.session.rcu(|current| {
            if current.generation == generation {
                Session {
                    signer: Some(signer.clone()),
                    ..Session::clone(current)
                }
            } else {
                Session::clone(current)
            }
        });

        if before.generation == generation {
            metrics::record_session("ready");
            tracing::info!(network = %network.id, origin = %origin, "Signing session ready");
        } else {
            tracing::debug!(network = %network.id, "Discarding signer from superseded session");
        }
    }

    /// Authenticate through the signer and record the account.
    ///
    /// A declined prompt is not an error and changes nothing.
    pub async fn login(&self) -> Result<(), SessionError> {
        let session = self.session.load_full();
        let signer = session.signer.clone().ok_or(SessionError::NotInitialized)?;

        let address = match signer.login().await? {
            LoginOutcome::Authorized { address, .. } => address,
            LoginOutcome::Declined => {
                metrics::record_login("declined");
                tracing::debug!("Login declined by user");
                return Ok(());
            }
        };

        let byte = signer.network_byte().await?;
        let network = self.resolve_network(byte);

        self.session.rcu(|current| {
            let mut next = Session::clone(current);
            if next.generation == session.generation {
                next.authorized = true;
            }
            next
        });
        self.accounts.apply_login(network, address, LoginType::Exchange);
        metrics::record_login("authorized");
        Ok(())
    }

    /// Map a raw chain byte to a known network.
    ///
    /// Unknown bytes give `None` silently; invalid values are reported as an
    /// error notification and also give `None`.
    pub fn resolve_network(&self, byte: i64) -> Option<Network> {
        match self.registry.resolve_byte(byte) {
            Ok(network) => network.cloned(),
            Err(e) => {
                tracing::warn!(chain_byte = byte, error = %e, "Chain byte resolution failed");
                self.notifier.notify(&e.to_string(), Notify::error());
                None
            }
        }
    }

    /// Normalize, sign, broadcast and confirm a transaction.
    ///
    /// Never fails: every error becomes exactly one error notification and
    /// a [`SubmissionOutcome::Failed`].
    pub async fn submit(&self, request: TransactionRequest, options: SubmitOptions) -> SubmissionOutcome {
        let submission = self.tracker.begin();
        let span = tracing::info_span!("submit", %submission, d_app = %request.d_app);

        async move {
            match self.run_pipeline(submission, request, options).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    let message = e.to_string();
                    tracing::error!(error = %message, "Submission failed");
                    metrics::record_transaction("failed");
                    self.tracker.fail(submission, &message);
                    self.notifier.notify(&message, Notify::error());
                    SubmissionOutcome::Failed {
                        submission,
                        message,
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Run [`submit`](Self::submit) on the runtime without waiting for it.
    pub fn spawn_submit(
        self: &Arc<Self>,
        request: TransactionRequest,
        options: SubmitOptions,
    ) -> JoinHandle<SubmissionOutcome> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.submit(request, options).await })
    }

    async fn run_pipeline(
        &self,
        submission: Uuid,
        request: TransactionRequest,
        options: SubmitOptions,
    ) -> Result<SubmissionOutcome, SubmitError> {
        let tx = request.normalize(&self.accounts.fee())?;

        let session = self.session.load_full();
        let (signer, network) = match (&session.signer, &session.network) {
            (Some(signer), Some(network)) => (Arc::clone(signer), network.clone()),
            _ => return Err(SessionError::NotInitialized.into()),
        };

        self.tracker.advance(submission, TxState::Broadcasting);
        let broadcasted = signer.invoke_and_broadcast(tx).await?;
        let tx_id = broadcasted.id;

        self.tracker.set_tx_id(submission, &tx_id);
        tracing::info!(tx_id = %tx_id, network = %network.id, "Transaction broadcast");
        self.notifier
            .notify(&format!("Transaction sent: {}", tx_id), Notify::info());

        if !options.await_confirmation {
            self.tracker.advance(submission, TxState::Sent);
            metrics::record_transaction("sent");
            return Ok(SubmissionOutcome::Sent { submission, tx_id });
        }

        self.tracker.advance(submission, TxState::Confirming);
        let status = self
            .waiter
            .wait_for_transaction(&tx_id, &network.node_url)
            .await?;

        let link = (!tx_id.is_empty())
            .then(|| self.explorer.link(&network.explorer_code, &tx_id, LinkKind::Tx));

        if status.is_script_failure() {
            tracing::warn!(tx_id = %tx_id, "Script execution failed");
            metrics::record_transaction("script_failed");
            self.tracker.fail(submission, "Script execution failed");
            self.notifier.notify(
                "Script execution failed",
                Notify::error().with_link(link, LINK_TITLE),
            );
            Ok(SubmissionOutcome::ExecutionFailed { submission, status })
        } else {
            tracing::info!(tx_id = %tx_id, height = ?status.height, "Transaction confirmed");
            metrics::record_transaction("succeeded");
            self.tracker.advance(submission, TxState::Succeeded);
            self.notifier
                .notify("Success", Notify::success().with_link(link, LINK_TITLE));
            Ok(SubmissionOutcome::Confirmed { submission, status })
        }
    }

    /// Whether a signer is installed.
    pub fn is_ready(&self) -> bool {
        self.session.load().signer.is_some()
    }

    /// Whether the current session completed a login.
    pub fn is_authorized(&self) -> bool {
        self.session.load().authorized
    }

    /// Network the current session was built for.
    pub fn active_network(&self) -> Option<Network> {
        self.session.load().network.clone()
    }

    pub fn accounts(&self) -> &Arc<AccountStore> {
        &self.accounts
    }

    pub fn tracker(&self) -> &TransactionTracker {
        &self.tracker
    }
}

impl std::fmt::Debug for SessionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.session.load();
        f.debug_struct("SessionCoordinator")
            .field("network", &session.network.as_ref().map(|n| n.id.as_str()))
            .field("ready", &session.signer.is_some())
            .field("authorized", &session.authorized)
            .finish()
    }
}
