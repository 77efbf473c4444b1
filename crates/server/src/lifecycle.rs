//! Listener lifetime and the graceful-then-forced shutdown protocol.
//!
//! `Starting -> Serving -> Draining -> Terminated`. Once a termination signal
//! arrives the listener is closed at once and in-flight requests get the grace
//! period to finish. Whichever of "all requests done" and "grace elapsed"
//! happens first decides the exit code.

use std::fmt;
use std::future::{Future, IntoFuture};
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, watch};
use tracing::{error, info, warn};

use crate::error::ServerError;

/// Phase of the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Starting,
    Serving,
    Draining,
    Terminated,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Starting => "starting",
            Self::Serving => "serving",
            Self::Draining => "draining",
            Self::Terminated => "terminated",
        })
    }
}

/// How the drain phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every in-flight request finished inside the grace period.
    Clean,
    /// The grace period elapsed first.
    Forced,
}

impl ShutdownOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Clean => 0,
            Self::Forced => 1,
        }
    }
}

/// Owns the lifecycle state and the shutdown grace period.
#[derive(Debug)]
pub struct Lifecycle {
    state: watch::Sender<LifecycleState>,
    grace: Duration,
}

impl Lifecycle {
    pub fn new(grace: Duration) -> Self {
        let (state, _) = watch::channel(LifecycleState::Starting);
        Self { state, grace }
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    fn transition(&self, next: LifecycleState) {
        let prev = self.state.send_replace(next);
        info!(from = %prev, to = %next, "lifecycle transition");
    }

    /// Bind the listener. Failure here is fatal to startup.
    pub async fn bind(&self, addr: &str) -> Result<TcpListener, ServerError> {
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            error!(address = addr, error = %e, "failed to bind listener");
            ServerError::bind(addr, e)
        })?;
        info!(address = addr, "listener bound");
        Ok(listener)
    }

    /// Serve `router` on `listener` until `shutdown` resolves, then drain.
    ///
    /// Returns [`ShutdownOutcome::Forced`] when in-flight requests are still
    /// running after the grace period; the caller is expected to exit the
    /// process immediately in that case.
    pub async fn serve<F>(
        &self,
        listener: TcpListener,
        router: Router,
        shutdown: F,
    ) -> Result<ShutdownOutcome, ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (drain_tx, drain_rx) = oneshot::channel::<()>();
        let server = axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown.await;
                let _ = drain_tx.send(());
            })
            .into_future();
        let mut server = std::pin::pin!(server);

        self.transition(LifecycleState::Serving);

        tokio::select! {
            result = &mut server => {
                // The server stopped without a shutdown request.
                self.transition(LifecycleState::Terminated);
                result?;
                return Ok(ShutdownOutcome::Clean);
            }
            _ = drain_rx => {}
        }

        self.transition(LifecycleState::Draining);
        info!(
            grace_secs = self.grace.as_secs_f64(),
            "stopped accepting connections, draining in-flight requests"
        );

        let outcome = match tokio::time::timeout(self.grace, &mut server).await {
            Ok(result) => {
                result?;
                info!("all in-flight requests completed");
                ShutdownOutcome::Clean
            }
            Err(_) => {
                error!(
                    grace_secs = self.grace.as_secs_f64(),
                    "grace period elapsed with requests still in flight, forcing exit"
                );
                ShutdownOutcome::Forced
            }
        };

        self.transition(LifecycleState::Terminated);
        Ok(outcome)
    }
}

/// Serve with a fresh [`Lifecycle`] using `grace` as the drain deadline.
pub async fn serve<F>(
    listener: TcpListener,
    router: Router,
    shutdown: F,
    grace: Duration,
) -> Result<ShutdownOutcome, ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    Lifecycle::new(grace).serve(listener, router, shutdown).await
}

/// Resolve on SIGINT or, on Unix, SIGTERM.
///
/// If a handler cannot be installed the failure is logged and that signal
/// is ignored; the other one still works.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
