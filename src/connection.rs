use crate::client::LifelineClient;
use crate::config::ResolvedOptions;
use crate::error::{LifelineDbError, is_connection_lost};

/// Trivial query used solely to decide whether the session is still usable.
const LIVENESS_PROBE: &str = "SELECT 1";

/// Session status as reported after a liveness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Live,
    Dead,
}

impl LifelineClient {
    pub(crate) fn open_session(
        opts: &ResolvedOptions,
    ) -> Result<postgres::Client, LifelineDbError> {
        opts.pg_config().connect(postgres::NoTls).map_err(|err| {
            LifelineDbError::ConnectionError(format!(
                "failed to open session to host {}: {err}",
                opts.host
            ))
        })
    }

    /// Replace the session with a freshly opened one.
    ///
    /// The previous session is dropped, which closes its socket; any open
    /// transaction dies with it.
    pub(crate) fn establish(&mut self) -> Result<(), LifelineDbError> {
        self.session = Self::open_session(&self.opts)?;
        self.in_transaction = false;
        Ok(())
    }

    /// Probe the session and reconnect once if the probe reports a
    /// connection-lost condition.
    ///
    /// At most one silent reconnect per call: a probe failure that is not
    /// connection-lost propagates, as does a failed reconnect. This runs
    /// before every execution on both the raw-text and parameterized paths.
    ///
    /// # Errors
    /// Non-connection probe failures and reconnect failures.
    pub fn ensure_live(&mut self) -> Result<Liveness, LifelineDbError> {
        if let Err(err) = self.probe() {
            if is_connection_lost(&err) {
                self.log(&format!("session lost, reconnecting to host {}", self.opts.host));
                self.establish()?;
            } else {
                return Err(err.into());
            }
        }

        if self.session.is_closed() {
            Ok(Liveness::Dead)
        } else {
            Ok(Liveness::Live)
        }
    }

    fn probe(&mut self) -> Result<(), postgres::Error> {
        self.ensure_transaction()?;
        self.session.batch_execute(LIVENESS_PROBE)
    }
}
