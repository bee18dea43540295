//! Engine behind the proxy shell
//!
//! `ProxiedCore` is what the outside world holds: the shell carries
//! identity, admin, and the adopted storage, while the engine carries
//! logic. Swapping the engine preserves storage wholesale; the shell
//! refuses engines whose layout would not.

use lendcore_core::Address;
use lendcore_proxy::{ProxyError, ProxyShell};

use crate::engine::RiskEngine;

pub struct ProxiedCore {
    shell: ProxyShell,
    engine: Option<RiskEngine>,
}

impl ProxiedCore {
    /// An empty proxy administered by `admin`, with no engine adopted.
    pub fn new(admin: Address) -> Self {
        Self {
            shell: ProxyShell::new(admin),
            engine: None,
        }
    }

    pub fn shell(&self) -> &ProxyShell {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut ProxyShell {
        &mut self.shell
    }

    /// The active engine, if one has been adopted.
    pub fn engine(&self) -> Result<&RiskEngine, ProxyError> {
        self.engine.as_ref().ok_or(ProxyError::NoImplementation)
    }

    pub fn engine_mut(&mut self) -> Result<&mut RiskEngine, ProxyError> {
        self.engine.as_mut().ok_or(ProxyError::NoImplementation)
    }

    /// Adopt `engine` as the active implementation. The proxy admin
    /// drives this; the engine must have been nominated beforehand and
    /// its storage layout must extend the active one. Storage from the
    /// outgoing engine carries over to the incoming one.
    pub fn become_implementation(
        &mut self,
        caller: Address,
        mut engine: RiskEngine,
    ) -> Result<(), ProxyError> {
        if caller != self.shell.admin() {
            return Err(ProxyError::NotProxyAdmin);
        }

        let code = self
            .shell
            .accept_implementation(engine.address(), &engine.storage_layout())?;
        if !code.is_no_error() {
            return Err(ProxyError::ChangeNotAuthorized);
        }

        if let Some(previous) = self.engine.take() {
            engine.adopt_state(previous.into_state());
        }
        engine.align_with_shell(self.shell.admin());

        tracing::debug!(engine = %engine.address(), "engine adopted");
        self.engine = Some(engine);
        Ok(())
    }
}
