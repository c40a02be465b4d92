//! Script execution.

use std::sync::Arc;

use bess_client::{BessControl, BessError, BessStatus};
use bess_port::{PortError, PortHandle};
use serde::Serialize;
use tracing::{info, instrument};

use crate::script::PortScript;

/// Statistics of one created port.
#[derive(Debug, Clone, Serialize)]
pub struct PortReport<S> {
    pub port: String,
    pub driver: String,
    pub stats: S,
}

/// Creates every port of `script`, in order.
///
/// Stops at the first failure; ports created before it stay in the engine.
#[instrument(skip_all, fields(ports = script.ports.len()))]
pub async fn create_ports<C: BessControl>(
    bess: Arc<C>,
    script: &PortScript,
) -> Result<Vec<PortHandle<C>>, PortError<C::Error>> {
    let mut handles = Vec::with_capacity(script.ports.len());
    for spec in &script.ports {
        let handle =
            PortHandle::create_by_driver(Arc::clone(&bess), &spec.driver, spec.config.clone())
                .await?;
        info!("Created port {}", handle);
        handles.push(handle);
    }
    Ok(handles)
}

/// Queries the statistics of every handle.
pub async fn collect_stats<C: BessControl>(
    handles: &[PortHandle<C>],
) -> Result<Vec<PortReport<C::Stats>>, C::Error> {
    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        reports.push(PortReport {
            port: handle.name().to_string(),
            driver: handle.driver().to_string(),
            stats: handle.get_port_stats().await?,
        });
    }
    Ok(reports)
}

/// Errno status of the engine error behind `err`, if there is one.
///
/// Looks through context layers and the by-name creation error.
pub fn engine_status(err: &anyhow::Error) -> Option<BessStatus> {
    err.chain().find_map(|cause| {
        cause
            .downcast_ref::<PortError<BessError>>()
            .and_then(PortError::remote)
            .or_else(|| cause.downcast_ref::<BessError>())
            .map(BessError::status)
    })
}
