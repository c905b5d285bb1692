//! [`CleanExpiredSlots`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::{
    operations::{By, Delete, Perform, Start},
    DateTime,
};
use smart_default::SmartDefault;
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::Slot,
    infra::{database, Database},
    read, Service,
};

use super::Task;

/// Configuration for [`CleanExpiredSlots`] [`Task`].
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Interval between elapsed [`Slot`]s sweeps.
    #[default(time::Duration::from_secs(60 * 60))]
    pub interval: time::Duration,

    /// Period an elapsed [`Slot`] is kept for before being swept.
    #[default(time::Duration::from_secs(60 * 60 * 24))]
    pub retention: time::Duration,
}

/// [`Task`] sweeping out elapsed unbooked [`Slot`]s.
#[derive(Clone, Copy, Debug)]
pub struct CleanExpiredSlots<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db> Task<Start<By<CleanExpiredSlots<Self>, Config>>> for Service<Db>
where
    CleanExpiredSlots<Service<Db>>:
        Task<Perform<()>, Ok = u64, Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<CleanExpiredSlots<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = CleanExpiredSlots {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            match task.execute(Perform(())).await {
                Ok(0) => {}
                Ok(swept) => {
                    log::info!(
                        "`task::CleanExpiredSlots` swept {swept} `Slot`(s)",
                    );
                }
                Err(e) => {
                    log::error!("`task::CleanExpiredSlots` failed: {e}");
                }
            }
        }
    }
}

impl<Db> Task<Perform<()>> for CleanExpiredSlots<Service<Db>>
where
    Db: Database<
        Delete<By<Slot, read::slot::ExpiredBy>>,
        Ok = u64,
        Err = Traced<database::Error>,
    >,
{
    type Ok = u64;
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let deadline = DateTime::now() - self.config.retention;
        self.service
            .database()
            .execute(Delete(By::new(read::slot::ExpiredBy(deadline))))
            .await
            .map_err(tracerr::map_from_and_wrap!())
    }
}

/// Error of [`CleanExpiredSlots`] execution.
pub type ExecutionError = Traced<database::Error>;
