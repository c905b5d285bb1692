//! [`Command`] for releasing a reserved [`Slot`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{slot, Slot},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for releasing the specified [`Slot`], making it available for
/// reservation again.
#[derive(Clone, Copy, Debug)]
pub struct ReleaseSlot {
    /// ID of the [`Slot`] to release.
    pub id: slot::Id,
}

impl<Db> Command<ReleaseSlot> for Service<Db>
where
    Db: Database<
            Update<By<Option<Slot>, slot::Free>>,
            Ok = Option<Slot>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Slot>, slot::Id>>,
            Ok = Option<Slot>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Slot;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: ReleaseSlot) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ReleaseSlot { id } = cmd;

        let freed = self
            .database()
            .execute(Update(By::<Option<Slot>, _>::new(slot::Free(id))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(slot) = freed {
            return Ok(slot);
        }

        // Releasing a free `Slot` is a no-op, only a missing one is an error.
        self.database()
            .execute(Select(By::<Option<Slot>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SlotNotExists(id))
            .map_err(tracerr::wrap!())
    }
}

/// Error of [`ReleaseSlot`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Slot`] with the provided ID does not exist.
    #[display("`Slot(id: {_0})` does not exist")]
    SlotNotExists(#[error(not(source))] slot::Id),
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;

    use crate::{
        command::{DeclareSlot, RegisterPainter, ReserveSlot},
        domain::{slot, user, Slot},
        infra::database::InMemory,
        Config, Service,
    };

    use super::{Command, ExecutionError as E, ReleaseSlot};

    fn service() -> Service<InMemory> {
        Service {
            config: Config::default(),
            database: InMemory::default(),
        }
    }

    async fn slot(svc: &Service<InMemory>) -> Slot {
        let painter = svc
            .execute(RegisterPainter {
                user_id: user::Id::new(),
                name: "Rita".parse().unwrap(),
                experience: None,
                specialties: vec![],
                hourly_rate: None,
            })
            .await
            .unwrap();

        let hour = Duration::from_secs(60 * 60);
        svc.execute(DeclareSlot {
            painter_id: painter.id,
            start: DateTime::now() + hour,
            end: DateTime::now() + 9 * hour,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn releases_reserved_slot() {
        let svc = service();
        let slot = slot(&svc).await;
        _ = svc.execute(ReserveSlot { id: slot.id }).await.unwrap();

        let released =
            svc.execute(ReleaseSlot { id: slot.id }).await.unwrap();
        assert!(!released.is_booked);

        // The `Slot` can be reserved again.
        let reserved = svc.execute(ReserveSlot { id: slot.id }).await.unwrap();
        assert!(reserved.is_booked);
    }

    #[tokio::test]
    async fn tolerates_free_slot() {
        let svc = service();
        let slot = slot(&svc).await;

        let released =
            svc.execute(ReleaseSlot { id: slot.id }).await.unwrap();

        assert_eq!(released.id, slot.id);
        assert!(!released.is_booked);
    }

    #[tokio::test]
    async fn rejects_unknown_slot() {
        let svc = service();

        let err = svc
            .execute(ReleaseSlot {
                id: slot::Id::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), E::SlotNotExists(_)));
    }
}
