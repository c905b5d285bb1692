//! [`Command`] for deleting an availability [`Slot`].

use common::operations::{By, Delete, Select};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{painter, slot, Slot},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Painter`]'s own availability [`Slot`].
///
/// A reserved [`Slot`] cannot be deleted until released.
///
/// [`Painter`]: crate::domain::Painter
#[derive(Clone, Copy, Debug)]
pub struct DeleteSlot {
    /// ID of the [`Slot`] to delete.
    pub id: slot::Id,

    /// ID of the [`Painter`] owning the [`Slot`].
    ///
    /// [`Painter`]: crate::domain::Painter
    pub painter_id: painter::Id,
}

impl<Db> Command<DeleteSlot> for Service<Db>
where
    Db: Database<
            Delete<By<Option<Slot>, slot::Owned>>,
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

    async fn execute(&self, cmd: DeleteSlot) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteSlot { id, painter_id } = cmd;

        let deleted = self
            .database()
            .execute(Delete(By::<Option<Slot>, _>::new(slot::Owned {
                id,
                painter_id,
            })))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(slot) = deleted {
            return Ok(slot);
        }

        // A `Slot` of another `Painter` is not revealed.
        let slot = self
            .database()
            .execute(Select(By::<Option<Slot>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|s| s.painter_id == painter_id)
            .ok_or(E::SlotNotExists(id))
            .map_err(tracerr::wrap!())?;
        Err(tracerr::new!(E::SlotAlreadyBooked(slot.id)))
    }
}

/// Error of [`DeleteSlot`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Slot`] is booked already.
    #[display("`Slot(id: {_0})` is booked already")]
    SlotAlreadyBooked(#[error(not(source))] slot::Id),

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
        domain::{slot, user, Painter, Slot},
        infra::database::InMemory,
        Config, Service,
    };

    use super::{Command, DeleteSlot, ExecutionError as E};

    fn service() -> Service<InMemory> {
        Service {
            config: Config::default(),
            database: InMemory::default(),
        }
    }

    async fn painter(svc: &Service<InMemory>, name: &str) -> Painter {
        svc.execute(RegisterPainter {
            user_id: user::Id::new(),
            name: name.parse().unwrap(),
            experience: None,
            specialties: vec![],
            hourly_rate: None,
        })
        .await
        .unwrap()
    }

    async fn slot(svc: &Service<InMemory>, painter: &Painter) -> Slot {
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
    async fn deletes_free_slot() {
        let svc = service();
        let painter = painter(&svc, "Dan").await;
        let slot = slot(&svc, &painter).await;

        let deleted = svc
            .execute(DeleteSlot {
                id: slot.id,
                painter_id: painter.id,
            })
            .await
            .unwrap();
        assert_eq!(deleted.id, slot.id);

        let err = svc
            .execute(DeleteSlot {
                id: slot.id,
                painter_id: painter.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), E::SlotNotExists(_)));
    }

    #[tokio::test]
    async fn refuses_booked_slot() {
        let svc = service();
        let painter = painter(&svc, "Dina").await;
        let slot = slot(&svc, &painter).await;
        _ = svc.execute(ReserveSlot { id: slot.id }).await.unwrap();

        let err = svc
            .execute(DeleteSlot {
                id: slot.id,
                painter_id: painter.id,
            })
            .await
            .unwrap_err();

        assert!(
            matches!(err.as_ref(), E::SlotAlreadyBooked(id) if *id == slot.id),
        );
    }

    #[tokio::test]
    async fn hides_foreign_slot() {
        let svc = service();
        let owner = painter(&svc, "Olga").await;
        let other = painter(&svc, "Oskar").await;
        let slot = slot(&svc, &owner).await;

        let err = svc
            .execute(DeleteSlot {
                id: slot.id,
                painter_id: other.id,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), E::SlotNotExists(_)));
    }

    #[tokio::test]
    async fn rejects_unknown_slot() {
        let svc = service();
        let painter = painter(&svc, "Dora").await;

        let err = svc
            .execute(DeleteSlot {
                id: slot::Id::new(),
                painter_id: painter.id,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), E::SlotNotExists(_)));
    }
}
