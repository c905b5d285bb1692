//! [`Command`] for reserving an availability [`Slot`].

use common::operations::{By, Select, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{slot, Slot},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for reserving the specified [`Slot`] directly.
///
/// Reservation is a single compare-and-set: it succeeds for a free [`Slot`]
/// only, no matter how many reservations race for it.
#[derive(Clone, Copy, Debug)]
pub struct ReserveSlot {
    /// ID of the [`Slot`] to reserve.
    pub id: slot::Id,
}

impl<Db> Command<ReserveSlot> for Service<Db>
where
    Db: Database<
            Update<By<Option<Slot>, slot::Book>>,
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

    async fn execute(&self, cmd: ReserveSlot) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ReserveSlot { id } = cmd;

        let booked = self
            .database()
            .execute(Update(By::<Option<Slot>, _>::new(slot::Book(id))))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(slot) = booked {
            return Ok(slot);
        }

        // The reservation misses either because the `Slot` doesn't exist or
        // is booked already.
        let slot = self
            .database()
            .execute(Select(By::<Option<Slot>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::SlotNotExists(id))
            .map_err(tracerr::wrap!())?;
        Err(tracerr::new!(E::SlotAlreadyBooked(slot.id)))
    }
}

/// Error of [`ReserveSlot`] [`Command`] execution.
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
        command::{DeclareSlot, RegisterPainter},
        domain::{slot, user, Slot},
        infra::database::InMemory,
        Config, Service,
    };

    use super::{Command, ExecutionError as E, ReserveSlot};

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
                name: "Ron".parse().unwrap(),
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
    async fn reserves_free_slot_once() {
        let svc = service();
        let slot = slot(&svc).await;

        let reserved = svc.execute(ReserveSlot { id: slot.id }).await.unwrap();
        assert!(reserved.is_booked);

        let err = svc.execute(ReserveSlot { id: slot.id }).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            E::SlotAlreadyBooked(id) if *id == slot.id
        ));
    }

    #[tokio::test]
    async fn rejects_unknown_slot() {
        let svc = service();

        let err = svc
            .execute(ReserveSlot {
                id: slot::Id::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), E::SlotNotExists(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn wins_single_concurrent_reservation() {
        let svc = service();
        let slot = slot(&svc).await;

        let attempts: Vec<_> = (0..8)
            .map(|_| {
                tokio::spawn({
                    let svc = svc.clone();
                    async move {
                        svc.execute(ReserveSlot { id: slot.id }).await
                    }
                })
            })
            .collect();
        let mut reserved = 0;
        for attempt in attempts {
            if attempt.await.unwrap().is_ok() {
                reserved += 1;
            }
        }

        assert_eq!(reserved, 1);
    }
}
