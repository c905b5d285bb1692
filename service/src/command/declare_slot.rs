//! [`Command`] for declaring a new availability [`Slot`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{painter, slot, Painter, Slot},
    infra::{database, Database},
    read,
    Service,
};

use super::Command;

/// [`Command`] for declaring a new availability [`Slot`] of a [`Painter`].
#[derive(Clone, Copy, Debug)]
pub struct DeclareSlot {
    /// ID of the [`Painter`] declaring the [`Slot`].
    pub painter_id: painter::Id,

    /// [`DateTime`] when the declared [`Slot`] starts.
    pub start: DateTime,

    /// [`DateTime`] when the declared [`Slot`] ends.
    pub end: DateTime,
}

impl<Db> Command<DeclareSlot> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Painter>, painter::Id>>,
            Ok = Option<Painter>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Select<By<Option<Slot>, read::slot::Overlapping>>,
            Ok = Option<Slot>,
            Err = Traced<database::Error>,
        > + Database<Insert<Slot>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
        Lock<By<Painter, painter::Id>>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Slot;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeclareSlot) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeclareSlot {
            painter_id,
            start,
            end,
        } = cmd;

        let window = slot::Window::new(start.coerce(), end.coerce())
            .ok_or(E::WindowInverted)
            .map_err(tracerr::wrap!())?;
        if window.start() <= DateTime::now().coerce() {
            return Err(tracerr::new!(E::WindowInPast));
        }

        let painter = self
            .database()
            .execute(Select(By::<Option<Painter>, _>::new(painter_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PainterNotExists(painter_id))
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Painter`'s schedule.
        tx.execute(Lock(By::new(painter.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let overlapping = tx
            .execute(Select(By::<Option<Slot>, _>::new(
                read::slot::Overlapping {
                    painter_id: painter.id,
                    window: window.coerce(),
                },
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if let Some(slot) = overlapping {
            return Err(tracerr::new!(E::SlotOverlaps(slot.id)));
        }

        let slot = Slot {
            id: slot::Id::new(),
            painter_id: painter.id,
            window,
            is_booked: false,
            created_at: DateTime::now().coerce(),
        };
        tx.execute(Insert(slot))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(slot)
    }
}

/// Error of [`DeclareSlot`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Painter`] with the provided ID does not exist.
    #[display("`Painter(id: {_0})` does not exist")]
    PainterNotExists(#[error(not(source))] painter::Id),

    /// Another [`Slot`] of the [`Painter`] overlaps the provided time window.
    #[display("`Slot(id: {_0})` overlaps the provided time window")]
    SlotOverlaps(#[error(not(source))] slot::Id),

    /// Provided time window ends before it starts.
    #[display("provided time window ends before it starts")]
    WindowInverted,

    /// Provided time window starts in the past.
    #[display("provided time window starts in the past")]
    WindowInPast,
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;

    use crate::{
        command::RegisterPainter,
        domain::{painter, user, Painter},
        infra::database::InMemory,
        Config, Service,
    };

    use super::{Command, DeclareSlot, ExecutionError as E};

    fn service() -> Service<InMemory> {
        Service {
            config: Config::default(),
            database: InMemory::default(),
        }
    }

    async fn painter(svc: &Service<InMemory>) -> Painter {
        svc.execute(RegisterPainter {
            user_id: user::Id::new(),
            name: "Sam".parse().unwrap(),
            experience: None,
            specialties: vec![],
            hourly_rate: None,
        })
        .await
        .unwrap()
    }

    const HOUR: Duration = Duration::from_secs(60 * 60);

    #[tokio::test]
    async fn declares_slot() {
        let svc = service();
        let painter = painter(&svc).await;
        let now = DateTime::now();

        let slot = svc
            .execute(DeclareSlot {
                painter_id: painter.id,
                start: now + HOUR,
                end: now + 9 * HOUR,
            })
            .await
            .unwrap();

        assert_eq!(slot.painter_id, painter.id);
        assert_eq!(slot.window.duration(), 8 * HOUR);
        assert!(!slot.is_booked);
    }

    #[tokio::test]
    async fn rejects_inverted_window() {
        let svc = service();
        let painter = painter(&svc).await;
        let now = DateTime::now();

        let err = svc
            .execute(DeclareSlot {
                painter_id: painter.id,
                start: now + 2 * HOUR,
                end: now + HOUR,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), E::WindowInverted));

        let err = svc
            .execute(DeclareSlot {
                painter_id: painter.id,
                start: now + HOUR,
                end: now + HOUR,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), E::WindowInverted));
    }

    #[tokio::test]
    async fn rejects_window_in_past() {
        let svc = service();
        let painter = painter(&svc).await;
        let now = DateTime::now();

        let err = svc
            .execute(DeclareSlot {
                painter_id: painter.id,
                start: now - HOUR,
                end: now + HOUR,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), E::WindowInPast));
    }

    #[tokio::test]
    async fn rejects_overlapping_window() {
        let svc = service();
        let painter = painter(&svc).await;
        let now = DateTime::now();

        let declared = svc
            .execute(DeclareSlot {
                painter_id: painter.id,
                start: now + HOUR,
                end: now + 5 * HOUR,
            })
            .await
            .unwrap();

        let err = svc
            .execute(DeclareSlot {
                painter_id: painter.id,
                start: now + 4 * HOUR,
                end: now + 6 * HOUR,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            E::SlotOverlaps(id) if *id == declared.id
        ));

        // Windows are half-open, so touching ones don't overlap.
        _ = svc
            .execute(DeclareSlot {
                painter_id: painter.id,
                start: now + 5 * HOUR,
                end: now + 6 * HOUR,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rejects_unknown_painter() {
        let svc = service();
        let now = DateTime::now();

        let err = svc
            .execute(DeclareSlot {
                painter_id: painter::Id::new(),
                start: now + HOUR,
                end: now + 2 * HOUR,
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), E::PainterNotExists(_)));
    }
}
