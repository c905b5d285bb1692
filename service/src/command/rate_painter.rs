//! [`Command`] for grading a [`Painter`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{painter, Painter},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for grading the [`Painter`] with a new [`painter::Grade`].
///
/// The [`Painter`]'s rating is a running average over all the received
/// [`painter::Grade`]s.
#[derive(Clone, Copy, Debug)]
pub struct RatePainter {
    /// ID of the [`Painter`] to grade.
    pub id: painter::Id,

    /// [`painter::Grade`] given by a customer.
    pub grade: painter::Grade,
}

impl<Db> Command<RatePainter> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Painter>, painter::Id>>,
            Ok = Option<Painter>,
            Err = Traced<database::Error>,
        > + Database<Update<Painter>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
        Lock<By<Painter, painter::Id>>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Painter;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: RatePainter) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RatePainter { id, grade } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent grading of the same `Painter`.
        tx.execute(Lock(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut painter = tx
            .execute(Select(By::<Option<Painter>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PainterNotExists(id))
            .map_err(tracerr::wrap!())?;

        painter.rate(grade);
        tx.execute(Update(painter.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(painter)
    }
}

/// Error of [`RatePainter`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Painter`] with the provided ID does not exist.
    #[display("`Painter(id: {_0})` does not exist")]
    PainterNotExists(#[error(not(source))] painter::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        command::RegisterPainter,
        domain::{painter, user, Painter},
        infra::database::InMemory,
        Config, Service,
    };

    use super::{Command, ExecutionError as E, RatePainter};

    fn service() -> Service<InMemory> {
        Service {
            config: Config::default(),
            database: InMemory::default(),
        }
    }

    async fn painter(svc: &Service<InMemory>) -> Painter {
        svc.execute(RegisterPainter {
            user_id: user::Id::new(),
            name: "Greta".parse().unwrap(),
            experience: None,
            specialties: vec![],
            hourly_rate: None,
        })
        .await
        .unwrap()
    }

    fn grade(grade: u8) -> painter::Grade {
        painter::Grade::new(grade).unwrap()
    }

    #[tokio::test]
    async fn averages_received_grades() {
        let svc = service();
        let painter = painter(&svc).await;

        let graded = svc
            .execute(RatePainter {
                id: painter.id,
                grade: grade(5),
            })
            .await
            .unwrap();
        assert_eq!(graded.rating, painter::Rating::MAX);
        assert_eq!(graded.total_ratings, 1);

        let graded = svc
            .execute(RatePainter {
                id: painter.id,
                grade: grade(3),
            })
            .await
            .unwrap();
        assert_eq!(graded.rating, painter::Rating::new(4.0).unwrap());
        assert_eq!(graded.total_ratings, 2);
    }

    #[tokio::test]
    async fn rejects_unknown_painter() {
        let svc = service();

        let err = svc
            .execute(RatePainter {
                id: painter::Id::new(),
                grade: grade(4),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), E::PainterNotExists(_)));
    }
}
