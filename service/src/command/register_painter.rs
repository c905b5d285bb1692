//! [`Command`] for registering a new [`Painter`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime, Money,
};
use tracerr::Traced;

use crate::{
    domain::{painter, user, Painter},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for registering the user as a new [`Painter`].
///
/// Registration is idempotent: repeated execution for the same user returns
/// the already registered [`Painter`] untouched.
#[derive(Clone, Debug)]
pub struct RegisterPainter {
    /// ID of the user to register as a [`Painter`].
    pub user_id: user::Id,

    /// [`painter::Name`] of the new [`Painter`] displayed to customers.
    pub name: painter::Name,

    /// Professional [`painter::Experience`] of the new [`Painter`], if
    /// described.
    pub experience: Option<painter::Experience>,

    /// [`painter::Specialty`]s the new [`Painter`] advertises.
    pub specialties: Vec<painter::Specialty>,

    /// Hourly rate the new [`Painter`] charges, if declared.
    pub hourly_rate: Option<Money>,
}

impl<Db> Command<RegisterPainter> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Painter>, painter::Id>>,
            Ok = Option<Painter>,
            Err = Traced<database::Error>,
        > + Database<Insert<Painter>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
        Lock<By<Painter, painter::Id>>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Painter;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RegisterPainter,
    ) -> Result<Self::Ok, Self::Err> {
        let RegisterPainter {
            user_id,
            name,
            experience,
            specialties,
            hourly_rate,
        } = cmd;

        let id = painter::Id::derived_from(user_id);
        let painter = Painter {
            id,
            user_id,
            name,
            rating: painter::Rating::NONE,
            total_ratings: 0,
            experience,
            specialties,
            hourly_rate,
            is_active: true,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::wrap!())?;

        // Avoid concurrent registration of the same `Painter`.
        tx.execute(Lock(By::new(id)))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        let registered = tx
            .execute(Select(By::new(id)))
            .await
            .map_err(tracerr::wrap!())?;
        if let Some(painter) = registered {
            // The user is registered as a `Painter` already.
            return Ok(painter);
        }

        tx.execute(Insert(painter.clone()))
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        Ok(painter)
    }
}

/// Error of [`RegisterPainter`] [`Command`] execution.
pub type ExecutionError = database::Error;
