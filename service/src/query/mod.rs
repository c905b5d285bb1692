//! [`Query`] definition.

pub mod bookings;
pub mod painter;
pub mod painters;
pub mod slot;
pub mod slots;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    infra::{database, Database},
    Service,
};

/// [`Query`] of the [`Service`].
pub use common::Handler as Query;

/// [`Query`] [`Select`]ing a `T`ype from a [`Database`].
#[derive(Clone, Copy, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct DatabaseQuery<T>(T);

impl<W, B> DatabaseQuery<By<W, B>> {
    /// Creates a new [`DatabaseQuery`] selecting a `W` by the provided `B`.
    #[must_use]
    pub fn by(by: B) -> Self {
        Self(By::new(by))
    }
}

impl<Db, W, B> Query<DatabaseQuery<By<W, B>>> for Service<Db>
where
    Db: Database<Select<By<W, B>>, Ok = W, Err = Traced<database::Error>>,
{
    type Ok = W;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        DatabaseQuery(by): DatabaseQuery<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.database()
            .execute(Select(by))
            .await
            .map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{
        operations::{Insert, Update},
        DateTime, Period,
    };

    use crate::{
        command::{DeclareSlot, RegisterPainter, ReserveSlot},
        domain::{
            booking, painter, request, slot, user, Booking, Painter, Request,
            Slot,
        },
        infra::database::InMemory,
        query, read, Config, Service,
    };

    use super::Query;

    const HOUR: Duration = Duration::from_secs(60 * 60);

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

    async fn declare(
        svc: &Service<InMemory>,
        painter_id: painter::Id,
        start: DateTime,
        end: DateTime,
    ) -> Slot {
        svc.execute(DeclareSlot {
            painter_id,
            start,
            end,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn upcoming_is_sorted_and_future_only() {
        let svc = service();
        let now = DateTime::now();
        let painter = painter(&svc, "Una").await;

        let late = declare(&svc, painter.id, now + 5 * HOUR, now + 6 * HOUR)
            .await;
        let early = declare(&svc, painter.id, now + HOUR, now + 2 * HOUR)
            .await;
        let mid = declare(&svc, painter.id, now + 3 * HOUR, now + 4 * HOUR)
            .await;
        // An already started `Slot` cannot be declared, so is seeded as is.
        let started = Slot {
            id: slot::Id::new(),
            painter_id: painter.id,
            window: Period::new(now - 2 * HOUR, now - HOUR)
                .unwrap()
                .coerce(),
            is_booked: false,
            created_at: now.coerce(),
        };
        svc.database().execute(Insert(started)).await.unwrap();

        let ids: Vec<_> = svc
            .execute(query::slots::Upcoming::by(read::slot::UpcomingOf(
                painter.id,
            )))
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, [early.id, mid.id, late.id]);

        // Absent intervening mutation, reads repeat themselves.
        let again: Vec<_> = svc
            .execute(query::slots::Upcoming::by(read::slot::UpcomingOf(
                painter.id,
            )))
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(again, ids);
    }

    #[tokio::test]
    async fn available_requires_containment_and_freedom() {
        let svc = service();
        let now = DateTime::now();

        let ann = painter(&svc, "Ann").await;
        let ben = painter(&svc, "Ben").await;
        let covering = declare(&svc, ann.id, now + HOUR, now + 6 * HOUR).await;
        // Ends an hour too early to contain the requested period.
        _ = declare(&svc, ben.id, now + HOUR, now + 4 * HOUR).await;

        let window = Period::new(now + 2 * HOUR, now + 5 * HOUR).unwrap();
        let found = svc
            .execute(query::slots::Available::by(read::slot::Containing(
                window,
            )))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].slot.id, covering.id);
        assert_eq!(found[0].painter.id, ann.id);

        // A reserved `Slot` is not available anymore.
        _ = svc.execute(ReserveSlot { id: covering.id }).await.unwrap();
        let found = svc
            .execute(query::slots::Available::by(read::slot::Containing(
                window,
            )))
            .await
            .unwrap();
        assert!(found.is_empty(), "{found:?}");
    }

    #[tokio::test]
    async fn bookings_join_newest_first() {
        let svc = service();
        let now = DateTime::now();
        let user_id = user::Id::new();
        let painter = painter(&svc, "Vera").await;

        let window = request::Window::new(
            (now + HOUR).coerce(),
            (now + 3 * HOUR).coerce(),
        )
        .unwrap();
        let older = Request {
            id: request::Id::new(),
            user_id,
            window,
            address: "3 Birch Lane".parse().unwrap(),
            description: None,
            estimated_hours: None,
            status: request::Status::Confirmed,
            created_at: (now - HOUR).coerce(),
        };
        let newer = Request {
            id: request::Id::new(),
            user_id,
            window,
            address: "3 Birch Lane".parse().unwrap(),
            description: None,
            estimated_hours: None,
            status: request::Status::Pending,
            created_at: now.coerce(),
        };
        let booking = Booking {
            id: booking::Id::new(),
            request_id: older.id,
            painter_id: painter.id,
            window: window.coerce(),
            status: request::Status::Confirmed,
            created_at: now.coerce(),
        };
        svc.database().execute(Insert(older.clone())).await.unwrap();
        svc.database().execute(Insert(newer.clone())).await.unwrap();
        svc.database().execute(Insert(booking)).await.unwrap();

        let views = svc
            .execute(query::bookings::OfUser::by(user_id))
            .await
            .unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].request.id, newer.id);
        assert!(views[0].assignment.is_none());
        let assigned = views[1].assignment.as_ref().unwrap();
        assert_eq!(assigned.booking.id, booking.id);
        assert_eq!(assigned.painter.id, painter.id);

        let appointments = svc
            .execute(query::bookings::OfPainter::by(painter.id))
            .await
            .unwrap();
        assert_eq!(appointments.len(), 1);
        assert_eq!(appointments[0].booking.id, booking.id);
        assert_eq!(appointments[0].request.id, older.id);
    }

    #[tokio::test]
    async fn looks_painters_up() {
        let svc = service();

        let active = painter(&svc, "Ada").await;
        let mut retired = painter(&svc, "Rex").await;
        retired.is_active = false;
        svc.database()
            .execute(Update(retired.clone()))
            .await
            .unwrap();

        let found = svc
            .execute(query::painter::ById::by(active.id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.user_id, active.user_id);

        let found = svc
            .execute(query::painter::OfUser::by(active.user_id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, active.id);

        let ids: Vec<_> = svc
            .execute(query::painters::Active::by(read::painter::Active))
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, [active.id]);
    }
}
