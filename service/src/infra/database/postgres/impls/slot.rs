//! [`Slot`]-related [`Database`] implementations.

use common::{
    operations::{By, Delete, Insert, Select, Update},
    Money,
};
use tracerr::Traced;

use crate::{
    domain::{slot, Painter, Slot},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C> Database<Select<By<Option<Slot>, slot::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Slot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Slot>, slot::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: slot::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, painter_id, start_at, end_at, is_booked, created_at \
            FROM slots \
            WHERE id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Slot {
                id: row.get("id"),
                painter_id: row.get("painter_id"),
                window: slot::Window::new(
                    row.get("start_at"),
                    row.get("end_at"),
                )
                .expect("`start_at` < `end_at`"),
                is_booked: row.get("is_booked"),
                created_at: row.get("created_at"),
            }))
    }
}

impl<C> Database<Select<By<Option<Slot>, read::slot::Overlapping>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Slot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Slot>, read::slot::Overlapping>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::slot::Overlapping { painter_id, window } = by.into_inner();
        let start = window.start();
        let end = window.end();

        const SQL: &str = "\
            SELECT id, painter_id, start_at, end_at, is_booked, created_at \
            FROM slots \
            WHERE painter_id = $1::UUID \
              AND start_at < $2::TIMESTAMPTZ \
              AND end_at > $3::TIMESTAMPTZ \
            ORDER BY start_at ASC, id ASC \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&painter_id, &end, &start])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Slot {
                id: row.get("id"),
                painter_id: row.get("painter_id"),
                window: slot::Window::new(
                    row.get("start_at"),
                    row.get("end_at"),
                )
                .expect("`start_at` < `end_at`"),
                is_booked: row.get("is_booked"),
                created_at: row.get("created_at"),
            }))
    }
}

impl<C> Database<Select<By<Vec<Slot>, read::slot::UpcomingOf>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Slot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Slot>, read::slot::UpcomingOf>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::slot::UpcomingOf(painter_id) = by.into_inner();

        const SQL: &str = "\
            SELECT id, painter_id, start_at, end_at, is_booked, created_at \
            FROM slots \
            WHERE painter_id = $1::UUID \
              AND start_at >= NOW() \
            ORDER BY start_at ASC, id ASC";
        Ok(self
            .query(SQL, &[&painter_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| Slot {
                id: row.get("id"),
                painter_id: row.get("painter_id"),
                window: slot::Window::new(
                    row.get("start_at"),
                    row.get("end_at"),
                )
                .expect("`start_at` < `end_at`"),
                is_booked: row.get("is_booked"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}

impl<C> Database<Select<By<Vec<read::slot::Candidate>, read::slot::Containing>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::slot::Candidate>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<read::slot::Candidate>, read::slot::Containing>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::slot::Containing(period) = by.into_inner();
        let start = period.start();
        let end = period.end();

        const SQL: &str = "\
            SELECT s.id, s.painter_id, s.start_at, s.end_at, s.is_booked, \
                   s.created_at, \
                   p.user_id, p.name, \
                   p.rating, p.total_ratings, \
                   p.experience, p.specialties, \
                   p.hourly_rate, p.hourly_rate_currency, \
                   p.is_active, \
                   p.created_at AS painter_created_at \
            FROM slots AS s \
            JOIN painters AS p ON p.id = s.painter_id \
            WHERE NOT s.is_booked \
              AND s.start_at <= $1::TIMESTAMPTZ \
              AND s.end_at >= $2::TIMESTAMPTZ \
            ORDER BY s.start_at ASC, s.id ASC";
        Ok(self
            .query(SQL, &[&start, &end])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let painter_id = row.get("painter_id");
                let slot = Slot {
                    id: row.get("id"),
                    painter_id,
                    window: slot::Window::new(
                        row.get("start_at"),
                        row.get("end_at"),
                    )
                    .expect("`start_at` < `end_at`"),
                    is_booked: row.get("is_booked"),
                    created_at: row.get("created_at"),
                };
                let painter = Painter {
                    id: painter_id,
                    user_id: row.get("user_id"),
                    name: row.get("name"),
                    rating: row.get("rating"),
                    total_ratings: u32::try_from(
                        row.get::<_, i64>("total_ratings"),
                    )
                    .expect("`total_ratings` overflow"),
                    experience: row.get("experience"),
                    specialties: row.get("specialties"),
                    hourly_rate: row.get::<_, Option<_>>("hourly_rate").map(
                        |amount| Money {
                            amount,
                            currency: row.get("hourly_rate_currency"),
                        },
                    ),
                    is_active: row.get("is_active"),
                    created_at: row.get("painter_created_at"),
                };
                read::slot::Candidate { painter, slot }
            })
            .collect())
    }
}

impl<C>
    Database<Select<By<Vec<read::slot::Candidate>, read::slot::StartingWithin>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::slot::Candidate>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<read::slot::Candidate>, read::slot::StartingWithin>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::slot::StartingWithin { from, until } = by.into_inner();

        const SQL: &str = "\
            SELECT s.id, s.painter_id, s.start_at, s.end_at, s.is_booked, \
                   s.created_at, \
                   p.user_id, p.name, \
                   p.rating, p.total_ratings, \
                   p.experience, p.specialties, \
                   p.hourly_rate, p.hourly_rate_currency, \
                   p.is_active, \
                   p.created_at AS painter_created_at \
            FROM slots AS s \
            JOIN painters AS p ON p.id = s.painter_id \
            WHERE NOT s.is_booked \
              AND s.start_at >= $1::TIMESTAMPTZ \
              AND s.start_at <= $2::TIMESTAMPTZ \
            ORDER BY s.start_at ASC, s.id ASC";
        Ok(self
            .query(SQL, &[&from, &until])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let painter_id = row.get("painter_id");
                let slot = Slot {
                    id: row.get("id"),
                    painter_id,
                    window: slot::Window::new(
                        row.get("start_at"),
                        row.get("end_at"),
                    )
                    .expect("`start_at` < `end_at`"),
                    is_booked: row.get("is_booked"),
                    created_at: row.get("created_at"),
                };
                let painter = Painter {
                    id: painter_id,
                    user_id: row.get("user_id"),
                    name: row.get("name"),
                    rating: row.get("rating"),
                    total_ratings: u32::try_from(
                        row.get::<_, i64>("total_ratings"),
                    )
                    .expect("`total_ratings` overflow"),
                    experience: row.get("experience"),
                    specialties: row.get("specialties"),
                    hourly_rate: row.get::<_, Option<_>>("hourly_rate").map(
                        |amount| Money {
                            amount,
                            currency: row.get("hourly_rate_currency"),
                        },
                    ),
                    is_active: row.get("is_active"),
                    created_at: row.get("painter_created_at"),
                };
                read::slot::Candidate { painter, slot }
            })
            .collect())
    }
}

impl<C> Database<Insert<Slot>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(slot): Insert<Slot>,
    ) -> Result<Self::Ok, Self::Err> {
        let Slot {
            id,
            painter_id,
            window,
            is_booked,
            created_at,
        } = slot;

        let start_at = window.start();
        let end_at = window.end();

        const SQL: &str = "\
            INSERT INTO slots (\
                id, painter_id, \
                start_at, end_at, \
                is_booked, \
                created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, \
                $3::TIMESTAMPTZ, $4::TIMESTAMPTZ, \
                $5::BOOLEAN, \
                $6::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET painter_id = EXCLUDED.painter_id, \
                start_at = EXCLUDED.start_at, \
                end_at = EXCLUDED.end_at, \
                is_booked = EXCLUDED.is_booked, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[&id, &painter_id, &start_at, &end_at, &is_booked, &created_at],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<By<Option<Slot>, slot::Book>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Slot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(by): Update<By<Option<Slot>, slot::Book>>,
    ) -> Result<Self::Ok, Self::Err> {
        let slot::Book(id) = by.into_inner();

        const SQL: &str = "\
            UPDATE slots \
            SET is_booked = TRUE \
            WHERE id = $1::UUID \
              AND NOT is_booked \
            RETURNING id, painter_id, start_at, end_at, is_booked, \
                      created_at";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Slot {
                id: row.get("id"),
                painter_id: row.get("painter_id"),
                window: slot::Window::new(
                    row.get("start_at"),
                    row.get("end_at"),
                )
                .expect("`start_at` < `end_at`"),
                is_booked: row.get("is_booked"),
                created_at: row.get("created_at"),
            }))
    }
}

impl<C> Database<Update<By<Option<Slot>, slot::Free>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Slot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(by): Update<By<Option<Slot>, slot::Free>>,
    ) -> Result<Self::Ok, Self::Err> {
        let slot::Free(id) = by.into_inner();

        const SQL: &str = "\
            UPDATE slots \
            SET is_booked = FALSE \
            WHERE id = $1::UUID \
              AND is_booked \
            RETURNING id, painter_id, start_at, end_at, is_booked, \
                      created_at";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Slot {
                id: row.get("id"),
                painter_id: row.get("painter_id"),
                window: slot::Window::new(
                    row.get("start_at"),
                    row.get("end_at"),
                )
                .expect("`start_at` < `end_at`"),
                is_booked: row.get("is_booked"),
                created_at: row.get("created_at"),
            }))
    }
}

impl<C> Database<Delete<By<Option<Slot>, slot::Owned>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Slot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Option<Slot>, slot::Owned>>,
    ) -> Result<Self::Ok, Self::Err> {
        let slot::Owned { id, painter_id } = by.into_inner();

        const SQL: &str = "\
            DELETE FROM slots \
            WHERE id = $1::UUID \
              AND painter_id = $2::UUID \
              AND NOT is_booked \
            RETURNING id, painter_id, start_at, end_at, is_booked, \
                      created_at";
        Ok(self
            .query_opt(SQL, &[&id, &painter_id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Slot {
                id: row.get("id"),
                painter_id: row.get("painter_id"),
                window: slot::Window::new(
                    row.get("start_at"),
                    row.get("end_at"),
                )
                .expect("`start_at` < `end_at`"),
                is_booked: row.get("is_booked"),
                created_at: row.get("created_at"),
            }))
    }
}

impl<C> Database<Delete<By<Slot, read::slot::ExpiredBy>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Slot, read::slot::ExpiredBy>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::slot::ExpiredBy(deadline) = by.into_inner();

        const SQL: &str = "\
            DELETE FROM slots \
            WHERE NOT is_booked \
              AND end_at <= $1::TIMESTAMPTZ";
        self.exec(SQL, &[&deadline]).await.map_err(tracerr::wrap!())
    }
}
