//! [`Painter`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use tracerr::Traced;

use crate::{
    domain::{painter, user, Painter},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C> Database<Select<By<Option<Painter>, painter::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Painter>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Painter>, painter::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: painter::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, user_id, name, \
                   rating, total_ratings, \
                   experience, specialties, \
                   hourly_rate, hourly_rate_currency, \
                   is_active, \
                   created_at \
            FROM painters \
            WHERE id = $1::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Painter {
                id: row.get("id"),
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
                created_at: row.get("created_at"),
            }))
    }
}

impl<C> Database<Select<By<Option<Painter>, user::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<Painter>, painter::Id>>,
        Ok = Option<Painter>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Painter>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Painter>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let user_id: user::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM painters \
            WHERE user_id = $1::UUID \
            LIMIT 1";
        let Some(row) = self
            .query_opt(SQL, &[&user_id])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        self.execute(Select(By::new(row.get("id"))))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Painter>, read::painter::Active>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Painter>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<Vec<Painter>, read::painter::Active>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT id, user_id, name, \
                   rating, total_ratings, \
                   experience, specialties, \
                   hourly_rate, hourly_rate_currency, \
                   is_active, \
                   created_at \
            FROM painters \
            WHERE is_active \
            ORDER BY created_at ASC, id ASC";
        Ok(self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| Painter {
                id: row.get("id"),
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
                created_at: row.get("created_at"),
            })
            .collect())
    }
}

impl<C> Database<Insert<Painter>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Painter>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(painter): Insert<Painter>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(painter))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Painter>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(painter): Update<Painter>,
    ) -> Result<Self::Ok, Self::Err> {
        let Painter {
            id,
            user_id,
            name,
            rating,
            total_ratings,
            experience,
            specialties,
            hourly_rate,
            is_active,
            created_at,
        } = painter;

        let total_ratings = i64::from(total_ratings);
        let hourly_rate_amount = hourly_rate.map(|rate| rate.amount);
        let hourly_rate_currency = hourly_rate.map(|rate| rate.currency);

        const SQL: &str = "\
            INSERT INTO painters (\
                id, user_id, name, \
                rating, total_ratings, \
                experience, specialties, \
                hourly_rate, hourly_rate_currency, \
                is_active, \
                created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::VARCHAR, \
                $4::FLOAT8, $5::INT8, \
                $6::VARCHAR, $7::VARCHAR[], \
                $8::NUMERIC, $9::INT2, \
                $10::BOOLEAN, \
                $11::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET user_id = EXCLUDED.user_id, \
                name = EXCLUDED.name, \
                rating = EXCLUDED.rating, \
                total_ratings = EXCLUDED.total_ratings, \
                experience = EXCLUDED.experience, \
                specialties = EXCLUDED.specialties, \
                hourly_rate = EXCLUDED.hourly_rate, \
                hourly_rate_currency = EXCLUDED.hourly_rate_currency, \
                is_active = EXCLUDED.is_active, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &user_id,
                &name,
                &rating,
                &total_ratings,
                &experience,
                &specialties,
                &hourly_rate_amount,
                &hourly_rate_currency,
                &is_active,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Painter, painter::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Painter, painter::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: painter::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO painters_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
