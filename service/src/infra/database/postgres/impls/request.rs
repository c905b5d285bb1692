//! [`Request`]-related [`Database`] implementations.

use common::operations::{Insert, Update};
use tracerr::Traced;

use crate::{
    domain::Request,
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Insert<Request>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Request>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(request): Insert<Request>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(request))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Request>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(request): Update<Request>,
    ) -> Result<Self::Ok, Self::Err> {
        let Request {
            id,
            user_id,
            window,
            address,
            description,
            estimated_hours,
            status,
            created_at,
        } = request;

        let start_at = window.start();
        let end_at = window.end();

        const SQL: &str = "\
            INSERT INTO requests (\
                id, user_id, \
                start_at, end_at, \
                address, description, \
                estimated_hours, \
                status, \
                created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, \
                $3::TIMESTAMPTZ, $4::TIMESTAMPTZ, \
                $5::VARCHAR, $6::VARCHAR, \
                $7::INT2, \
                $8::INT2, \
                $9::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET user_id = EXCLUDED.user_id, \
                start_at = EXCLUDED.start_at, \
                end_at = EXCLUDED.end_at, \
                address = EXCLUDED.address, \
                description = EXCLUDED.description, \
                estimated_hours = EXCLUDED.estimated_hours, \
                status = EXCLUDED.status, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &user_id,
                &start_at,
                &end_at,
                &address,
                &description,
                &estimated_hours,
                &status,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
