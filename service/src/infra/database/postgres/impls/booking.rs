//! [`Booking`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{booking, painter, request, user, Booking, Request},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C> Database<Insert<Booking>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let Booking {
            id,
            request_id,
            painter_id,
            window,
            status,
            created_at,
        } = booking;

        let start_at = window.start();
        let end_at = window.end();

        const SQL: &str = "\
            INSERT INTO bookings (\
                id, request_id, painter_id, \
                start_at, end_at, \
                status, \
                created_at \
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::TIMESTAMPTZ, $5::TIMESTAMPTZ, \
                $6::INT2, \
                $7::TIMESTAMPTZ \
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET request_id = EXCLUDED.request_id, \
                painter_id = EXCLUDED.painter_id, \
                start_at = EXCLUDED.start_at, \
                end_at = EXCLUDED.end_at, \
                status = EXCLUDED.status, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &request_id,
                &painter_id,
                &start_at,
                &end_at,
                &status,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Select<By<Vec<read::booking::View>, user::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::booking::View>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::booking::View>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let user_id: user::Id = by.into_inner();

        const SQL: &str = "\
            SELECT r.id, r.user_id, r.start_at, r.end_at, r.address, \
                   r.description, r.estimated_hours, r.status, r.created_at, \
                   b.id AS booking_id, b.painter_id, \
                   b.start_at AS booked_start_at, \
                   b.end_at AS booked_end_at, \
                   b.status AS booking_status, \
                   b.created_at AS booking_created_at, \
                   p.name AS painter_name, p.rating AS painter_rating \
            FROM requests AS r \
            LEFT JOIN bookings AS b ON b.request_id = r.id \
            LEFT JOIN painters AS p ON p.id = b.painter_id \
            WHERE r.user_id = $1::UUID \
            ORDER BY r.created_at DESC, r.id ASC";
        Ok(self
            .query(SQL, &[&user_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let request = Request {
                    id: row.get("id"),
                    user_id: row.get("user_id"),
                    window: request::Window::new(
                        row.get("start_at"),
                        row.get("end_at"),
                    )
                    .expect("`start_at` < `end_at`"),
                    address: row.get("address"),
                    description: row.get("description"),
                    estimated_hours: row.get("estimated_hours"),
                    status: row.get("status"),
                    created_at: row.get("created_at"),
                };
                let assignment = row.get::<_, Option<_>>("booking_id").map(
                    |id| read::booking::Assignment {
                        booking: Booking {
                            id,
                            request_id: request.id,
                            painter_id: row.get("painter_id"),
                            window: booking::Window::new(
                                row.get("booked_start_at"),
                                row.get("booked_end_at"),
                            )
                            .expect("`start_at` < `end_at`"),
                            status: row.get("booking_status"),
                            created_at: row.get("booking_created_at"),
                        },
                        painter: read::painter::Summary {
                            id: row.get("painter_id"),
                            name: row.get("painter_name"),
                            rating: row.get("painter_rating"),
                        },
                    },
                );
                read::booking::View { request, assignment }
            })
            .collect())
    }
}

impl<C> Database<Select<By<Vec<read::booking::Appointment>, painter::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::booking::Appointment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::booking::Appointment>, painter::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let painter_id: painter::Id = by.into_inner();

        const SQL: &str = "\
            SELECT b.id, b.request_id, b.painter_id, \
                   b.start_at, b.end_at, b.status, b.created_at, \
                   r.user_id, \
                   r.start_at AS requested_start_at, \
                   r.end_at AS requested_end_at, \
                   r.address, r.description, r.estimated_hours, \
                   r.status AS request_status, \
                   r.created_at AS request_created_at \
            FROM bookings AS b \
            JOIN requests AS r ON r.id = b.request_id \
            WHERE b.painter_id = $1::UUID \
            ORDER BY b.created_at DESC, b.id ASC";
        Ok(self
            .query(SQL, &[&painter_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let request_id = row.get("request_id");
                let booking = Booking {
                    id: row.get("id"),
                    request_id,
                    painter_id: row.get("painter_id"),
                    window: booking::Window::new(
                        row.get("start_at"),
                        row.get("end_at"),
                    )
                    .expect("`start_at` < `end_at`"),
                    status: row.get("status"),
                    created_at: row.get("created_at"),
                };
                let request = Request {
                    id: request_id,
                    user_id: row.get("user_id"),
                    window: request::Window::new(
                        row.get("requested_start_at"),
                        row.get("requested_end_at"),
                    )
                    .expect("`start_at` < `end_at`"),
                    address: row.get("address"),
                    description: row.get("description"),
                    estimated_hours: row.get("estimated_hours"),
                    status: row.get("request_status"),
                    created_at: row.get("request_created_at"),
                };
                read::booking::Appointment { booking, request }
            })
            .collect())
    }
}
