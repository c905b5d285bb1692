//! [`Command`] for creating a new booking [`Request`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted, Update},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{booking, request, slot, user, Booking, Request, Slot},
    infra::{database, Database},
    read::{self, booking::Assignment, matching, slot::Candidate, Alternative},
    Service,
};

use super::Command;

/// [`Command`] for creating a new booking [`Request`].
///
/// The created [`Request`] is matched right away: the best scored [`Painter`]
/// having a free [`Slot`] covering the requested window gets booked. If
/// nobody is available, the [`Request`] is left [`request::Status::Pending`]
/// and nearby [`Alternative`]s are suggested instead.
///
/// [`Painter`]: crate::domain::Painter
#[derive(Clone, Debug)]
pub struct CreateBookingRequest {
    /// ID of the user requesting a painting job.
    pub user_id: user::Id,

    /// [`DateTime`] when the requested work should start.
    pub start: DateTime,

    /// [`DateTime`] when the requested work should end.
    pub end: DateTime,

    /// [`request::Address`] where the work takes place.
    pub address: request::Address,

    /// [`request::Description`] of the work, if the user provided one.
    pub description: Option<request::Description>,

    /// Estimated workload, if the user provided one.
    pub estimated_hours: Option<request::EstimatedHours>,
}

/// Outcome of a [`CreateBookingRequest`] [`Command`] execution.
#[derive(Clone, Debug)]
pub enum Outcome {
    /// [`Request`] was confirmed with a [`Booking`].
    Matched {
        /// Confirmed [`Request`] itself.
        request: Request,

        /// [`Assignment`] fulfilling the [`Request`].
        assignment: Assignment,
    },

    /// No [`Slot`] covers the requested window.
    Unmatched {
        /// Still pending [`Request`] itself.
        request: Request,

        /// Nearby [`Alternative`]s to offer instead, closest first.
        alternatives: Vec<Alternative>,
    },
}

impl<Db> Command<CreateBookingRequest> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<Insert<Request>, Err = Traced<database::Error>>
        + Database<
            Select<By<Vec<Candidate>, read::slot::Containing>>,
            Ok = Vec<Candidate>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Candidate>, read::slot::StartingWithin>>,
            Ok = Vec<Candidate>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Update<By<Option<Slot>, slot::Book>>,
            Ok = Option<Slot>,
            Err = Traced<database::Error>,
        > + Database<Insert<Booking>, Err = Traced<database::Error>>
        + Database<Update<Request>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Outcome;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateBookingRequest,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateBookingRequest {
            user_id,
            start,
            end,
            address,
            description,
            estimated_hours,
        } = cmd;

        let window = request::Window::new(start.coerce(), end.coerce())
            .ok_or(E::WindowInverted)
            .map_err(tracerr::wrap!())?;
        if window.start() <= DateTime::now().coerce() {
            return Err(tracerr::new!(E::WindowInPast));
        }

        let mut request = Request {
            id: request::Id::new(),
            user_id,
            window,
            address,
            description,
            estimated_hours,
            status: request::Status::Pending,
            created_at: DateTime::now().coerce(),
        };
        self.database()
            .execute(Insert(request.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // Another `Request` may book the chosen `Slot` concurrently, so the
        // candidates are queried once again on a lost reservation.
        for _ in 0..2 {
            let candidates = self
                .database()
                .execute(Select(By::<Vec<Candidate>, _>::new(
                    read::slot::Containing(window.coerce()),
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            let Some(best) = matching::select_best(candidates) else {
                break;
            };

            let tx = self
                .database()
                .execute(Transact)
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;

            let booked = tx
                .execute(Update(By::<Option<Slot>, _>::new(slot::Book(
                    best.slot.id,
                ))))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?;
            let Some(slot) = booked else {
                continue;
            };

            let booking = Booking {
                id: booking::Id::new(),
                request_id: request.id,
                painter_id: slot.painter_id,
                window: window.coerce(),
                status: request::Status::Confirmed,
                created_at: DateTime::now().coerce(),
            };
            tx.execute(Insert(booking))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;

            request.status = request::Status::Confirmed;
            tx.execute(Update(request.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;

            tx.execute(Commit)
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))
                .map(drop)?;

            return Ok(Outcome::Matched {
                request,
                assignment: Assignment {
                    booking,
                    painter: best.painter.into(),
                },
            });
        }

        let nearby = self
            .database()
            .execute(Select(By::<Vec<Candidate>, _>::new(
                read::slot::StartingWithin {
                    from: window.start().coerce() - matching::LOOKBEHIND,
                    until: window.start().coerce() + matching::LOOKAHEAD,
                },
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(Outcome::Unmatched {
            request,
            alternatives: matching::alternatives(nearby, window.coerce()),
        })
    }
}

/// Error of [`CreateBookingRequest`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Requested time window ends before it starts.
    #[display("requested time window ends before it starts")]
    WindowInverted,

    /// Requested time window starts in the past.
    #[display("requested time window starts in the past")]
    WindowInPast,
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;

    use crate::{
        command::{DeclareSlot, RatePainter, RegisterPainter},
        domain::{painter, request, user, Painter, Slot},
        infra::database::InMemory,
        Config, Service,
    };

    use super::{Command, CreateBookingRequest, ExecutionError as E, Outcome};

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

    async fn slot(
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

    fn request(start: DateTime, end: DateTime) -> CreateBookingRequest {
        CreateBookingRequest {
            user_id: user::Id::new(),
            start,
            end,
            address: "17 Cedar Row".parse().unwrap(),
            description: None,
            estimated_hours: None,
        }
    }

    const HOUR: Duration = Duration::from_secs(60 * 60);
    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    #[tokio::test]
    async fn books_best_scored_painter() {
        let svc = service();
        let now = DateTime::now();

        let rookie = painter(&svc, "Rookie").await;
        let veteran = painter(&svc, "Veteran").await;
        svc.execute(RatePainter {
            id: veteran.id,
            grade: painter::Grade::new(5).unwrap(),
        })
        .await
        .unwrap();

        _ = slot(&svc, rookie.id, now + HOUR, now + 9 * HOUR).await;
        _ = slot(&svc, veteran.id, now + HOUR, now + 9 * HOUR).await;

        let outcome = svc
            .execute(request(now + 2 * HOUR, now + 6 * HOUR))
            .await
            .unwrap();
        let Outcome::Matched {
            request: confirmed,
            assignment,
        } = outcome
        else {
            panic!("expected `Outcome::Matched`, got: {outcome:?}");
        };
        assert_eq!(confirmed.status, request::Status::Confirmed);
        assert_eq!(assignment.booking.painter_id, veteran.id);
        assert_eq!(assignment.booking.request_id, confirmed.id);
        assert_eq!(assignment.painter.id, veteran.id);
        assert_eq!(
            assignment.booking.window,
            confirmed.window.coerce(),
            "booking covers the requested window, not the whole `Slot`",
        );

        // The veteran's only `Slot` is booked now, so the next identical
        // request falls back to the rookie.
        let outcome = svc
            .execute(request(now + 2 * HOUR, now + 6 * HOUR))
            .await
            .unwrap();
        let Outcome::Matched { assignment, .. } = outcome else {
            panic!("expected `Outcome::Matched`, got: {outcome:?}");
        };
        assert_eq!(assignment.booking.painter_id, rookie.id);

        // And the third one finds nobody.
        let outcome = svc
            .execute(request(now + 2 * HOUR, now + 6 * HOUR))
            .await
            .unwrap();
        assert!(matches!(outcome, Outcome::Unmatched { .. }));
    }

    #[tokio::test]
    async fn suggests_alternatives_when_unmatched() {
        let svc = service();
        let now = DateTime::now();

        let painter = painter(&svc, "Paul").await;
        _ = slot(&svc, painter.id, now + DAY + 2 * HOUR, now + DAY + 10 * HOUR)
            .await;

        let outcome = svc
            .execute(request(now + 2 * HOUR, now + 6 * HOUR))
            .await
            .unwrap();

        let Outcome::Unmatched {
            request: pending,
            alternatives,
        } = outcome
        else {
            panic!("expected `Outcome::Unmatched`, got: {outcome:?}");
        };
        assert_eq!(pending.status, request::Status::Pending);
        assert_eq!(alternatives.len(), 1);
        assert_eq!(alternatives[0].painter.id, painter.id);
        assert_eq!(alternatives[0].distance_minutes, 24 * 60);
        // The proposal starts with the slot and lasts the requested 4 hours.
        assert_eq!(alternatives[0].window.start(), now + DAY + 2 * HOUR);
        assert_eq!(alternatives[0].window.duration(), 4 * HOUR);
    }

    #[tokio::test]
    async fn omits_too_short_and_booked_alternatives() {
        let svc = service();
        let now = DateTime::now();

        let painter = painter(&svc, "Paula").await;
        // Too short for the requested 4 hours of work.
        _ = slot(&svc, painter.id, now + DAY, now + DAY + 2 * HOUR).await;
        let bookable =
            slot(&svc, painter.id, now + 2 * DAY, now + 2 * DAY + 8 * HOUR)
                .await;

        let outcome = svc
            .execute(request(now + 2 * HOUR, now + 6 * HOUR))
            .await
            .unwrap();
        let Outcome::Unmatched { alternatives, .. } = outcome else {
            panic!("expected `Outcome::Unmatched`, got: {outcome:?}");
        };
        assert_eq!(alternatives.len(), 1);
        assert_eq!(
            alternatives[0].window.start(),
            bookable.window.start().coerce(),
        );

        // Once the remaining `Slot` is booked, nothing is left to suggest.
        _ = svc
            .execute(request(
                bookable.window.start().coerce(),
                bookable.window.end().coerce(),
            ))
            .await
            .unwrap();
        let outcome = svc
            .execute(request(now + 2 * HOUR, now + 6 * HOUR))
            .await
            .unwrap();
        let Outcome::Unmatched { alternatives, .. } = outcome else {
            panic!("expected `Outcome::Unmatched`, got: {outcome:?}");
        };
        assert!(alternatives.is_empty(), "{alternatives:?}");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn books_exactly_one_of_concurrent_requests() {
        let svc = service();
        let now = DateTime::now();

        let painter = painter(&svc, "Pablo").await;
        _ = slot(&svc, painter.id, now + HOUR, now + 9 * HOUR).await;

        let first = tokio::spawn({
            let svc = svc.clone();
            async move {
                svc.execute(request(now + 2 * HOUR, now + 6 * HOUR)).await
            }
        });
        let second = tokio::spawn({
            let svc = svc.clone();
            async move {
                svc.execute(request(now + 2 * HOUR, now + 6 * HOUR)).await
            }
        });
        let outcomes = [
            first.await.unwrap().unwrap(),
            second.await.unwrap().unwrap(),
        ];

        let matched = outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Matched { .. }))
            .count();
        assert_eq!(matched, 1, "outcomes: {outcomes:?}");
    }

    #[tokio::test]
    async fn rejects_invalid_window() {
        let svc = service();
        let now = DateTime::now();

        let err = svc
            .execute(request(now + 2 * HOUR, now + HOUR))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), E::WindowInverted));

        let err = svc
            .execute(request(now - 2 * HOUR, now + HOUR))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), E::WindowInPast));
    }
}
