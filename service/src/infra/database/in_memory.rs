//! In-memory [`Database`] implementation.

use std::{cmp::Reverse, collections::HashMap, sync::Arc};

use common::{
    operations::{By, Commit, Delete, Insert, Lock, Select, Transact, Update},
    DateTime,
};
use tokio::sync::Mutex;
use tracerr::Traced;

use crate::{
    domain::{
        booking, painter, request, slot, user, Booking, Painter, Request,
        Slot,
    },
    infra::{database, Database},
    read,
};

/// In-memory [`Database`] implementation.
///
/// Backs tests and local development. Every operation applies atomically
/// under a single lock, so a [`Transact`]ion shares the same store, while
/// [`Lock`]s and [`Commit`]s are no-ops.
#[derive(Clone, Debug, Default)]
pub struct InMemory(Arc<Mutex<State>>);

/// State of an [`InMemory`] database.
#[derive(Debug, Default)]
struct State {
    /// Registered [`Painter`]s.
    painters: HashMap<painter::Id, Painter>,

    /// Declared [`Slot`]s.
    slots: HashMap<slot::Id, Slot>,

    /// Placed [`Request`]s.
    requests: HashMap<request::Id, Request>,

    /// Created [`Booking`]s.
    bookings: HashMap<booking::Id, Booking>,
}

impl Database<Transact> for InMemory {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Lock<By<Painter, painter::Id>>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Painter, painter::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl Database<Insert<Painter>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(painter): Insert<Painter>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.0.lock().await.painters.insert(painter.id, painter);
        Ok(())
    }
}

impl Database<Update<Painter>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(painter): Update<Painter>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.0.lock().await.painters.insert(painter.id, painter);
        Ok(())
    }
}

impl Database<Select<By<Option<Painter>, painter::Id>>> for InMemory {
    type Ok = Option<Painter>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Painter>, painter::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.0.lock().await.painters.get(&id).cloned())
    }
}

impl Database<Select<By<Option<Painter>, user::Id>>> for InMemory {
    type Ok = Option<Painter>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Painter>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user_id = by.into_inner();
        Ok(self
            .0
            .lock()
            .await
            .painters
            .values()
            .find(|p| p.user_id == user_id)
            .cloned())
    }
}

impl Database<Select<By<Vec<Painter>, read::painter::Active>>> for InMemory {
    type Ok = Vec<Painter>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Painter>, read::painter::Active>>,
    ) -> Result<Self::Ok, Self::Err> {
        let state = self.0.lock().await;
        let mut painters: Vec<_> = state
            .painters
            .values()
            .filter(|p| p.is_active)
            .cloned()
            .collect();
        painters.sort_by_key(|p| (p.created_at, p.id));
        Ok(painters)
    }
}

impl Database<Insert<Slot>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(slot): Insert<Slot>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.0.lock().await.slots.insert(slot.id, slot);
        Ok(())
    }
}

impl Database<Select<By<Option<Slot>, slot::Id>>> for InMemory {
    type Ok = Option<Slot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Slot>, slot::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.0.lock().await.slots.get(&id).copied())
    }
}

impl Database<Select<By<Option<Slot>, read::slot::Overlapping>>> for InMemory {
    type Ok = Option<Slot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Slot>, read::slot::Overlapping>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::slot::Overlapping { painter_id, window } = by.into_inner();
        Ok(self
            .0
            .lock()
            .await
            .slots
            .values()
            .filter(|s| {
                s.painter_id == painter_id
                    && s.window.coerce().overlaps(&window)
            })
            .min_by_key(|s| (s.window.start(), s.id))
            .copied())
    }
}

impl Database<Select<By<Vec<Slot>, read::slot::UpcomingOf>>> for InMemory {
    type Ok = Vec<Slot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Slot>, read::slot::UpcomingOf>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::slot::UpcomingOf(painter_id) = by.into_inner();
        let now = DateTime::now().coerce();

        let state = self.0.lock().await;
        let mut slots: Vec<_> = state
            .slots
            .values()
            .filter(|s| s.painter_id == painter_id && s.window.start() >= now)
            .copied()
            .collect();
        slots.sort_by_key(|s| (s.window.start(), s.id));
        Ok(slots)
    }
}

impl Database<Select<By<Vec<read::slot::Candidate>, read::slot::Containing>>>
    for InMemory
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

        let state = self.0.lock().await;
        let mut slots: Vec<_> = state
            .slots
            .values()
            .filter(|s| !s.is_booked && s.window.coerce().contains(&period))
            .copied()
            .collect();
        slots.sort_by_key(|s| (s.window.start(), s.id));

        Ok(slots
            .into_iter()
            .filter_map(|slot| {
                state.painters.get(&slot.painter_id).map(|painter| {
                    read::slot::Candidate { painter: painter.clone(), slot }
                })
            })
            .collect())
    }
}

impl
    Database<Select<By<Vec<read::slot::Candidate>, read::slot::StartingWithin>>>
    for InMemory
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

        let state = self.0.lock().await;
        let mut slots: Vec<_> = state
            .slots
            .values()
            .filter(|s| {
                let start = s.window.start().coerce();
                !s.is_booked && start >= from && start <= until
            })
            .copied()
            .collect();
        slots.sort_by_key(|s| (s.window.start(), s.id));

        Ok(slots
            .into_iter()
            .filter_map(|slot| {
                state.painters.get(&slot.painter_id).map(|painter| {
                    read::slot::Candidate { painter: painter.clone(), slot }
                })
            })
            .collect())
    }
}

impl Database<Update<By<Option<Slot>, slot::Book>>> for InMemory {
    type Ok = Option<Slot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(by): Update<By<Option<Slot>, slot::Book>>,
    ) -> Result<Self::Ok, Self::Err> {
        let slot::Book(id) = by.into_inner();

        let mut state = self.0.lock().await;
        Ok(state.slots.get_mut(&id).and_then(|slot| {
            (!slot.is_booked).then(|| {
                slot.is_booked = true;
                *slot
            })
        }))
    }
}

impl Database<Update<By<Option<Slot>, slot::Free>>> for InMemory {
    type Ok = Option<Slot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(by): Update<By<Option<Slot>, slot::Free>>,
    ) -> Result<Self::Ok, Self::Err> {
        let slot::Free(id) = by.into_inner();

        let mut state = self.0.lock().await;
        Ok(state.slots.get_mut(&id).and_then(|slot| {
            slot.is_booked.then(|| {
                slot.is_booked = false;
                *slot
            })
        }))
    }
}

impl Database<Delete<By<Option<Slot>, slot::Owned>>> for InMemory {
    type Ok = Option<Slot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Option<Slot>, slot::Owned>>,
    ) -> Result<Self::Ok, Self::Err> {
        let slot::Owned { id, painter_id } = by.into_inner();

        let mut state = self.0.lock().await;
        let deletable = state
            .slots
            .get(&id)
            .is_some_and(|s| s.painter_id == painter_id && !s.is_booked);
        Ok(deletable.then(|| state.slots.remove(&id)).flatten())
    }
}

impl Database<Delete<By<Slot, read::slot::ExpiredBy>>> for InMemory {
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Slot, read::slot::ExpiredBy>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::slot::ExpiredBy(deadline) = by.into_inner();

        let mut state = self.0.lock().await;
        let before = state.slots.len();
        state
            .slots
            .retain(|_, s| s.is_booked || s.window.end().coerce() > deadline);
        Ok(u64::try_from(before - state.slots.len()).expect("count overflow"))
    }
}

impl Database<Insert<Request>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(request): Insert<Request>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.0.lock().await.requests.insert(request.id, request);
        Ok(())
    }
}

impl Database<Update<Request>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(request): Update<Request>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.0.lock().await.requests.insert(request.id, request);
        Ok(())
    }
}

impl Database<Insert<Booking>> for InMemory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self.0.lock().await.bookings.insert(booking.id, booking);
        Ok(())
    }
}

impl Database<Select<By<Vec<read::booking::View>, user::Id>>> for InMemory {
    type Ok = Vec<read::booking::View>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::booking::View>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user_id = by.into_inner();

        let state = self.0.lock().await;
        let mut requests: Vec<_> = state
            .requests
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        requests.sort_by_key(|r| (Reverse(r.created_at), r.id));

        Ok(requests
            .into_iter()
            .map(|request| {
                let assignment = state
                    .bookings
                    .values()
                    .find(|b| b.request_id == request.id)
                    .and_then(|b| {
                        state.painters.get(&b.painter_id).map(|p| {
                            read::booking::Assignment {
                                booking: *b,
                                painter: p.clone().into(),
                            }
                        })
                    });
                read::booking::View { request, assignment }
            })
            .collect())
    }
}

impl Database<Select<By<Vec<read::booking::Appointment>, painter::Id>>>
    for InMemory
{
    type Ok = Vec<read::booking::Appointment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::booking::Appointment>, painter::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let painter_id = by.into_inner();

        let state = self.0.lock().await;
        let mut bookings: Vec<_> = state
            .bookings
            .values()
            .filter(|b| b.painter_id == painter_id)
            .copied()
            .collect();
        bookings.sort_by_key(|b| (Reverse(b.created_at), b.id));

        Ok(bookings
            .into_iter()
            .filter_map(|booking| {
                state.requests.get(&booking.request_id).map(|request| {
                    read::booking::Appointment {
                        booking,
                        request: request.clone(),
                    }
                })
            })
            .collect())
    }
}
