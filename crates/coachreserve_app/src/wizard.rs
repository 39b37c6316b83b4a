//! The booking wizard as a pure state machine.
//!
//! Selecting a club, coach or date returns the fetch the caller has to run;
//! the caller hands the response back through `apply_*`. Each fetch carries
//! a [`Ticket`] and only the latest ticket of its kind may change state, so a
//! slow response to an earlier selection can never overwrite a newer one.
//!
//! ```text
//! Idle -> ClubChosen -> CoachChosen -> DateChosen -> SlotsLoaded -> Booking -> Booked
//!                                                                          \-> Failed
//! ```

use chrono::NaiveDate;
use coachreserve_common::error::{validation_error, CoachReserveError};
use coachreserve_common::models::{
    Club, ClubId, Coach, CoachId, NewReservation, Reservation, Session, SlotQuery, TimeSlot,
    TimeSlotId,
};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    ClubChosen,
    CoachChosen,
    DateChosen,
    SlotsLoaded,
    Booking,
    Booked,
    Failed,
}

/// What a ticket was issued for. Generations are counted per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    Clubs,
    Coaches,
    Slots,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    kind: FetchKind,
    generation: u64,
}

impl Ticket {
    pub fn kind(&self) -> FetchKind {
        self.kind
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default, Clone)]
struct Generations {
    clubs: u64,
    coaches: u64,
    slots: u64,
}

impl Generations {
    fn counter(&mut self, kind: FetchKind) -> &mut u64 {
        match kind {
            FetchKind::Clubs => &mut self.clubs,
            FetchKind::Coaches => &mut self.coaches,
            FetchKind::Slots => &mut self.slots,
        }
    }

    fn issue(&mut self, kind: FetchKind) -> Ticket {
        let counter = self.counter(kind);
        *counter += 1;
        Ticket {
            kind,
            generation: *counter,
        }
    }

    /// Makes every outstanding ticket of `kind` stale without issuing a new one.
    fn invalidate(&mut self, kind: FetchKind) {
        *self.counter(kind) += 1;
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        match ticket.kind {
            FetchKind::Clubs => self.clubs == ticket.generation,
            FetchKind::Coaches => self.coaches == ticket.generation,
            FetchKind::Slots => self.slots == ticket.generation,
        }
    }
}

/// A response paired with the ticket of the request that produced it.
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub ticket: Ticket,
    pub result: Result<T, CoachReserveError>,
}

impl<T> Fetched<T> {
    pub fn new(ticket: Ticket, result: Result<T, CoachReserveError>) -> Self {
        Self { ticket, result }
    }
}

/// What happened to a response handed back to the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// The response replaced the list.
    Applied,
    /// A newer request of the same kind exists; nothing changed.
    Stale,
    /// Latest request, but it failed; the list is unchanged.
    Failed(CoachReserveError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClubsFetch {
    pub ticket: Ticket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoachFetch {
    pub ticket: Ticket,
    pub club_id: ClubId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotFetch {
    pub ticket: Ticket,
    pub query: SlotQuery,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    #[error("no session")]
    NotSignedIn,

    #[error("no club selected")]
    NoClub,

    #[error("club {0} is not in the list")]
    UnknownClub(ClubId),

    #[error("coach {0} is not in the list")]
    UnknownCoach(CoachId),

    #[error("{date} is before {today}")]
    DateInPast { date: NaiveDate, today: NaiveDate },

    #[error("a reservation is already in progress")]
    Busy,

    #[error("slot {0} is not in the displayed list")]
    UnknownSlot(TimeSlotId),

    #[error(transparent)]
    Backend(#[from] CoachReserveError),
}

impl From<BookingError> for CoachReserveError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Backend(inner) => inner,
            BookingError::NotSignedIn => CoachReserveError::AuthError(err.to_string()),
            other => validation_error(other),
        }
    }
}

/// Result of a finished reservation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingOutcome {
    /// The reservation exists; `refetch` reloads the slot list when all
    /// filters are still set.
    Booked {
        reservation: Reservation,
        refetch: Option<SlotFetch>,
    },
    /// The insert failed; the slot list is left as it was.
    Failed(CoachReserveError),
}

#[derive(Debug, Clone)]
pub struct BookingWizard {
    today: NaiveDate,
    stage: Stage,
    clubs: Vec<Club>,
    coaches: Vec<Coach>,
    slots: Vec<TimeSlot>,
    club: Option<ClubId>,
    coach: Option<CoachId>,
    date: Option<NaiveDate>,
    slots_loaded: bool,
    busy: bool,
    generations: Generations,
}

impl BookingWizard {
    /// `today` is the earliest selectable date.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            stage: Stage::Idle,
            clubs: Vec::new(),
            coaches: Vec::new(),
            slots: Vec::new(),
            club: None,
            coach: None,
            date: None,
            slots_loaded: false,
            busy: false,
            generations: Generations::default(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn clubs(&self) -> &[Club] {
        &self.clubs
    }

    pub fn coaches(&self) -> &[Coach] {
        &self.coaches
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn selected_club(&self) -> Option<ClubId> {
        self.club
    }

    pub fn selected_coach(&self) -> Option<CoachId> {
        self.coach
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Whether `ticket` is the latest of its kind.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generations.is_current(ticket)
    }

    /// True once a slot fetch for the current filters came back empty.
    pub fn shows_no_slots(&self) -> bool {
        self.coach.is_some() && self.date.is_some() && self.slots_loaded && self.slots.is_empty()
    }

    pub fn load_clubs(&mut self) -> ClubsFetch {
        ClubsFetch {
            ticket: self.generations.issue(FetchKind::Clubs),
        }
    }

    pub fn apply_clubs(&mut self, fetched: Fetched<Vec<Club>>) -> Applied {
        if !self.is_current(fetched.ticket) {
            trace!(generation = fetched.ticket.generation, "Discarding stale clubs");
            return Applied::Stale;
        }
        match fetched.result {
            Ok(clubs) => {
                self.clubs = clubs;
                Applied::Applied
            }
            Err(e) => Applied::Failed(e),
        }
    }

    /// Chooses a club. Coach, coach list and slots are reset; the date is kept.
    pub fn select_club(&mut self, club_id: ClubId) -> Result<CoachFetch, BookingError> {
        if !self.clubs.iter().any(|club| club.id == club_id) {
            return Err(BookingError::UnknownClub(club_id));
        }

        self.club = Some(club_id);
        self.coach = None;
        self.coaches.clear();
        self.clear_slots();
        self.stage = Stage::ClubChosen;
        debug!(club_id = %club_id, "Club selected");

        Ok(CoachFetch {
            ticket: self.generations.issue(FetchKind::Coaches),
            club_id,
        })
    }

    pub fn apply_coaches(&mut self, fetched: Fetched<Vec<Coach>>) -> Applied {
        if !self.is_current(fetched.ticket) {
            trace!(generation = fetched.ticket.generation, "Discarding stale coaches");
            return Applied::Stale;
        }
        match fetched.result {
            Ok(coaches) => {
                self.coaches = coaches;
                Applied::Applied
            }
            Err(e) => Applied::Failed(e),
        }
    }

    /// Chooses a coach of the selected club. Returns the slot fetch when a
    /// date is already chosen.
    pub fn select_coach(&mut self, coach_id: CoachId) -> Result<Option<SlotFetch>, BookingError> {
        if self.club.is_none() {
            return Err(BookingError::NoClub);
        }
        if !self.coaches.iter().any(|coach| coach.id == coach_id) {
            return Err(BookingError::UnknownCoach(coach_id));
        }

        self.coach = Some(coach_id);
        self.clear_slots();
        self.stage = Stage::CoachChosen;
        debug!(coach_id = %coach_id, "Coach selected");

        let fetch = self.slot_fetch();
        if fetch.is_some() {
            self.stage = Stage::DateChosen;
        }
        Ok(fetch)
    }

    /// Chooses a date. Returns the slot fetch once club, coach and date are set.
    /// Today stays selectable; later slots of the day can still be booked.
    pub fn select_date(&mut self, date: NaiveDate) -> Result<Option<SlotFetch>, BookingError> {
        if date < self.today {
            return Err(BookingError::DateInPast {
                date,
                today: self.today,
            });
        }

        self.date = Some(date);
        self.clear_slots();
        debug!(date = %date, "Date selected");

        let fetch = self.slot_fetch();
        if fetch.is_some() {
            self.stage = Stage::DateChosen;
        }
        Ok(fetch)
    }

    fn clear_slots(&mut self) {
        self.slots.clear();
        self.slots_loaded = false;
        self.generations.invalidate(FetchKind::Slots);
    }

    /// Issues a slot fetch for the current filters, if they are complete.
    /// Leaves the stage alone.
    pub fn slot_fetch(&mut self) -> Option<SlotFetch> {
        let (club_id, coach_id, date) = match (self.club, self.coach, self.date) {
            (Some(club), Some(coach), Some(date)) => (club, coach, date),
            _ => return None,
        };

        Some(SlotFetch {
            ticket: self.generations.issue(FetchKind::Slots),
            query: SlotQuery::available(club_id, coach_id, date),
        })
    }

    pub fn apply_slots(&mut self, fetched: Fetched<Vec<TimeSlot>>) -> Applied {
        if !self.is_current(fetched.ticket) {
            trace!(generation = fetched.ticket.generation, "Discarding stale slots");
            return Applied::Stale;
        }
        match fetched.result {
            Ok(slots) => {
                self.slots = slots;
                self.slots_loaded = true;
                if self.stage == Stage::DateChosen {
                    self.stage = Stage::SlotsLoaded;
                }
                Applied::Applied
            }
            Err(e) => Applied::Failed(e),
        }
    }

    /// Starts reserving a displayed slot for the signed-in user.
    pub fn begin_booking(
        &mut self,
        slot_id: TimeSlotId,
        session: Option<&Session>,
    ) -> Result<NewReservation, BookingError> {
        let session = session.ok_or(BookingError::NotSignedIn)?;
        if self.busy {
            return Err(BookingError::Busy);
        }
        if !self.slots.iter().any(|slot| slot.id == slot_id) {
            return Err(BookingError::UnknownSlot(slot_id));
        }

        self.busy = true;
        self.stage = Stage::Booking;
        Ok(NewReservation::confirmed(session.user_id(), slot_id))
    }

    pub fn finish_booking(&mut self, result: Result<Reservation, CoachReserveError>) -> BookingOutcome {
        self.busy = false;
        match result {
            Ok(reservation) => {
                self.stage = Stage::Booked;
                BookingOutcome::Booked {
                    reservation,
                    refetch: self.slot_fetch(),
                }
            }
            Err(e) => {
                self.stage = Stage::Failed;
                BookingOutcome::Failed(e)
            }
        }
    }
}
