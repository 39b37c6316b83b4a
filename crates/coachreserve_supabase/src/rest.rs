//! `BookingStore` over the Supabase REST data API (PostgREST).
//!
//! Filters use PostgREST's `column=op.value` syntax; ordering is always
//! explicit so results do not depend on table storage order.

use coachreserve_common::error::CoachReserveError;
use coachreserve_common::models::{
    AccessToken, Club, ClubId, Coach, NewReservation, Reservation, SlotQuery, TimeSlot,
};
use coachreserve_common::services::{BookingStore, ServiceFuture};
use tracing::{debug, info};

use crate::client::{parse_json, send, SupabaseClient};

/// Columns fetched for a slot, with the club and coach display fields joined in.
pub const TIME_SLOT_SELECT: &str = "*,clubs(name),coaches(name,specialty)";

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

impl BookingStore for SupabaseClient {
    fn list_clubs(&self, token: &AccessToken) -> ServiceFuture<'_, Vec<Club>> {
        let token = token.clone();

        Box::pin(async move {
            let builder = self
                .http
                .get(self.rest_url("clubs"))
                .query(&[("select", "*"), ("order", "name.asc")]);
            let response = send(self.authed(builder, &token), "list_clubs").await?;
            let clubs: Vec<Club> = parse_json(response, "list_clubs").await?;
            debug!(count = clubs.len(), "Loaded clubs");
            Ok(clubs)
        })
    }

    fn list_coaches(&self, token: &AccessToken, club_id: ClubId) -> ServiceFuture<'_, Vec<Coach>> {
        let token = token.clone();

        Box::pin(async move {
            let builder = self.http.get(self.rest_url("coaches")).query(&[
                ("select", "*".to_string()),
                ("club_id", eq(club_id)),
                ("order", "name.asc".to_string()),
            ]);
            let response = send(self.authed(builder, &token), "list_coaches").await?;
            let coaches: Vec<Coach> = parse_json(response, "list_coaches").await?;
            debug!(club_id = %club_id, count = coaches.len(), "Loaded coaches");
            Ok(coaches)
        })
    }

    fn list_time_slots(
        &self,
        token: &AccessToken,
        query: SlotQuery,
    ) -> ServiceFuture<'_, Vec<TimeSlot>> {
        let token = token.clone();

        Box::pin(async move {
            let builder = self.http.get(self.rest_url("time_slots")).query(&[
                ("select", TIME_SLOT_SELECT.to_string()),
                ("club_id", eq(query.club_id)),
                ("coach_id", eq(query.coach_id)),
                ("slot_date", eq(query.date.format("%Y-%m-%d"))),
                ("status", eq(&query.status)),
                ("order", "start_time.asc".to_string()),
            ]);
            let response = send(self.authed(builder, &token), "list_time_slots").await?;
            let slots: Vec<TimeSlot> = parse_json(response, "list_time_slots").await?;
            debug!(
                coach_id = %query.coach_id,
                date = %query.date,
                count = slots.len(),
                "Loaded time slots"
            );
            Ok(slots)
        })
    }

    fn create_reservation(
        &self,
        token: &AccessToken,
        reservation: NewReservation,
    ) -> ServiceFuture<'_, Reservation> {
        let token = token.clone();

        Box::pin(async move {
            let builder = self
                .http
                .post(self.rest_url("reservations"))
                .header("Prefer", "return=representation")
                .json(&reservation);
            let response = send(self.authed(builder, &token), "create_reservation").await?;
            let mut rows: Vec<Reservation> = parse_json(response, "create_reservation").await?;

            if rows.is_empty() {
                return Err(CoachReserveError::ParseError(
                    "create_reservation: no row returned".to_string(),
                ));
            }
            let created = rows.swap_remove(0);
            info!(
                reservation_id = %created.id,
                time_slot_id = %created.time_slot_id,
                "Reservation created"
            );
            Ok(created)
        })
    }
}
