#[cfg(test)]
mod tests {
    use crate::wizard::{Applied, BookingWizard, Fetched, SlotFetch};
    use chrono::{Duration, NaiveDate, NaiveTime};
    use coachreserve_common::models::{
        Club, ClubId, Coach, CoachId, SlotStatus, TimeSlot, TimeSlotId,
    };
    use proptest::prelude::*;
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn slot(n: usize) -> TimeSlot {
        TimeSlot {
            id: TimeSlotId::new(Uuid::from_u128(5000 + n as u128)),
            slot_date: today(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            status: SlotStatus::Available,
            club: None,
            coach: None,
        }
    }

    // Wizard with one club and one coach chosen, ready for date selections.
    fn ready_wizard() -> BookingWizard {
        let club = Club {
            id: ClubId::new(Uuid::from_u128(1)),
            name: "Club A".to_string(),
            address: "Lausanne".to_string(),
        };
        let coach = Coach {
            id: CoachId::new(Uuid::from_u128(2)),
            name: "Coach X".to_string(),
            specialty: "Boxe".to_string(),
            club_id: club.id,
        };
        let mut wizard = BookingWizard::new(today());
        let clubs = wizard.load_clubs();
        wizard.apply_clubs(Fetched::new(clubs.ticket, Ok(vec![club.clone()])));
        let coaches = wizard.select_club(club.id).unwrap();
        wizard.apply_coaches(Fetched::new(coaches.ticket, Ok(vec![coach.clone()])));
        wizard.select_coach(coach.id).unwrap();
        wizard
    }

    // A number of requests together with the order their responses arrive in.
    fn arrival_order() -> impl Strategy<Value = Vec<usize>> {
        (1usize..8).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
    }

    proptest! {
        // Whatever order responses arrive in, only the last request's lands.
        #[test]
        fn test_only_latest_slot_response_applies(order in arrival_order()) {
            let mut wizard = ready_wizard();
            let last = order.len() - 1;
            let fetches: Vec<SlotFetch> = (0..order.len())
                .map(|i| {
                    wizard
                        .select_date(today() + Duration::days(i as i64))
                        .unwrap()
                        .unwrap()
                })
                .collect();

            for &i in &order {
                let applied = wizard.apply_slots(Fetched::new(fetches[i].ticket, Ok(vec![slot(i)])));
                prop_assert_eq!(applied == Applied::Applied, i == last);
                prop_assert_eq!(wizard.is_current(fetches[i].ticket), i == last);
            }

            prop_assert_eq!(wizard.slots().len(), 1);
            prop_assert_eq!(wizard.slots()[0].id, slot(last).id);
        }

        // Failures of superseded requests come back as stale and leave the
        // list alone.
        #[test]
        fn test_stale_failures_are_ignored(order in arrival_order()) {
            let mut wizard = ready_wizard();
            let last = order.len() - 1;
            let fetches: Vec<SlotFetch> = (0..order.len())
                .map(|i| {
                    wizard
                        .select_date(today() + Duration::days(i as i64))
                        .unwrap()
                        .unwrap()
                })
                .collect();

            for &i in &order {
                let result = if i == last {
                    Ok(vec![slot(i)])
                } else {
                    Err(coachreserve_common::CoachReserveError::HttpError("late".to_string()))
                };
                let applied = wizard.apply_slots(Fetched::new(fetches[i].ticket, result));
                if i != last {
                    prop_assert_eq!(applied, Applied::Stale);
                }
            }

            prop_assert_eq!(wizard.slots()[0].id, slot(last).id);
        }
    }
}
