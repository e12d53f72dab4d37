use super::*;

use BookingStatus as S;

const ALL: [S; 6] = [S::Pending, S::Confirmed, S::Rejected, S::Active, S::Completed, S::Cancelled];

// =============================================================================
// status parsing & normalization
// =============================================================================

#[test]
fn parse_round_trips_canonical_values() {
    for status in ALL {
        assert_eq!(S::parse(status.as_str()), Some(status));
    }
}

#[test]
fn parse_accepts_legacy_synonyms() {
    assert_eq!(S::parse("approved"), Some(S::Confirmed));
    assert_eq!(S::parse("canceled"), Some(S::Cancelled));
}

#[test]
fn parse_rejects_unknown() {
    assert_eq!(S::parse("wat"), None);
    assert_eq!(S::parse("PENDING"), None);
    assert_eq!(S::parse(""), None);
}

#[test]
fn serde_accepts_aliases_and_writes_canonical() {
    let status: S = serde_json::from_str("\"approved\"").unwrap();
    assert_eq!(status, S::Confirmed);
    assert_eq!(serde_json::to_string(&status).unwrap(), "\"confirmed\"");

    let status: S = serde_json::from_str("\"canceled\"").unwrap();
    assert_eq!(status, S::Cancelled);
    assert_eq!(serde_json::to_string(&status).unwrap(), "\"cancelled\"");
}

// =============================================================================
// transition table
// =============================================================================

#[test]
fn pending_moves_forward_or_out() {
    assert!(S::Pending.can_transition(S::Confirmed));
    assert!(S::Pending.can_transition(S::Rejected));
    assert!(S::Pending.can_transition(S::Cancelled));
    assert!(!S::Pending.can_transition(S::Active));
    assert!(!S::Pending.can_transition(S::Completed));
}

#[test]
fn confirmed_activates_or_cancels() {
    assert!(S::Confirmed.can_transition(S::Active));
    assert!(S::Confirmed.can_transition(S::Cancelled));
    assert!(!S::Confirmed.can_transition(S::Rejected));
    assert!(!S::Confirmed.can_transition(S::Pending));
}

#[test]
fn active_only_completes() {
    assert!(S::Active.can_transition(S::Completed));
    assert!(!S::Active.can_transition(S::Cancelled));
    assert!(!S::Active.can_transition(S::Confirmed));
}

#[test]
fn terminal_states_accept_nothing() {
    for terminal in [S::Rejected, S::Completed, S::Cancelled] {
        assert!(terminal.is_terminal());
        for to in ALL {
            assert!(!terminal.can_transition(to), "{terminal:?} -> {to:?} should be rejected");
        }
    }
}

#[test]
fn no_status_transitions_to_itself() {
    for status in ALL {
        assert!(!status.can_transition(status));
    }
}

// =============================================================================
// role rules
// =============================================================================

#[test]
fn owner_moves_bookings_forward() {
    assert!(actor_may(BookingActor::Owner, S::Confirmed));
    assert!(actor_may(BookingActor::Owner, S::Rejected));
    assert!(actor_may(BookingActor::Owner, S::Active));
    assert!(actor_may(BookingActor::Owner, S::Completed));
    assert!(!actor_may(BookingActor::Owner, S::Cancelled));
}

#[test]
fn renter_may_only_cancel() {
    assert!(actor_may(BookingActor::Renter, S::Cancelled));
    assert!(!actor_may(BookingActor::Renter, S::Confirmed));
    assert!(!actor_may(BookingActor::Renter, S::Rejected));
    assert!(!actor_may(BookingActor::Renter, S::Active));
    assert!(!actor_may(BookingActor::Renter, S::Completed));
}

#[test]
fn combined_guard_lets_renter_cancel_pending_only_while_open() {
    // Renter cancel on a pending booking: allowed by both table and role.
    assert!(S::Pending.can_transition(S::Cancelled) && actor_may(BookingActor::Renter, S::Cancelled));
    // Renter cancel once active: the table rejects it.
    assert!(!(S::Active.can_transition(S::Cancelled) && actor_may(BookingActor::Renter, S::Cancelled)));
}

// =============================================================================
// rows
// =============================================================================

#[test]
fn booking_row_serializes_dates_as_iso() {
    let row = BookingRow {
        id: Uuid::nil(),
        item_id: Uuid::nil(),
        renter_id: Uuid::nil(),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 1, 13).unwrap(),
        rental_days: 3,
        total_price: 135,
        status: "pending".into(),
        created_at: DateTime::<Utc>::MIN_UTC,
    };
    let json = serde_json::to_value(&row).unwrap();
    assert_eq!(json["start_date"], "2024-01-10");
    assert_eq!(json["end_date"], "2024-01-13");
    assert_eq!(json["total_price"], 135);
    assert_eq!(json["status"], "pending");
}
