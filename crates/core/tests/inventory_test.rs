use chrono::{DateTime, Duration, TimeZone, Utc};
use medtrack_core::errors::MedError;
use medtrack_core::inventory::{apply_quantity_update, deplete, is_low_stock};
use medtrack_core::models::inventory::{Inventory, UpdateInventoryRequest};
use medtrack_core::reminder::{default_send_window, within_send_window};
use pretty_assertions::assert_eq;
use uuid::Uuid;

fn inventory(current_qty: f64, low_threshold: Option<f64>) -> Inventory {
    Inventory {
        medication_id: Uuid::new_v4(),
        current_qty,
        unit: Some("tablet".to_string()),
        low_threshold,
        last_restocked_at: None,
        updated_at: Utc::now(),
    }
}

fn update(current_qty: f64) -> UpdateInventoryRequest {
    UpdateInventoryRequest {
        current_qty,
        unit: None,
        low_threshold: None,
        last_restocked_at: None,
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 3, 1, 12, 0, 0).unwrap()
}

#[test]
fn test_low_stock_at_or_below_threshold() {
    assert!(is_low_stock(&inventory(5.0, Some(10.0))));
    assert!(is_low_stock(&inventory(10.0, Some(10.0))));
    assert!(!is_low_stock(&inventory(11.0, Some(10.0))));
    // No threshold configured means never low.
    assert!(!is_low_stock(&inventory(0.0, None)));
}

#[test]
fn test_restock_sets_last_restocked_at_and_clears_low_stock() {
    let prev = inventory(5.0, Some(10.0));
    assert!(is_low_stock(&prev));

    let applied = apply_quantity_update(Some(&prev), &update(30.0), now()).unwrap();
    assert_eq!(applied.current_qty, 30.0);
    assert_eq!(applied.last_restocked_at, Some(now()));

    let refreshed = Inventory {
        current_qty: applied.current_qty,
        low_threshold: applied.low_threshold,
        last_restocked_at: applied.last_restocked_at,
        unit: applied.unit.clone(),
        ..prev
    };
    assert!(!is_low_stock(&refreshed));
}

#[test]
fn test_explicit_restock_timestamp_wins() {
    let prev = inventory(5.0, None);
    let explicit = now() - Duration::days(1);
    let req = UpdateInventoryRequest {
        current_qty: 30.0,
        unit: None,
        low_threshold: None,
        last_restocked_at: Some(explicit),
    };
    let applied = apply_quantity_update(Some(&prev), &req, now()).unwrap();
    assert_eq!(applied.last_restocked_at, Some(explicit));
}

#[test]
fn test_decrease_preserves_restock_timestamp() {
    let restocked = now() - Duration::days(3);
    let mut prev = inventory(30.0, None);
    prev.last_restocked_at = Some(restocked);

    let applied = apply_quantity_update(Some(&prev), &update(29.0), now()).unwrap();
    assert_eq!(applied.last_restocked_at, Some(restocked));
}

#[test]
fn test_first_write_is_not_a_restock() {
    let applied = apply_quantity_update(None, &update(30.0), now()).unwrap();
    assert_eq!(applied.last_restocked_at, None);
}

#[test]
fn test_update_preserves_unit_and_threshold_when_omitted() {
    let prev = inventory(20.0, Some(10.0));
    let applied = apply_quantity_update(Some(&prev), &update(15.0), now()).unwrap();
    assert_eq!(applied.unit, Some("tablet".to_string()));
    assert_eq!(applied.low_threshold, Some(10.0));
}

#[test]
fn test_negative_or_non_finite_quantities_rejected() {
    assert!(matches!(
        apply_quantity_update(None, &update(-1.0), now()),
        Err(MedError::Validation(_))
    ));
    assert!(matches!(
        apply_quantity_update(None, &update(f64::INFINITY), now()),
        Err(MedError::Validation(_))
    ));
}

#[test]
fn test_deplete_floors_at_zero() {
    assert_eq!(deplete(5.0, 2.0), 3.0);
    assert_eq!(deplete(1.0, 2.0), 0.0);
}

#[test]
fn test_send_window_bounds() {
    let window = default_send_window();
    assert!(within_send_window(now(), now(), window));
    assert!(within_send_window(now() + Duration::minutes(2), now(), window));
    assert!(!within_send_window(now() + Duration::minutes(3), now(), window));
    // Past-due doses belong to the missed sweep, not the dispatcher.
    assert!(!within_send_window(now() - Duration::minutes(1), now(), window));
}
