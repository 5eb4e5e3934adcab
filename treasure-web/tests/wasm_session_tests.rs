#![cfg(target_arch = "wasm32")]

use treasure_web::bindings::TreasureHunt;
use treasure_web::dom;
use treasure_web::game::{KeyValueStore, WebProgressStorage, constants::STORAGE_KEY};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn clear_saved_progress() {
    WebProgressStorage.remove(STORAGE_KEY).expect("localStorage writable");
}

fn field(value: &JsValue, name: &str) -> JsValue {
    js_sys::Reflect::get(value, &JsValue::from_str(name)).expect("field present")
}

#[wasm_bindgen_test]
fn dom_helpers_reach_local_storage() {
    assert!(dom::window().is_some());
    assert!(dom::local_storage().is_ok());
}

#[wasm_bindgen_test]
fn local_storage_round_trips_values() {
    let storage = WebProgressStorage;
    storage.set("treasure-test-key", "value").unwrap();
    assert_eq!(
        storage.get("treasure-test-key").unwrap().as_deref(),
        Some("value")
    );
    storage.remove("treasure-test-key").unwrap();
    assert_eq!(storage.get("treasure-test-key").unwrap(), None);
}

#[wasm_bindgen_test]
fn click_persists_to_local_storage() {
    clear_saved_progress();
    let mut hunt = TreasureHunt::new();
    let outcome = hunt.click_treasure("bellhop").unwrap();
    assert_eq!(field(&outcome, "firstDiscovery").as_bool(), Some(true));
    assert_eq!(field(&outcome, "celebrate").as_bool(), Some(true));

    let raw = WebProgressStorage.get(STORAGE_KEY).unwrap().expect("saved");
    assert!(raw.contains("\"discoveredTreasures\":[\"bellhop\"]"));

    let reopened = TreasureHunt::new();
    let snapshot = reopened.snapshot().unwrap();
    assert_eq!(field(&snapshot, "totalScore").as_f64(), Some(5.0));
    clear_saved_progress();
}

#[wasm_bindgen_test]
fn corrupt_local_storage_starts_fresh() {
    WebProgressStorage.set(STORAGE_KEY, "{\"discovered").unwrap();
    let hunt = TreasureHunt::new();
    let summary = hunt.summary().unwrap();
    assert_eq!(field(&summary, "discovered").as_f64(), Some(0.0));
    assert_eq!(field(&summary, "totalTreasures").as_f64(), Some(12.0));
    clear_saved_progress();
}

#[wasm_bindgen_test]
fn reset_and_errors_cross_the_boundary() {
    clear_saved_progress();
    let mut hunt = TreasureHunt::new();
    hunt.answer_quiz("menu", 1).unwrap();
    assert!(hunt.click_treasure("unknown").is_err());
    assert!(hunt.answer_quiz("menu", 9).is_err());

    let snapshot = hunt.reset().unwrap();
    assert_eq!(field(&snapshot, "totalScore").as_f64(), Some(0.0));
    assert!(!hunt.storage_degraded());

    let fresh = TreasureHunt::new();
    let achievements = fresh.achievements().unwrap();
    assert_eq!(js_sys::Array::from(&achievements).length(), 6);
    clear_saved_progress();
}
